// tests/cli_golden_tests.rs
// Golden/snapshot tests for omnibox_cli JSON output

use assert_cmd::Command;
use insta::assert_json_snapshot;
use omnibox_core::{CommandSuggestion, ParsedCommand, Token};
use std::fs;
use tempfile::TempDir;

/// omnibox_cli with its config directory pointed at an empty temp dir
fn cli(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("omnibox_cli").expect("omnibox_cli binary must be built");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().clone();
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn golden_tokenize() {
    let home = TempDir::new().unwrap();
    let out = stdout_of(
        cli(&home)
            .arg("tokenize")
            .arg("--json")
            .arg(r#"sync "My Docs" to laptop --now"#),
    );

    let tokens: Vec<Token> = serde_json::from_str(&out).expect("tokenize output must be JSON");
    assert_json_snapshot!("golden_tokenize", tokens);
}

#[test]
fn golden_parse_with_context() {
    let home = TempDir::new().unwrap();
    let out = stdout_of(
        cli(&home)
            .arg("parse")
            .arg("--json")
            .arg("sync Documents with Desktop PC")
            .args(["-d", "Desktop PC", "-f", "Documents"]),
    );

    let parsed: ParsedCommand = serde_json::from_str(&out).expect("parse output must be JSON");
    assert_eq!(parsed.confidence, 1.0);
    assert_json_snapshot!("golden_parse_with_context", parsed, {
        ".confidence" => "[confidence]"
    });
}

#[test]
fn suggest_respects_config_file() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("eigen");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("omnibox.json"), r#"{ "max_suggestions": 2 }"#).unwrap();

    let out = stdout_of(cli(&home).arg("suggest").arg("--json").arg("s"));
    let suggestions: Vec<CommandSuggestion> = serde_json::from_str(&out).unwrap();
    assert_eq!(suggestions.len(), 2);
}

#[test]
fn suggest_empty_input_lists_defaults() {
    let home = TempDir::new().unwrap();
    let out = stdout_of(cli(&home).arg("suggest").arg("--json").arg(""));
    let suggestions: Vec<CommandSuggestion> = serde_json::from_str(&out).unwrap();

    let texts: Vec<&str> = suggestions.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["status", "devices", "folders", "conflicts", "storage", "help"]);
}

#[test]
fn exported_tables_load_back() {
    let home = TempDir::new().unwrap();
    let yaml = stdout_of(cli(&home).arg("export-tables"));

    let tables_path = home.path().join("tables.yaml");
    fs::write(&tables_path, yaml).unwrap();

    let out = stdout_of(
        cli(&home)
            .arg("--tables")
            .arg(&tables_path)
            .arg("parse")
            .arg("--json")
            .arg("pause laptop"),
    );
    let parsed: ParsedCommand = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed.action.as_deref(), Some("pause_device"));
    assert_eq!(parsed.parameters["device"], "laptop");
}

#[test]
fn missing_tables_file_fails() {
    let home = TempDir::new().unwrap();
    let output = cli(&home)
        .arg("--tables")
        .arg(home.path().join("nope.yaml"))
        .arg("parse")
        .arg("status")
        .assert()
        .failure()
        .get_output()
        .clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loading parser tables"), "stderr: {}", stderr);
}

#[test]
fn commands_search() {
    let home = TempDir::new().unwrap();
    let out = stdout_of(cli(&home).arg("commands").arg("--search").arg("conflict"));

    assert!(out.contains("conflicts"));
    assert!(out.contains("resolve"));
    assert!(!out.contains("bandwidth"));
}
