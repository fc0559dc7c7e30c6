/*!
 * Omnibox CLI - parse and complete omnibox input from the terminal
 *
 * Runs the same parser and suggestion engine the desktop omnibox uses.
 * Emits human-readable text or JSON for scripting and golden tests.
 */

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use omnibox_core::{
    CommandParser, CommandSuggestion, EntityContext, OmniboxConfig, ParseOptions, ParsedCommand,
    ParserTables, SuggestionContext, SuggestionEngine, Token,
};

#[derive(Parser)]
#[command(name = "omnibox_cli")]
#[command(about = "Omnibox - natural-language command parser for the sync client", long_about = None)]
struct Cli {
    /// Parser tables (YAML or JSON) to use instead of the built-in set
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    /// Config file (default: <config dir>/eigen/omnibox.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split input into tokens
    Tokenize {
        input: String,

        #[arg(short, long)]
        json: bool,
    },

    /// Parse input into a structured command
    Parse {
        input: String,

        /// Known device name (repeatable)
        #[arg(short, long = "device")]
        devices: Vec<String>,

        /// Known folder name (repeatable)
        #[arg(short, long = "folder")]
        folders: Vec<String>,

        #[arg(short, long)]
        json: bool,
    },

    /// Rank completions for partial input
    Suggest {
        input: String,

        #[arg(short, long = "device")]
        devices: Vec<String>,

        #[arg(short, long = "folder")]
        folders: Vec<String>,

        /// Past input, most recent first (repeatable)
        #[arg(short = 'H', long = "history")]
        history: Vec<String>,

        #[arg(short, long)]
        json: bool,
    },

    /// List known commands
    Commands {
        /// Only commands whose id, alias or description contains this
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        json: bool,
    },

    /// Print the active parser tables as YAML
    ExportTables,

    /// Show version information
    Version,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    // RUST_LOG=omnibox_core=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => OmniboxConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => OmniboxConfig::load_or_default(),
    };

    let tables = match cli.tables.as_ref().or(config.tables_path.as_ref()) {
        Some(path) => ParserTables::load(path)
            .with_context(|| format!("loading parser tables {}", path.display()))?,
        None => ParserTables::builtin(),
    };
    let tables = Arc::new(tables);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Tokenize { input, json } => {
            let tokens = CommandParser::new(tables).tokenize(&input);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&tokens)?)?;
            } else {
                print_tokens(&mut out, &tokens)?;
            }
        }
        Commands::Parse {
            input,
            devices,
            folders,
            json,
        } => {
            let options = ParseOptions {
                context: Some(EntityContext { devices, folders }),
                enable_ai: config.enable_ai,
            };
            let parsed = CommandParser::new(tables).parse(&input, &options);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&parsed)?)?;
            } else {
                print_parsed(&mut out, &parsed)?;
            }
        }
        Commands::Suggest {
            input,
            devices,
            folders,
            history,
            json,
        } => {
            let context = SuggestionContext {
                devices,
                folders,
                history,
            };
            let suggestions = SuggestionEngine::with_config(tables, &config).suggest(&input, &context);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&suggestions)?)?;
            } else {
                print_suggestions(&mut out, &suggestions)?;
            }
        }
        Commands::Commands { search, json } => {
            let commands = match search.as_deref() {
                Some(query) => tables.commands.search(query),
                None => tables.commands.iter().collect(),
            };
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&commands)?)?;
            } else {
                for cmd in commands {
                    writeln!(out, "{:<12} {:<40} {}", cmd.id, cmd.aliases.join(", "), cmd.description)?;
                }
            }
        }
        Commands::ExportTables => {
            write!(out, "{}", tables.to_yaml()?)?;
        }
        Commands::Version => {
            writeln!(out, "omnibox_cli v{}", env!("CARGO_PKG_VERSION"))?;
            writeln!(out, "Omnibox command parser and suggestion engine")?;
        }
    }

    Ok(())
}

fn print_tokens(out: &mut impl Write, tokens: &[Token]) -> io::Result<()> {
    for token in tokens {
        writeln!(out, "{}\t{:<8}\t{}", token.position, token.kind.as_str(), token.value)?;
    }
    Ok(())
}

fn print_parsed(out: &mut impl Write, parsed: &ParsedCommand) -> io::Result<()> {
    writeln!(out, "intent:        {} ({:.2})", parsed.intent, parsed.confidence)?;
    writeln!(out, "visualization: {}", parsed.visualization)?;
    if let Some(action) = &parsed.action {
        writeln!(out, "action:        {}", action)?;
    }
    if !parsed.parameters.is_empty() {
        let params: Vec<String> = parsed
            .parameters
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.as_str().unwrap_or_default()))
            .collect();
        writeln!(out, "parameters:    {}", params.join(" "))?;
    }

    let entities = &parsed.entities;
    if let Some(devices) = &entities.devices {
        writeln!(out, "devices:       {}", devices.join(", "))?;
    }
    if let Some(folders) = &entities.folders {
        writeln!(out, "folders:       {}", folders.join(", "))?;
    }
    if let Some(files) = &entities.files {
        writeln!(out, "files:         {}", files.join(", "))?;
    }
    if let Some(relative) = entities.time_range.as_ref().and_then(|t| t.relative.as_ref()) {
        writeln!(out, "time range:    {}", relative)?;
    }
    if let Some(pattern) = &entities.pattern {
        writeln!(out, "pattern:       {}", pattern)?;
    }
    Ok(())
}

fn print_suggestions(out: &mut impl Write, suggestions: &[CommandSuggestion]) -> io::Result<()> {
    for s in suggestions {
        writeln!(out, "{:.2}  {:<28} {}", s.score, s.text, s.description)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnibox_core::parse_command;

    #[test]
    fn test_print_parsed_lists_entities() {
        let options = ParseOptions {
            context: Some(EntityContext {
                devices: vec!["Laptop".into()],
                folders: vec![],
            }),
            enable_ai: false,
        };
        let parsed = parse_command("pause laptop", &options);

        let mut buf = Vec::new();
        print_parsed(&mut buf, &parsed).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("intent:        action-pause (1.00)"));
        assert!(text.contains("action:        pause_device"));
        assert!(text.contains("parameters:    device=laptop"));
        assert!(text.contains("devices:       Laptop"));
    }

    #[test]
    fn test_print_tokens() {
        let tokens = omnibox_core::tokenize("sync --now");
        let mut buf = Vec::new();
        print_tokens(&mut buf, &tokens).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("0\tword"));
        assert!(text.contains("1\tflag"));
    }
}
