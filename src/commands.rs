//! Command table for omnibox_core
//!
//! Static command definitions: aliases that invoke them, the intent each id
//! maps to, the view to open and the backend action to dispatch.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{OmniboxError, Result};
use crate::intent::{CommandIntent, Visualization};
use crate::tokenizer::{joined_text, Token};

/// A command the omnibox understands
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CommandDefinition {
    /// Unique id
    pub id: String,
    /// Literal strings that invoke this command, tried in order
    pub aliases: Vec<String>,
    /// Intent this command id maps to
    pub intent: CommandIntent,
    pub category: CommandCategory,
    pub description: String,
    pub visualization: Visualization,
    /// Example inputs (for help output)
    #[serde(default)]
    pub examples: Vec<String>,
    /// Positional parameters, bound in declaration order
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    /// Backend action to dispatch, if any
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Declared parameter type. Informational only; values are never coerced.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Device,
    Folder,
    File,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Query,
    Action,
    Navigation,
    Help,
    History,
    Device,
    Folder,
}

impl CommandCategory {
    /// Icon name shown next to suggestions of this category
    pub fn icon(&self) -> &'static str {
        match self {
            CommandCategory::Query => "search",
            CommandCategory::Action => "zap",
            CommandCategory::Navigation => "compass",
            CommandCategory::Help => "help-circle",
            CommandCategory::History => "clock",
            CommandCategory::Device => "monitor",
            CommandCategory::Folder => "folder",
        }
    }
}

/// Ordered, read-only set of command definitions.
/// Table order is the tie-break wherever several commands match.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CommandTable {
    commands: Vec<CommandDefinition>,
}

impl CommandTable {
    /// Build a table, rejecting duplicate ids, empty alias lists and
    /// aliases claimed by more than one command
    pub fn new(commands: Vec<CommandDefinition>) -> Result<Self> {
        let table = Self { commands };
        table.validate()?;
        Ok(table)
    }

    /// The built-in command set
    pub fn builtin() -> Self {
        Self {
            commands: builtin_commands(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut ids: HashMap<&str, ()> = HashMap::new();
        let mut aliases: HashMap<&str, &str> = HashMap::new();

        for cmd in &self.commands {
            if ids.insert(cmd.id.as_str(), ()).is_some() {
                return Err(OmniboxError::DuplicateCommandId(cmd.id.clone()));
            }
            if cmd.aliases.is_empty() {
                return Err(OmniboxError::EmptyAliases(cmd.id.clone()));
            }
            for alias in &cmd.aliases {
                check_entry(&format!("command '{}' aliases", cmd.id), alias)?;
                if let Some(first) = aliases.insert(alias.as_str(), cmd.id.as_str()) {
                    if first != cmd.id {
                        return Err(OmniboxError::DuplicateAlias {
                            alias: alias.clone(),
                            first: first.to_string(),
                            second: cmd.id.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&CommandDefinition> {
        self.commands.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Fixed id -> intent lookup; unknown ids map to `Unknown`
    pub fn intent_for(&self, id: &str) -> CommandIntent {
        self.get(id)
            .map(|c| c.intent)
            .unwrap_or(CommandIntent::Unknown)
    }

    /// First command (in table order) with an alias that equals the first
    /// token, equals the whole input, or prefixes the input followed by a space
    pub fn find_by_alias(&self, tokens: &[Token]) -> Option<&CommandDefinition> {
        let first = tokens.first()?;
        let full_text = joined_text(tokens);

        self.commands.iter().find(|cmd| {
            cmd.aliases.iter().any(|alias| {
                *alias == first.value
                    || *alias == full_text
                    || full_text.starts_with(&format!("{} ", alias))
            })
        })
    }

    /// Commands whose id, any alias or description contains the query
    pub fn search(&self, query: &str) -> Vec<&CommandDefinition> {
        let query_lower = query.to_lowercase();
        self.commands
            .iter()
            .filter(|c| {
                c.id.to_lowercase().contains(&query_lower)
                    || c.aliases.iter().any(|a| a.to_lowercase().contains(&query_lower))
                    || c.description.to_lowercase().contains(&query_lower)
            })
            .collect()
    }
}

/// Table text is compared against lowercased, trimmed input, so entries
/// must already be in that form. An empty entry would match everything.
pub(crate) fn check_entry(table: &str, entry: &str) -> Result<()> {
    let reason = if entry.trim().is_empty() {
        "must not be empty"
    } else if entry.trim() != entry {
        "must not have surrounding whitespace"
    } else if entry.to_lowercase() != entry {
        "must be lowercase"
    } else {
        return Ok(());
    };

    Err(OmniboxError::InvalidEntry {
        table: table.to_string(),
        entry: entry.to_string(),
        reason,
    })
}

fn param(name: &str, kind: ParameterType, required: bool, description: &str) -> ParameterDefinition {
    ParameterDefinition {
        name: name.into(),
        kind,
        required,
        description: Some(description.into()),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Built-in command definitions, in match-priority order
fn builtin_commands() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition {
            id: "status".into(),
            aliases: strings(&["status", "overview", "dashboard", "home"]),
            intent: CommandIntent::QueryStatus,
            category: CommandCategory::Query,
            description: "Show overall sync status".into(),
            visualization: Visualization::Overview,
            examples: strings(&["status", "overview"]),
            parameters: vec![],
            action: None,
        },
        CommandDefinition {
            id: "devices".into(),
            aliases: strings(&["devices", "device", "peers", "computers"]),
            intent: CommandIntent::QueryDevice,
            category: CommandCategory::Query,
            description: "Show connected devices".into(),
            visualization: Visualization::DeviceConstellation,
            examples: strings(&["devices", "device laptop"]),
            parameters: vec![param("device", ParameterType::Device, false, "Device to focus")],
            action: None,
        },
        CommandDefinition {
            id: "folders".into(),
            aliases: strings(&["folders", "folder", "shares"]),
            intent: CommandIntent::QueryFolder,
            category: CommandCategory::Query,
            description: "Show synced folders".into(),
            visualization: Visualization::FolderExplorer,
            examples: strings(&["folders", "folder documents"]),
            parameters: vec![param("folder", ParameterType::Folder, false, "Folder to focus")],
            action: None,
        },
        CommandDefinition {
            id: "files".into(),
            aliases: strings(&["files", "browse", "find", "search"]),
            intent: CommandIntent::QueryFile,
            category: CommandCategory::Query,
            description: "Search and browse synced files".into(),
            visualization: Visualization::FileBrowser,
            examples: strings(&["find report.pdf", "browse photos"]),
            parameters: vec![param("query", ParameterType::String, false, "File name or search text")],
            action: None,
        },
        CommandDefinition {
            id: "conflicts".into(),
            aliases: strings(&["conflicts", "conflict"]),
            intent: CommandIntent::QueryConflicts,
            category: CommandCategory::Query,
            description: "Show files with sync conflicts".into(),
            visualization: Visualization::ConflictResolver,
            examples: strings(&["conflicts", "conflicts in documents"]),
            parameters: vec![param("folder", ParameterType::Folder, false, "Folder to scan")],
            action: Some("scan_for_conflicts".into()),
        },
        CommandDefinition {
            id: "storage".into(),
            aliases: strings(&["storage", "disk", "space"]),
            intent: CommandIntent::QueryStorage,
            category: CommandCategory::Query,
            description: "Show disk usage and version storage".into(),
            visualization: Visualization::StorageGlobe,
            examples: strings(&["storage", "disk usage"]),
            parameters: vec![],
            action: Some("get_version_storage_info".into()),
        },
        CommandDefinition {
            id: "bandwidth".into(),
            aliases: strings(&["bandwidth", "speed", "transfers", "traffic"]),
            intent: CommandIntent::QueryBandwidth,
            category: CommandCategory::Query,
            description: "Show transfer rates between devices".into(),
            visualization: Visualization::BandwidthFlow,
            examples: strings(&["bandwidth", "speed"]),
            parameters: vec![],
            action: None,
        },
        CommandDefinition {
            id: "errors".into(),
            aliases: strings(&["errors", "problems", "issues", "logs"]),
            intent: CommandIntent::QueryErrors,
            category: CommandCategory::Query,
            description: "Show sync errors and system logs".into(),
            visualization: Visualization::ErrorPanel,
            examples: strings(&["errors", "logs"]),
            parameters: vec![],
            action: Some("get_system_logs".into()),
        },
        CommandDefinition {
            id: "history".into(),
            aliases: strings(&["history", "changes", "activity", "timeline", "recent"]),
            intent: CommandIntent::QueryHistory,
            category: CommandCategory::Query,
            description: "Show recent file changes and events".into(),
            visualization: Visualization::Timeline,
            examples: strings(&["history", "changes last 7 days"]),
            parameters: vec![],
            action: Some("get_events".into()),
        },
        CommandDefinition {
            id: "sync".into(),
            aliases: strings(&["sync", "rescan", "refresh"]),
            intent: CommandIntent::ActionSync,
            category: CommandCategory::Action,
            description: "Rescan a folder and sync it now".into(),
            visualization: Visualization::FolderExplorer,
            examples: strings(&["sync documents", "rescan photos"]),
            parameters: vec![param("folder", ParameterType::Folder, false, "Folder to rescan")],
            action: Some("rescan_folder".into()),
        },
        CommandDefinition {
            id: "pause".into(),
            aliases: strings(&["pause", "stop"]),
            intent: CommandIntent::ActionPause,
            category: CommandCategory::Action,
            description: "Pause syncing with a device".into(),
            visualization: Visualization::DeviceConstellation,
            examples: strings(&["pause laptop"]),
            parameters: vec![param("device", ParameterType::Device, true, "Device to pause")],
            action: Some("pause_device".into()),
        },
        CommandDefinition {
            id: "resume".into(),
            aliases: strings(&["resume", "unpause", "start"]),
            intent: CommandIntent::ActionResume,
            category: CommandCategory::Action,
            description: "Resume syncing with a device".into(),
            visualization: Visualization::DeviceConstellation,
            examples: strings(&["resume laptop"]),
            parameters: vec![param("device", ParameterType::Device, true, "Device to resume")],
            action: Some("resume_device".into()),
        },
        CommandDefinition {
            id: "add-device".into(),
            aliases: strings(&["add device", "pair", "connect device"]),
            intent: CommandIntent::ActionAddDevice,
            category: CommandCategory::Action,
            description: "Pair a new device by its device id".into(),
            visualization: Visualization::DeviceConstellation,
            examples: strings(&["add device ABCD-1234 laptop", "pair ABCD-1234"]),
            parameters: vec![
                param("device_id", ParameterType::String, true, "Syncthing device id"),
                param("name", ParameterType::String, false, "Display name"),
            ],
            action: Some("add_device".into()),
        },
        CommandDefinition {
            id: "add-folder".into(),
            aliases: strings(&["add folder", "new folder"]),
            intent: CommandIntent::ActionAddFolder,
            category: CommandCategory::Action,
            description: "Start syncing a new folder".into(),
            visualization: Visualization::FolderExplorer,
            examples: strings(&["add folder ~/photos photos"]),
            parameters: vec![
                param("path", ParameterType::File, true, "Local folder path"),
                param("label", ParameterType::String, false, "Folder label"),
            ],
            action: Some("add_folder".into()),
        },
        CommandDefinition {
            id: "share".into(),
            aliases: strings(&["share"]),
            intent: CommandIntent::ActionShare,
            category: CommandCategory::Action,
            description: "Share a folder with another device".into(),
            visualization: Visualization::DeviceConstellation,
            examples: strings(&["share photos with laptop"]),
            parameters: vec![
                param("folder", ParameterType::Folder, true, "Folder to share"),
                param("device", ParameterType::Device, true, "Device to share with"),
            ],
            action: Some("share_folder".into()),
        },
        CommandDefinition {
            id: "ignore".into(),
            aliases: strings(&["ignore", "exclude"]),
            intent: CommandIntent::ActionIgnore,
            category: CommandCategory::Action,
            description: "Add an ignore pattern to a folder".into(),
            visualization: Visualization::FolderExplorer,
            examples: strings(&["ignore *.tmp", "exclude node_modules"]),
            parameters: vec![
                param("pattern", ParameterType::String, true, "Glob pattern"),
                param("folder", ParameterType::Folder, false, "Folder the pattern applies to"),
            ],
            action: Some("set_folder_ignores".into()),
        },
        CommandDefinition {
            id: "resolve".into(),
            aliases: strings(&["resolve", "keep"]),
            intent: CommandIntent::ActionResolve,
            category: CommandCategory::Action,
            description: "Resolve a conflicted file".into(),
            visualization: Visualization::ConflictResolver,
            examples: strings(&["resolve notes.md"]),
            parameters: vec![param("file", ParameterType::File, true, "Conflicted file")],
            action: Some("resolve_conflict_keep_conflict".into()),
        },
        CommandDefinition {
            id: "settings".into(),
            aliases: strings(&["settings", "preferences", "config", "options"]),
            intent: CommandIntent::NavigateSettings,
            category: CommandCategory::Navigation,
            description: "Open application settings".into(),
            visualization: Visualization::SettingsPanel,
            examples: strings(&["settings"]),
            parameters: vec![],
            action: None,
        },
        CommandDefinition {
            id: "help".into(),
            aliases: strings(&["help", "commands", "usage"]),
            intent: CommandIntent::Help,
            category: CommandCategory::Help,
            description: "List available commands".into(),
            visualization: Visualization::HelpPanel,
            examples: strings(&["help"]),
            parameters: vec![],
            action: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_builtin_table_is_valid() {
        let table = CommandTable::builtin();
        assert!(table.validate().is_ok());
        assert!(!table.is_empty());
    }

    #[test]
    fn test_find_by_first_token() {
        let table = CommandTable::builtin();
        let cmd = table.find_by_alias(&tokenize("pause laptop")).unwrap();
        assert_eq!(cmd.id, "pause");
    }

    #[test]
    fn test_find_by_multi_word_alias() {
        let table = CommandTable::builtin();
        let cmd = table.find_by_alias(&tokenize("add device ABCD")).unwrap();
        assert_eq!(cmd.id, "add-device");

        let cmd = table.find_by_alias(&tokenize("add folder")).unwrap();
        assert_eq!(cmd.id, "add-folder");
    }

    #[test]
    fn test_find_by_alias_none() {
        let table = CommandTable::builtin();
        assert!(table.find_by_alias(&tokenize("show me everything")).is_none());
        assert!(table.find_by_alias(&[]).is_none());
    }

    #[test]
    fn test_intent_for() {
        let table = CommandTable::builtin();
        assert_eq!(table.intent_for("sync"), CommandIntent::ActionSync);
        assert_eq!(table.intent_for("nope"), CommandIntent::Unknown);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut commands = builtin_commands();
        let dup = commands[0].clone();
        commands.push(dup);
        let err = CommandTable::new(commands).unwrap_err();
        assert!(matches!(err, OmniboxError::DuplicateCommandId(id) if id == "status"));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let mut commands = builtin_commands();
        commands[1].aliases.push("status".into());
        let err = CommandTable::new(commands).unwrap_err();
        assert!(matches!(err, OmniboxError::DuplicateAlias { ref alias, .. } if alias == "status"));
    }

    #[test]
    fn test_empty_aliases_rejected() {
        let mut commands = builtin_commands();
        commands[2].aliases.clear();
        let err = CommandTable::new(commands).unwrap_err();
        assert!(matches!(err, OmniboxError::EmptyAliases(_)));
    }

    #[test]
    fn test_uppercase_alias_rejected() {
        let mut commands = builtin_commands();
        commands[0].aliases[0] = "Status".into();
        let err = CommandTable::new(commands).unwrap_err();
        assert!(matches!(
            err,
            OmniboxError::InvalidEntry { ref entry, reason, .. }
                if entry == "Status" && reason == "must be lowercase"
        ));
    }

    #[test]
    fn test_blank_alias_rejected() {
        for blank in ["", "   "] {
            let mut commands = builtin_commands();
            commands[3].aliases.push(blank.into());
            let err = CommandTable::new(commands).unwrap_err();
            assert!(matches!(err, OmniboxError::InvalidEntry { reason: "must not be empty", .. }));
        }
    }

    #[test]
    fn test_padded_alias_rejected() {
        let mut commands = builtin_commands();
        commands[0].aliases.push(" home2".into());
        assert!(matches!(
            CommandTable::new(commands),
            Err(OmniboxError::InvalidEntry { reason: "must not have surrounding whitespace", .. })
        ));
    }

    #[test]
    fn test_search() {
        let table = CommandTable::builtin();
        let results = table.search("device");
        assert!(results.iter().any(|c| c.id == "devices"));
        assert!(results.iter().any(|c| c.id == "add-device"));
        assert!(results.iter().all(|c| c.id != "storage"));
    }
}
