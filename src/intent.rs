//! Intents and visualizations
//!
//! The closed set of things a user can ask the omnibox for, and the views
//! the frontend switches to in response.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a piece of omnibox input is asking for
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum CommandIntent {
    // Queries
    QueryStatus,
    QueryDevice,
    QueryFolder,
    QueryFile,
    QueryConflicts,
    QueryStorage,
    QueryBandwidth,
    QueryErrors,
    QueryHistory,

    // Actions against the sync backend
    ActionSync,
    ActionPause,
    ActionResume,
    ActionAddDevice,
    ActionAddFolder,
    ActionShare,
    ActionIgnore,
    ActionResolve,

    NavigateSettings,
    Help,
    Unknown,
}

impl CommandIntent {
    pub const ALL: [CommandIntent; 20] = [
        CommandIntent::QueryStatus,
        CommandIntent::QueryDevice,
        CommandIntent::QueryFolder,
        CommandIntent::QueryFile,
        CommandIntent::QueryConflicts,
        CommandIntent::QueryStorage,
        CommandIntent::QueryBandwidth,
        CommandIntent::QueryErrors,
        CommandIntent::QueryHistory,
        CommandIntent::ActionSync,
        CommandIntent::ActionPause,
        CommandIntent::ActionResume,
        CommandIntent::ActionAddDevice,
        CommandIntent::ActionAddFolder,
        CommandIntent::ActionShare,
        CommandIntent::ActionIgnore,
        CommandIntent::ActionResolve,
        CommandIntent::NavigateSettings,
        CommandIntent::Help,
        CommandIntent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandIntent::QueryStatus => "query-status",
            CommandIntent::QueryDevice => "query-device",
            CommandIntent::QueryFolder => "query-folder",
            CommandIntent::QueryFile => "query-file",
            CommandIntent::QueryConflicts => "query-conflicts",
            CommandIntent::QueryStorage => "query-storage",
            CommandIntent::QueryBandwidth => "query-bandwidth",
            CommandIntent::QueryErrors => "query-errors",
            CommandIntent::QueryHistory => "query-history",
            CommandIntent::ActionSync => "action-sync",
            CommandIntent::ActionPause => "action-pause",
            CommandIntent::ActionResume => "action-resume",
            CommandIntent::ActionAddDevice => "action-add-device",
            CommandIntent::ActionAddFolder => "action-add-folder",
            CommandIntent::ActionShare => "action-share",
            CommandIntent::ActionIgnore => "action-ignore",
            CommandIntent::ActionResolve => "action-resolve",
            CommandIntent::NavigateSettings => "navigate-settings",
            CommandIntent::Help => "help",
            CommandIntent::Unknown => "unknown",
        }
    }

    pub fn is_action(&self) -> bool {
        self.as_str().starts_with("action-")
    }
}

impl fmt::Display for CommandIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target view for a parsed command. Opaque to the parser.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Visualization {
    Overview,
    DeviceConstellation,
    FolderExplorer,
    FileBrowser,
    ConflictResolver,
    StorageGlobe,
    BandwidthFlow,
    ErrorPanel,
    Timeline,
    SettingsPanel,
    HelpPanel,
}

impl Visualization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visualization::Overview => "overview",
            Visualization::DeviceConstellation => "device-constellation",
            Visualization::FolderExplorer => "folder-explorer",
            Visualization::FileBrowser => "file-browser",
            Visualization::ConflictResolver => "conflict-resolver",
            Visualization::StorageGlobe => "storage-globe",
            Visualization::BandwidthFlow => "bandwidth-flow",
            Visualization::ErrorPanel => "error-panel",
            Visualization::Timeline => "timeline",
            Visualization::SettingsPanel => "settings-panel",
            Visualization::HelpPanel => "help-panel",
        }
    }
}

impl fmt::Display for Visualization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of intent classification
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct IntentMatch {
    pub intent: CommandIntent,
    /// Heuristic certainty in [0, 1]; not a calibrated probability
    pub confidence: f32,
}

impl IntentMatch {
    pub fn new(intent: CommandIntent, confidence: f32) -> Self {
        Self { intent, confidence }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_wire_names_match_display() {
        for intent in CommandIntent::ALL {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(json, format!("\"{}\"", intent));
        }
    }

    #[test]
    fn test_visualization_wire_name() {
        let json = serde_json::to_string(&Visualization::DeviceConstellation).unwrap();
        assert_eq!(json, "\"device-constellation\"");
    }

    #[test]
    fn test_is_action() {
        assert!(CommandIntent::ActionSync.is_action());
        assert!(!CommandIntent::QueryStatus.is_action());
        assert!(!CommandIntent::Unknown.is_action());
    }
}
