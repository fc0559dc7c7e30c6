//! Omnibox suggestion engine
//!
//! Ranks completions for partial input from the command table, recent
//! history and known devices/folders. Regenerated on every keystroke.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::commands::CommandCategory;
use crate::config::OmniboxConfig;
use crate::intent::Visualization;
use crate::tables::ParserTables;

pub const PREFIX_SCORE: f32 = 1.0;
pub const DESCRIPTION_SCORE: f32 = 0.7;
pub const HISTORY_SCORE: f32 = 0.6;
pub const CONTEXT_SCORE: f32 = 0.5;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    Command,
    History,
    Ai,
    Context,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CommandSuggestion {
    pub id: String,
    /// Text to place in the omnibox when accepted
    pub text: String,
    pub description: String,
    pub icon: String,
    pub category: CommandCategory,
    pub score: f32,
    pub source: SuggestionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Visualization>,
}

/// Known names and past inputs to draw suggestions from
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SuggestionContext {
    #[serde(default)]
    pub devices: Vec<String>,
    #[serde(default)]
    pub folders: Vec<String>,
    /// Past omnibox inputs, most recent first
    #[serde(default)]
    pub history: Vec<String>,
}

pub struct SuggestionEngine {
    tables: Arc<ParserTables>,
    max_suggestions: usize,
    history_window: usize,
}

impl SuggestionEngine {
    pub fn new(tables: Arc<ParserTables>) -> Self {
        Self::with_config(tables, &OmniboxConfig::default())
    }

    pub fn with_config(tables: Arc<ParserTables>, config: &OmniboxConfig) -> Self {
        Self {
            tables,
            max_suggestions: config.max_suggestions,
            history_window: config.history_window,
        }
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    /// Suggestions for partial input, best first
    pub fn suggest(&self, input: &str, context: &SuggestionContext) -> Vec<CommandSuggestion> {
        let query = input.trim().to_lowercase();

        if query.is_empty() {
            return self.tables.default_suggestions.clone();
        }

        let mut suggestions = self.command_suggestions(&query);
        suggestions.extend(self.history_suggestions(&query, &context.history));
        suggestions.extend(context_suggestions(&query, context));

        // stable: equal scores keep command -> history -> context order
        suggestions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        suggestions.truncate(self.max_suggestions);

        tracing::trace!(query = %query, count = suggestions.len(), "generated suggestions");
        suggestions
    }

    /// One suggestion per command: its first alias matching by prefix,
    /// or by description
    fn command_suggestions(&self, query: &str) -> Vec<CommandSuggestion> {
        let mut suggestions = Vec::new();

        for cmd in self.tables.commands.iter() {
            let description_hit = cmd.description.to_lowercase().contains(query);

            for alias in &cmd.aliases {
                let prefix_hit = alias.starts_with(query);
                if !prefix_hit && !description_hit {
                    continue;
                }

                suggestions.push(CommandSuggestion {
                    id: format!("command-{}", cmd.id),
                    text: alias.clone(),
                    description: cmd.description.clone(),
                    icon: cmd.category.icon().to_string(),
                    category: cmd.category,
                    score: if prefix_hit { PREFIX_SCORE } else { DESCRIPTION_SCORE },
                    source: SuggestionSource::Command,
                    visualization: Some(cmd.visualization),
                });
                break;
            }
        }

        suggestions
    }

    fn history_suggestions(&self, query: &str, history: &[String]) -> Vec<CommandSuggestion> {
        history
            .iter()
            .take(self.history_window)
            .enumerate()
            .filter(|(_, entry)| entry.to_lowercase().contains(query))
            .map(|(i, entry)| CommandSuggestion {
                id: format!("history-{}", i),
                text: entry.clone(),
                description: "Recent command".into(),
                icon: CommandCategory::History.icon().to_string(),
                category: CommandCategory::History,
                score: HISTORY_SCORE,
                source: SuggestionSource::History,
                visualization: None,
            })
            .collect()
    }
}

fn context_suggestions(query: &str, context: &SuggestionContext) -> Vec<CommandSuggestion> {
    let devices = context
        .devices
        .iter()
        .filter(|d| d.to_lowercase().contains(query))
        .map(|d| CommandSuggestion {
            id: format!("device-{}", d),
            text: format!("device {}", d),
            description: format!("Show device {}", d),
            icon: CommandCategory::Device.icon().to_string(),
            category: CommandCategory::Device,
            score: CONTEXT_SCORE,
            source: SuggestionSource::Context,
            visualization: Some(Visualization::DeviceConstellation),
        });

    let folders = context
        .folders
        .iter()
        .filter(|f| f.to_lowercase().contains(query))
        .map(|f| CommandSuggestion {
            id: format!("folder-{}", f),
            text: format!("folder {}", f),
            description: format!("Show folder {}", f),
            icon: CommandCategory::Folder.icon().to_string(),
            category: CommandCategory::Folder,
            score: CONTEXT_SCORE,
            source: SuggestionSource::Context,
            visualization: Some(Visualization::FolderExplorer),
        });

    devices.chain(folders).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SuggestionEngine {
        SuggestionEngine::new(ParserTables::shared())
    }

    fn context(devices: &[&str], folders: &[&str], history: &[&str]) -> SuggestionContext {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        SuggestionContext {
            devices: owned(devices),
            folders: owned(folders),
            history: owned(history),
        }
    }

    #[test]
    fn test_empty_input_returns_defaults() {
        let s = engine().suggest("   ", &SuggestionContext::default());
        assert_eq!(s.len(), 6);
        assert_eq!(s[0].text, "status");
        assert_eq!(s[0].score, 1.0);
        let texts: Vec<&str> = s.iter().map(|x| x.text.as_str()).collect();
        assert_eq!(texts, vec!["status", "devices", "folders", "conflicts", "storage", "help"]);
    }

    #[test]
    fn test_prefix_match() {
        let s = engine().suggest("pau", &SuggestionContext::default());
        assert_eq!(s[0].text, "pause");
        assert_eq!(s[0].score, PREFIX_SCORE);
        assert_eq!(s[0].source, SuggestionSource::Command);
    }

    #[test]
    fn test_one_suggestion_per_command() {
        // "conflicts" and "conflict" both prefix-match the same command
        let s = engine().suggest("conf", &SuggestionContext::default());
        let conflict_hits = s.iter().filter(|x| x.id == "command-conflicts").count();
        assert_eq!(conflict_hits, 1);
        assert_eq!(s.iter().find(|x| x.id == "command-conflicts").unwrap().text, "conflicts");
    }

    #[test]
    fn test_description_match_scores_lower() {
        let s = engine().suggest("transfer rates", &SuggestionContext::default());
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].id, "command-bandwidth");
        assert_eq!(s[0].text, "bandwidth");
        assert_eq!(s[0].score, DESCRIPTION_SCORE);
    }

    #[test]
    fn test_history_and_context() {
        let ctx = context(&["Work Laptop"], &["Laptop Backups"], &["pause laptop", "status"]);
        let s = engine().suggest("laptop", &ctx);

        let sources: Vec<SuggestionSource> = s.iter().map(|x| x.source).collect();
        assert_eq!(
            sources,
            vec![SuggestionSource::History, SuggestionSource::Context, SuggestionSource::Context]
        );
        assert_eq!(s[0].text, "pause laptop");
        assert_eq!(s[1].text, "device Work Laptop");
        assert_eq!(s[2].text, "folder Laptop Backups");
    }

    #[test]
    fn test_history_window() {
        let history: Vec<String> = (0..15).map(|i| format!("sync folder{}", i)).collect();
        let ctx = SuggestionContext {
            history,
            ..Default::default()
        };
        let mut config = OmniboxConfig::default();
        config.max_suggestions = 50;
        let engine = SuggestionEngine::with_config(ParserTables::shared(), &config);

        let s = engine.suggest("folder1", &ctx);
        // folder1, folder10..folder14 exist, but only the 10 most recent entries are scanned
        let history_hits: Vec<&str> = s
            .iter()
            .filter(|x| x.source == SuggestionSource::History)
            .map(|x| x.text.as_str())
            .collect();
        assert_eq!(history_hits, vec!["sync folder1"]);
    }

    #[test]
    fn test_capped_and_sorted() {
        let devices: Vec<String> = (0..20).map(|i| format!("s-device-{}", i)).collect();
        let ctx = SuggestionContext {
            devices,
            ..Default::default()
        };
        let engine = engine();
        let s = engine.suggest("s", &ctx);

        assert_eq!(s.len(), engine.max_suggestions());
        assert!(s.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
