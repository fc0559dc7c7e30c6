//! Parser lookup tables
//!
//! Everything the parser and suggestion engine consult besides the input:
//! the command table, the intent -> visualization map, natural-language
//! pattern lists and the cold-start suggestion menu. Built once, then shared
//! read-only behind an `Arc`. Tables can be loaded from YAML or JSON to
//! replace the built-in set.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::commands::{check_entry, CommandCategory, CommandTable};
use crate::error::{OmniboxError, Result};
use crate::intent::{CommandIntent, IntentMatch, Visualization};
use crate::suggestions::{CommandSuggestion, SuggestionSource};

lazy_static! {
    static ref BUILTIN: Arc<ParserTables> = Arc::new(ParserTables::builtin());
}

/// Keywords that select an intent on any substring hit
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub intent: CommandIntent,
}

impl KeywordRule {
    pub fn matches(&self, text: &str) -> bool {
        contains_any(&self.keywords, text)
    }
}

/// A keyword rule that carries its own confidence
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoredRule {
    pub keywords: Vec<String>,
    pub intent: CommandIntent,
    pub confidence: f32,
}

impl ScoredRule {
    pub fn matches(&self, text: &str) -> bool {
        contains_any(&self.keywords, text)
    }
}

fn contains_any(keywords: &[String], text: &str) -> bool {
    keywords.iter().any(|k| text.contains(k.as_str()))
}

/// A leading action verb. Verbs without an intent classify as `unknown`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActionVerb {
    pub verb: String,
    #[serde(default)]
    pub intent: Option<CommandIntent>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VisualizationRoute {
    pub intent: CommandIntent,
    pub visualization: Visualization,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParserTables {
    pub commands: CommandTable,
    pub visualizations: Vec<VisualizationRoute>,
    pub question_starters: Vec<String>,
    pub question_rules: Vec<ScoredRule>,
    pub question_default: IntentMatch,
    pub action_verbs: Vec<ActionVerb>,
    pub status_refinements: Vec<KeywordRule>,
    pub fuzzy_groups: Vec<KeywordRule>,
    pub time_expressions: Vec<String>,
    pub default_suggestions: Vec<CommandSuggestion>,
}

impl ParserTables {
    /// Shared handle to the built-in tables
    pub fn shared() -> Arc<ParserTables> {
        Arc::clone(&BUILTIN)
    }

    pub fn builtin() -> Self {
        Self {
            commands: CommandTable::builtin(),
            visualizations: builtin_visualizations(),
            question_starters: strings(&[
                "what", "why", "how", "where", "when", "which", "who", "is", "are", "can",
                "does", "do",
            ]),
            question_rules: vec![
                scored(&["sync", "transfer"], CommandIntent::QueryBandwidth, 0.8),
                scored(&["slow", "isn't", "not"], CommandIntent::QueryErrors, 0.7),
                scored(&["change", "different", "history"], CommandIntent::QueryHistory, 0.8),
                scored(&["space", "storage", "size"], CommandIntent::QueryStorage, 0.8),
            ],
            question_default: IntentMatch::new(CommandIntent::QueryStatus, 0.5),
            action_verbs: vec![
                verb("show", Some(CommandIntent::QueryStatus)),
                verb("display", Some(CommandIntent::QueryStatus)),
                verb("list", Some(CommandIntent::QueryStatus)),
                verb("view", Some(CommandIntent::QueryStatus)),
                verb("open", Some(CommandIntent::QueryStatus)),
                verb("sync", Some(CommandIntent::ActionSync)),
                verb("pause", Some(CommandIntent::ActionPause)),
                verb("stop", Some(CommandIntent::ActionPause)),
                verb("resume", Some(CommandIntent::ActionResume)),
                verb("start", Some(CommandIntent::ActionResume)),
                verb("share", Some(CommandIntent::ActionShare)),
                verb("ignore", Some(CommandIntent::ActionIgnore)),
                verb("resolve", Some(CommandIntent::ActionResolve)),
                verb("find", Some(CommandIntent::QueryFile)),
                verb("add", None),
            ],
            status_refinements: vec![
                rule(&["device"], CommandIntent::QueryDevice),
                rule(&["folder"], CommandIntent::QueryFolder),
                rule(&["conflict"], CommandIntent::QueryConflicts),
                rule(&["storage"], CommandIntent::QueryStorage),
                rule(&["bandwidth"], CommandIntent::QueryBandwidth),
                rule(&["error"], CommandIntent::QueryErrors),
            ],
            fuzzy_groups: vec![
                rule(&["device", "computer", "machine", "peer", "phone", "laptop"], CommandIntent::QueryDevice),
                rule(&["folder", "directory", "share"], CommandIntent::QueryFolder),
                rule(&["conflict", "duplicate", "collision"], CommandIntent::QueryConflicts),
                rule(&["storage", "space", "disk", "size", "usage"], CommandIntent::QueryStorage),
                rule(&["bandwidth", "speed", "transfer", "upload", "download", "rate"], CommandIntent::QueryBandwidth),
                rule(&["error", "fail", "problem", "issue", "broken", "wrong"], CommandIntent::QueryErrors),
                rule(&["history", "change", "recent", "activity", "modified", "log"], CommandIntent::QueryHistory),
            ],
            time_expressions: strings(&[
                "today",
                "yesterday",
                "this week",
                "last week",
                "this month",
                "last month",
                "last hour",
                "past hour",
                "last 24 hours",
                "recently",
            ]),
            default_suggestions: builtin_default_suggestions(),
        }
    }

    /// Load tables from a `.yaml`/`.yml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| OmniboxError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let tables = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            "json" => Self::from_json_str(&content)?,
            other => return Err(OmniboxError::UnsupportedFormat(other.to_string())),
        };

        tracing::debug!(
            path = %path.display(),
            commands = tables.commands.len(),
            "loaded parser tables"
        );
        Ok(tables)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let tables: ParserTables = serde_yaml::from_str(content)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let tables: ParserTables = serde_json::from_str(content)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Command table invariants, a visualization for every intent, scores
    /// within [0, 1] and lowercase non-empty match text
    pub fn validate(&self) -> Result<()> {
        self.commands.validate()?;
        for intent in CommandIntent::ALL {
            if !self.visualizations.iter().any(|r| r.intent == intent) {
                return Err(OmniboxError::MissingVisualization(intent));
            }
        }

        check_score("question_default.confidence", self.question_default.confidence)?;
        for rule in &self.question_rules {
            check_score("question_rules.confidence", rule.confidence)?;
        }
        for suggestion in &self.default_suggestions {
            check_score("default_suggestions.score", suggestion.score)?;
        }

        let keyword_lists = [
            ("question_starters", self.question_starters.iter().collect::<Vec<_>>()),
            ("question_rules", self.question_rules.iter().flat_map(|r| &r.keywords).collect()),
            ("action_verbs", self.action_verbs.iter().map(|v| &v.verb).collect()),
            ("status_refinements", self.status_refinements.iter().flat_map(|r| &r.keywords).collect()),
            ("fuzzy_groups", self.fuzzy_groups.iter().flat_map(|r| &r.keywords).collect()),
            ("time_expressions", self.time_expressions.iter().collect()),
        ];
        for (table, entries) in keyword_lists {
            for entry in entries {
                check_entry(table, entry)?;
            }
        }

        Ok(())
    }

    /// View to open for an intent; overview when unmapped
    pub fn visualization_for(&self, intent: CommandIntent) -> Visualization {
        self.visualizations
            .iter()
            .find(|r| r.intent == intent)
            .map(|r| r.visualization)
            .unwrap_or(Visualization::Overview)
    }

    pub fn is_question_starter(&self, word: &str) -> bool {
        self.question_starters.iter().any(|q| q == word)
    }

    pub fn action_verb(&self, word: &str) -> Option<&ActionVerb> {
        self.action_verbs.iter().find(|v| v.verb == word)
    }
}

fn check_score(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(OmniboxError::ScoreOutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

impl Default for ParserTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn rule(keywords: &[&str], intent: CommandIntent) -> KeywordRule {
    KeywordRule {
        keywords: strings(keywords),
        intent,
    }
}

fn scored(keywords: &[&str], intent: CommandIntent, confidence: f32) -> ScoredRule {
    ScoredRule {
        keywords: strings(keywords),
        intent,
        confidence,
    }
}

fn verb(verb: &str, intent: Option<CommandIntent>) -> ActionVerb {
    ActionVerb {
        verb: verb.into(),
        intent,
    }
}

fn builtin_visualizations() -> Vec<VisualizationRoute> {
    use CommandIntent::*;

    [
        (QueryStatus, Visualization::Overview),
        (QueryDevice, Visualization::DeviceConstellation),
        (QueryFolder, Visualization::FolderExplorer),
        (QueryFile, Visualization::FileBrowser),
        (QueryConflicts, Visualization::ConflictResolver),
        (QueryStorage, Visualization::StorageGlobe),
        (QueryBandwidth, Visualization::BandwidthFlow),
        (QueryErrors, Visualization::ErrorPanel),
        (QueryHistory, Visualization::Timeline),
        (ActionSync, Visualization::FolderExplorer),
        (ActionPause, Visualization::DeviceConstellation),
        (ActionResume, Visualization::DeviceConstellation),
        (ActionAddDevice, Visualization::DeviceConstellation),
        (ActionAddFolder, Visualization::FolderExplorer),
        (ActionShare, Visualization::DeviceConstellation),
        (ActionIgnore, Visualization::FolderExplorer),
        (ActionResolve, Visualization::ConflictResolver),
        (NavigateSettings, Visualization::SettingsPanel),
        (Help, Visualization::HelpPanel),
        (Unknown, Visualization::Overview),
    ]
    .into_iter()
    .map(|(intent, visualization)| VisualizationRoute {
        intent,
        visualization,
    })
    .collect()
}

fn default_suggestion(
    id: &str,
    text: &str,
    description: &str,
    icon: &str,
    category: CommandCategory,
    score: f32,
    visualization: Visualization,
) -> CommandSuggestion {
    CommandSuggestion {
        id: id.into(),
        text: text.into(),
        description: description.into(),
        icon: icon.into(),
        category,
        score,
        source: SuggestionSource::Command,
        visualization: Some(visualization),
    }
}

/// Cold-start menu shown for empty input
fn builtin_default_suggestions() -> Vec<CommandSuggestion> {
    vec![
        default_suggestion(
            "default-status",
            "status",
            "Show overall sync status",
            "activity",
            CommandCategory::Query,
            1.0,
            Visualization::Overview,
        ),
        default_suggestion(
            "default-devices",
            "devices",
            "Show connected devices",
            "monitor",
            CommandCategory::Query,
            0.9,
            Visualization::DeviceConstellation,
        ),
        default_suggestion(
            "default-folders",
            "folders",
            "Show synced folders",
            "folder",
            CommandCategory::Query,
            0.85,
            Visualization::FolderExplorer,
        ),
        default_suggestion(
            "default-conflicts",
            "conflicts",
            "Show files with sync conflicts",
            "alert-triangle",
            CommandCategory::Query,
            0.8,
            Visualization::ConflictResolver,
        ),
        default_suggestion(
            "default-storage",
            "storage",
            "Show disk usage and version storage",
            "hard-drive",
            CommandCategory::Query,
            0.75,
            Visualization::StorageGlobe,
        ),
        default_suggestion(
            "default-help",
            "help",
            "List available commands",
            "help-circle",
            CommandCategory::Help,
            0.7,
            Visualization::HelpPanel,
        ),
    ]
}
