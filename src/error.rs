//! Error types for omnibox_core
//!
//! Parsing and suggestion generation never fail. Errors only come from
//! loading configuration or command tables from disk and validating them.

use std::path::PathBuf;
use thiserror::Error;

use crate::intent::CommandIntent;

#[derive(Debug, Error)]
pub enum OmniboxError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("duplicate command id: {0}")]
    DuplicateCommandId(String),

    #[error("alias '{alias}' is claimed by both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("command '{0}' has no aliases")]
    EmptyAliases(String),

    #[error("no visualization mapped for intent {0}")]
    MissingVisualization(CommandIntent),

    #[error("{table} entry '{entry}' is invalid: {reason}")]
    InvalidEntry {
        table: String,
        entry: String,
        reason: &'static str,
    },

    #[error("{field} must be within 0..=1, got {value}")]
    ScoreOutOfRange { field: String, value: f32 },

    #[error("unsupported table format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, OmniboxError>;
