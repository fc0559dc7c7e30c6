//! Omnibox configuration
//!
//! JSON settings file under the app's config directory
//! (`<config_dir>/eigen/omnibox.json`). Every field has a default, so a
//! partial or missing file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OmniboxError, Result};

pub const APP_DIR: &str = "eigen";
pub const CONFIG_FILE: &str = "omnibox.json";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OmniboxConfig {
    /// Upper bound on suggestions returned per keystroke
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// How many recent history entries are scanned for suggestions
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Run the similarity enhancement after the deterministic parse
    #[serde(default)]
    pub enable_ai: bool,

    /// Minimum similarity before an enhancement may replace an intent
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,

    /// Parser tables to load instead of the built-in set
    #[serde(default)]
    pub tables_path: Option<PathBuf>,
}

fn default_max_suggestions() -> usize {
    8
}

fn default_history_window() -> usize {
    10
}

fn default_min_similarity() -> f32 {
    0.75
}

impl Default for OmniboxConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            history_window: default_history_window(),
            enable_ai: false,
            min_similarity: default_min_similarity(),
            tables_path: None,
        }
    }
}

impl OmniboxConfig {
    /// `<config_dir>/eigen/omnibox.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit path. A missing file yields defaults;
    /// a malformed one is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| OmniboxError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(serde_json::from_str(&contents)?)
    }

    /// Load from the default location, falling back to defaults on any problem
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable omnibox config");
                Self::default()
            }
        }
    }

    /// Write atomically: temp file, then rename over the target
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source| OmniboxError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, json).map_err(io_err)?;
        fs::rename(&temp_path, path).map_err(io_err)?;
        Ok(())
    }
}
