//! User settings stored as TOML.
//!
//! ```toml
//! node_limit = 12
//! history_limit = 500
//! state_dir = "/home/me/.fxgraph-state"
//! ```
//!
//! Every field is optional. Out-of-range values are clamped on load.

use std::path::{Path, PathBuf};

use fxgraph_core::graph::clamp_node_limit;
use fxgraph_core::{DEFAULT_HISTORY_LIMIT, DEFAULT_NODE_LIMIT, GraphHistory, GraphState};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths;
use crate::store::FileStore;

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum node count for new graphs, clamped into `8..=16`.
    pub node_limit: usize,
    /// Undo depth, at least `1`.
    pub history_limit: usize,
    /// Override for the state store directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            node_limit: DEFAULT_NODE_LIMIT,
            history_limit: DEFAULT_HISTORY_LIMIT,
            state_dir: None,
        }
    }
}

impl Settings {
    /// Parses settings from TOML and clamps them.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(toml_str)?;
        Ok(settings.clamped())
    }

    /// Renders settings as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads settings from `path`. A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::read_file(path, e)),
        }
    }

    /// Loads settings from the default location.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(paths::settings_path())
    }

    /// Saves settings to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        std::fs::write(path, self.to_toml()?).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Returns a copy with every value in range.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.node_limit = clamp_node_limit(self.node_limit);
        self.history_limit = self.history_limit.max(1);
        self
    }

    /// Directory of the state store.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(paths::default_state_dir)
    }

    /// The state store.
    pub fn store(&self) -> FileStore {
        FileStore::new(self.state_dir())
    }

    /// A history around a default graph sized by these settings.
    pub fn new_history(&self) -> GraphHistory {
        GraphHistory::with_limit(GraphState::new(self.node_limit), self.history_limit)
    }
}
