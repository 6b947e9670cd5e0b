//! Persisted editor session: the current graph plus the last preset name.
//!
//! Stored as a versioned JSON envelope under [`UI_STATE_KEY`]:
//!
//! ```json
//! { "version": 1, "graphPayload": "<contract JSON>", "lastPresetName": "Crunch" }
//! ```
//!
//! The graph travels as an embedded contract string so the envelope and the
//! graph contract can version independently.

use fxgraph_contract::{deserialize_str, graph_state_from_payload, serialize_state};
use fxgraph_core::{GraphState, HistoryAction};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::store::KeyValueStore;

/// Storage key of the UI-state envelope.
pub const UI_STATE_KEY: &str = "fxgraph:ui-state:v1";

/// Envelope version written by this build.
pub const UI_STATE_VERSION: u32 = 1;

/// Name reported when no preset name was stored.
pub const DEFAULT_PRESET_NAME: &str = "Default Preset";

/// The stored envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiStateRecord {
    /// Envelope version, always [`UI_STATE_VERSION`].
    pub version: u32,
    /// Serialized graph contract.
    pub graph_payload: String,
    /// Name of the preset the session was last loaded from or saved as.
    pub last_preset_name: String,
}

impl UiStateRecord {
    /// Captures `state` under `last_preset_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Contract`] if the state fails validation.
    pub fn capture(state: &GraphState, last_preset_name: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            version: UI_STATE_VERSION,
            graph_payload: serialize_state(state)?,
            last_preset_name: last_preset_name.to_string(),
        })
    }

    /// Parses a stored envelope.
    ///
    /// Only `version` and `graphPayload` are required. A missing, non-string
    /// or blank `lastPresetName` becomes [`DEFAULT_PRESET_NAME`].
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, a wrong version or a missing
    /// payload string.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = value else {
            return Err(ConfigError::invalid_record("ui state must be an object"));
        };
        if map.get("version").and_then(Value::as_u64) != Some(u64::from(UI_STATE_VERSION)) {
            return Err(ConfigError::invalid_record("unsupported ui state version"));
        }
        let Some(graph_payload) = map.get("graphPayload").and_then(Value::as_str) else {
            return Err(ConfigError::invalid_record("graphPayload must be a string"));
        };
        let last_preset_name = map
            .get("lastPresetName")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_PRESET_NAME);

        Ok(Self {
            version: UI_STATE_VERSION,
            graph_payload: graph_payload.to_string(),
            last_preset_name: last_preset_name.to_string(),
        })
    }

    /// Hydrates the embedded graph.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Contract`] if the graph fails the contract.
    pub fn hydrate(&self, node_limit: usize) -> Result<LoadedUiState, ConfigError> {
        let payload = deserialize_str(&self.graph_payload)?;
        Ok(LoadedUiState {
            graph_state: graph_state_from_payload(&payload, node_limit)?,
            last_preset_name: self.last_preset_name.clone(),
        })
    }
}

/// A restored session.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedUiState {
    /// The restored graph (selection cleared, serial resumed).
    pub graph_state: GraphState,
    /// The restored preset name, never blank.
    pub last_preset_name: String,
}

impl LoadedUiState {
    /// History action that installs the restored graph without an undo step.
    pub fn into_history_action(self) -> HistoryAction {
        HistoryAction::Replace {
            state: self.graph_state,
            track_history: false,
        }
    }
}

/// Saves the session.
///
/// # Errors
///
/// Returns an error if the state fails validation or the store fails.
pub fn save_ui_state(
    store: &mut impl KeyValueStore,
    state: &GraphState,
    last_preset_name: &str,
) -> Result<(), ConfigError> {
    let record = UiStateRecord::capture(state, last_preset_name)?;
    store.set(UI_STATE_KEY, &serde_json::to_string(&record)?)
}

/// Restores the session, or `None` if nothing usable is stored.
///
/// Failures are logged at `warn` and never propagate.
pub fn load_ui_state(store: &impl KeyValueStore, node_limit: usize) -> Option<LoadedUiState> {
    let raw = match store.get(UI_STATE_KEY) {
        Ok(raw) => raw?,
        Err(err) => {
            tracing::warn!("load_ui_state: {err}");
            return None;
        }
    };
    match UiStateRecord::parse(&raw).and_then(|record| record.hydrate(node_limit)) {
        Ok(loaded) => Some(loaded),
        Err(err) => {
            tracing::warn!("load_ui_state: discarding stored session: {err}");
            None
        }
    }
}
