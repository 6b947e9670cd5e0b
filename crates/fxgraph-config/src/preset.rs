//! User preset records.
//!
//! Presets are named graph snapshots kept as a JSON list under
//! [`PRESETS_KEY`], newest first and capped at [`MAX_PRESETS`]. Each record
//! embeds the graph as a contract string:
//!
//! ```json
//! [{ "id": "preset-1700000000000", "name": "Crunch", "createdAt": 1700000000000,
//!    "updatedAt": 1700000000000, "graphPayload": "<contract JSON>" }]
//! ```

use fxgraph_contract::{deserialize_str, graph_state_from_payload, serialize_state};
use fxgraph_core::GraphState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::store::KeyValueStore;

/// Storage key of the preset list.
pub const PRESETS_KEY: &str = "fxgraph:presets:v1";

/// Maximum number of stored presets.
pub const MAX_PRESETS: usize = 32;

/// A saved preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetRecord {
    /// Stable id, `preset-<created millis>`.
    pub id: String,
    /// Display name, unique within the list.
    pub name: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Last update time in milliseconds since the Unix epoch.
    pub updated_at: u64,
    /// Serialized graph contract.
    pub graph_payload: String,
}

impl PresetRecord {
    /// Hydrates the preset's graph.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Contract`] if the stored graph fails the contract.
    pub fn graph_state(&self, node_limit: usize) -> Result<GraphState, ConfigError> {
        graph_state_from_preset(self, node_limit)
    }
}

/// Saves `state` as preset `name`.
///
/// The name is trimmed; a blank name leaves the list unchanged. An existing
/// preset with the same name gets the new graph and `updated_at`, keeping its
/// position. Otherwise a new record is prepended and the list truncated to
/// [`MAX_PRESETS`].
///
/// # Errors
///
/// Returns [`ConfigError::Contract`] if the state fails validation.
pub fn upsert_preset(
    presets: &[PresetRecord],
    name: &str,
    state: &GraphState,
    now: u64,
) -> Result<Vec<PresetRecord>, ConfigError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(presets.to_vec());
    }
    let graph_payload = serialize_state(state)?;

    if let Some(existing) = presets.iter().position(|p| p.name == name) {
        let mut next = presets.to_vec();
        next[existing].graph_payload = graph_payload;
        next[existing].updated_at = now;
        return Ok(next);
    }

    let mut next = Vec::with_capacity(presets.len() + 1);
    next.push(PresetRecord {
        id: format!("preset-{now}"),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
        graph_payload,
    });
    next.extend(presets.iter().cloned());
    next.truncate(MAX_PRESETS);
    Ok(next)
}

/// Removes the preset called `name`.
///
/// # Errors
///
/// Returns [`ConfigError::PresetNotFound`] if no preset has that name.
pub fn remove_preset(presets: &[PresetRecord], name: &str) -> Result<Vec<PresetRecord>, ConfigError> {
    let name = name.trim();
    if !presets.iter().any(|p| p.name == name) {
        return Err(ConfigError::PresetNotFound(name.to_string()));
    }
    Ok(presets.iter().filter(|p| p.name != name).cloned().collect())
}

/// Finds a preset by name.
pub fn find_preset<'a>(presets: &'a [PresetRecord], name: &str) -> Option<&'a PresetRecord> {
    let name = name.trim();
    presets.iter().find(|p| p.name == name)
}

/// Hydrates a preset's graph.
///
/// # Errors
///
/// Returns [`ConfigError::Contract`] if the stored graph fails the contract.
pub fn graph_state_from_preset(preset: &PresetRecord, node_limit: usize) -> Result<GraphState, ConfigError> {
    let payload = deserialize_str(&preset.graph_payload)?;
    Ok(graph_state_from_payload(&payload, node_limit)?)
}

/// Loads the stored preset list.
///
/// Malformed entries are dropped; an unreadable or non-list value loads as
/// an empty list. Never fails.
pub fn load_presets(store: &impl KeyValueStore) -> Vec<PresetRecord> {
    let raw = match store.get(PRESETS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!("load_presets: {err}");
            return Vec::new();
        }
    };
    let entries = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            tracing::warn!("load_presets: stored presets are not a list");
            return Vec::new();
        }
        Err(err) => {
            tracing::warn!("load_presets: {err}");
            return Vec::new();
        }
    };

    let total = entries.len();
    let presets: Vec<PresetRecord> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .take(MAX_PRESETS)
        .collect();
    if presets.len() < total.min(MAX_PRESETS) {
        tracing::debug!("load_presets: dropped {} malformed entries", total - presets.len());
    }
    presets
}

/// Stores the preset list, truncated to [`MAX_PRESETS`].
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn save_presets(store: &mut impl KeyValueStore, presets: &[PresetRecord]) -> Result<(), ConfigError> {
    let kept = &presets[..presets.len().min(MAX_PRESETS)];
    store.set(PRESETS_KEY, &serde_json::to_string(kept)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use fxgraph_core::NodeKind;

    fn graph(kind: NodeKind) -> GraphState {
        GraphState::default().add_node(kind, 200.0, 120.0)
    }

    #[test]
    fn insert_prepends() {
        let a = upsert_preset(&[], "First", &graph(NodeKind::Delay), 10).unwrap();
        let b = upsert_preset(&a, "  Second ", &graph(NodeKind::Reverb), 20).unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].name, "Second");
        assert_eq!(b[0].id, "preset-20");
        assert_eq!(b[1].name, "First");
    }

    #[test]
    fn update_by_name_keeps_identity() {
        let a = upsert_preset(&[], "Tone", &graph(NodeKind::Delay), 10).unwrap();
        let b = upsert_preset(&a, "Other", &graph(NodeKind::Eq), 15).unwrap();
        let c = upsert_preset(&b, "Tone", &graph(NodeKind::Chorus), 30).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c[1].id, "preset-10");
        assert_eq!(c[1].created_at, 10);
        assert_eq!(c[1].updated_at, 30);

        let restored = c[1].graph_state(8).unwrap();
        assert_eq!(restored.node("fx-1").map(|n| n.kind), Some(NodeKind::Chorus));
    }

    #[test]
    fn blank_name_is_ignored() {
        let a = upsert_preset(&[], "Tone", &graph(NodeKind::Delay), 10).unwrap();
        assert_eq!(upsert_preset(&a, "   ", &graph(NodeKind::Eq), 20).unwrap(), a);
    }

    #[test]
    fn list_is_capped() {
        let mut presets = Vec::new();
        for i in 0..40u64 {
            presets = upsert_preset(&presets, &format!("p{i}"), &GraphState::default(), i).unwrap();
        }
        assert_eq!(presets.len(), MAX_PRESETS);
        assert_eq!(presets[0].name, "p39");
        assert_eq!(presets[MAX_PRESETS - 1].name, "p8");
    }

    #[test]
    fn remove_and_find() {
        let a = upsert_preset(&[], "Tone", &graph(NodeKind::Delay), 10).unwrap();
        assert!(find_preset(&a, " Tone").is_some());
        assert!(remove_preset(&a, "Tone").unwrap().is_empty());
        assert!(matches!(
            remove_preset(&a, "Nope"),
            Err(ConfigError::PresetNotFound(name)) if name == "Nope"
        ));
    }

    #[test]
    fn store_round_trip_drops_malformed() {
        let presets = upsert_preset(&[], "Tone", &graph(NodeKind::Delay), 10).unwrap();
        let mut store = MemoryStore::new();
        save_presets(&mut store, &presets).unwrap();
        assert_eq!(load_presets(&store), presets);

        let mut entries: Vec<Value> = serde_json::from_str(&store.get(PRESETS_KEY).unwrap().unwrap()).unwrap();
        entries.push(serde_json::json!({ "id": 3, "name": "broken" }));
        entries.push(serde_json::json!("nope"));
        store.set(PRESETS_KEY, &Value::Array(entries).to_string()).unwrap();
        assert_eq!(load_presets(&store), presets);

        store.set(PRESETS_KEY, "{}").unwrap();
        assert!(load_presets(&store).is_empty());
    }

    #[test]
    fn corrupt_graph_fails_hydration() {
        let mut presets = upsert_preset(&[], "Tone", &graph(NodeKind::Delay), 10).unwrap();
        presets[0].graph_payload = "{\"schemaVersion\":1,\"nodes\":[],\"edges\":[]}".into();
        assert!(matches!(
            presets[0].graph_state(8),
            Err(ConfigError::Contract(_))
        ));
    }
}
