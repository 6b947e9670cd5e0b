//! Key-value persistence backends.
//!
//! Everything fxgraph persists (the current graph, the UI-state envelope, the
//! preset list) is a string stored under a versioned key. [`KeyValueStore`]
//! abstracts the backend; [`MemoryStore`] backs tests and [`FileStore`] keeps
//! one file per key in a directory.
//!
//! The graph payload itself is stored under [`GRAPH_PAYLOAD_KEY`] through
//! [`load_payload`] and [`save_payload`]. Loading never fails: a missing or
//! corrupt entry reads as "nothing stored".

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fxgraph_contract::{GraphPayload, deserialize_str, serialize};

use crate::error::ConfigError;

/// Storage key of the persisted graph payload.
pub const GRAPH_PAYLOAD_KEY: &str = "fxgraph:graph:v1";

/// String store addressed by key.
pub trait KeyValueStore {
    /// Reads the value under `key`, `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), ConfigError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ConfigError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store: one `<sanitised key>.json` file per key.
///
/// The directory is created on first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds `key`.
    ///
    /// ```rust
    /// use fxgraph_config::FileStore;
    /// use std::path::Path;
    ///
    /// let store = FileStore::new("/tmp/fx");
    /// assert_eq!(
    ///     store.path_for("fxgraph:presets:v1"),
    ///     Path::new("/tmp/fx/fxgraph_presets_v1.json")
    /// );
    /// ```
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitise_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::read_file(path, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)
                .map_err(|e| ConfigError::create_dir(&self.dir, e))?;
        }
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|e| ConfigError::write_file(&path, e))?;
        tracing::debug!(key, path = %path.display(), "stored {} bytes", value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ConfigError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfigError::remove_file(path, e)),
        }
    }
}

/// Maps a key onto a portable file stem.
fn sanitise_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Loads the persisted graph payload.
///
/// Missing, unreadable and contract-violating entries all read as `None`.
pub fn load_payload(store: &impl KeyValueStore) -> Option<GraphPayload> {
    let raw = match store.get(GRAPH_PAYLOAD_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!("load_payload: {err}");
            return None;
        }
    };
    match deserialize_str(&raw) {
        Ok(payload) => Some(payload),
        Err(err) => {
            tracing::warn!(code = err.code(), "load_payload: discarding stored graph: {err}");
            None
        }
    }
}

/// Persists a graph payload.
///
/// # Errors
///
/// Returns an error if the payload fails validation or the store fails.
pub fn save_payload(store: &mut impl KeyValueStore, payload: &GraphPayload) -> Result<(), ConfigError> {
    let json = serialize(payload)?;
    store.set(GRAPH_PAYLOAD_KEY, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxgraph_contract::normalize;
    use fxgraph_core::{GraphState, NodeKind};

    #[test]
    fn memory_store_basics() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set("k", "w").unwrap();
        assert_eq!(store.len(), 1);
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn sanitise_replaces_separators() {
        assert_eq!(sanitise_key("fxgraph:ui-state:v1"), "fxgraph_ui-state_v1");
        assert_eq!(sanitise_key("../etc/passwd"), ".._etc_passwd");
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get("a:b").unwrap(), None);

        store.set("a:b", "hello").unwrap();
        assert!(store.path_for("a:b").is_file());
        assert_eq!(store.get("a:b").unwrap().as_deref(), Some("hello"));

        store.remove("a:b").unwrap();
        store.remove("a:b").unwrap();
        assert_eq!(store.get("a:b").unwrap(), None);
    }

    #[test]
    fn payload_round_trip() {
        let state = GraphState::default().add_node(NodeKind::Eq, 200.0, 80.0);
        let payload = normalize(&state).unwrap();

        let mut store = MemoryStore::new();
        assert!(load_payload(&store).is_none());
        save_payload(&mut store, &payload).unwrap();
        assert_eq!(load_payload(&store), Some(payload));
    }

    #[test]
    fn corrupt_payload_reads_as_missing() {
        let mut store = MemoryStore::new();
        store.set(GRAPH_PAYLOAD_KEY, "{\"schemaVersion\":2,\"nodes\":[],\"edges\":[]}").unwrap();
        assert!(load_payload(&store).is_none());
        store.set(GRAPH_PAYLOAD_KEY, "garbage").unwrap();
        assert!(load_payload(&store).is_none());
    }
}
