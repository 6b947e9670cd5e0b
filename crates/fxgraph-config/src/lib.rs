//! Persistence, presets and settings for fxgraph.
//!
//! Everything here sits on the load/save edge of the editor. Stored graphs
//! are untrusted: every load path validates against the wire contract and
//! degrades to "nothing stored" instead of failing.
//!
//! # Features
//!
//! - **Stores**: [`KeyValueStore`] with in-memory and directory backends
//! - **Graph persistence**: [`load_payload`] / [`save_payload`]
//! - **Session state**: versioned UI-state envelope ([`save_ui_state`], [`load_ui_state`])
//! - **Presets**: named graph snapshots, newest first, capped at [`MAX_PRESETS`]
//! - **Factory Presets**: built-in graphs that need no store
//! - **Settings**: TOML settings and platform paths
//!
//! # Example
//!
//! ```rust
//! use fxgraph_config::{MemoryStore, load_ui_state, save_ui_state, get_factory_preset};
//!
//! let crunch = get_factory_preset("crunch").unwrap();
//!
//! let mut store = MemoryStore::new();
//! save_ui_state(&mut store, &crunch.graph, "Crunch").unwrap();
//!
//! let restored = load_ui_state(&store, 8).unwrap();
//! assert_eq!(restored.last_preset_name, "Crunch");
//! assert!(restored.graph_state.contains_node("fx-3"));
//! ```

mod error;
mod preset;
mod settings;
mod store;
mod ui_state;

/// Platform-specific paths for settings and state.
pub mod paths;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, FactoryPreset, factory_presets, get_factory_preset, is_factory_preset,
};
pub use preset::{
    MAX_PRESETS, PRESETS_KEY, PresetRecord, find_preset, graph_state_from_preset, load_presets,
    remove_preset, save_presets, upsert_preset,
};
pub use settings::Settings;
pub use store::{
    FileStore, GRAPH_PAYLOAD_KEY, KeyValueStore, MemoryStore, load_payload, save_payload,
};
pub use ui_state::{
    DEFAULT_PRESET_NAME, LoadedUiState, UI_STATE_KEY, UI_STATE_VERSION, UiStateRecord,
    load_ui_state, save_ui_state,
};
