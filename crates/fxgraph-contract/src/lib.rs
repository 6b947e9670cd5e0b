//! Versioned wire contract and engine compiler for fxgraph.
//!
//! Turns editor-side [`GraphState`](fxgraph_core::GraphState) snapshots into
//! what crosses the boundary to the audio engine, and back:
//!
//! ```text
//! GraphState ──normalize──▶ GraphPayload ──serialize──▶ JSON
//!      ▲                        │   ▲                     │
//!      └──── hydrate ───────────┘   └──── deserialize ────┘
//!                               │
//!                            compile
//!                               ▼
//!                         RuntimeGraph ──encode(revision)──▶ [ParamWrite; 309]
//! ```
//!
//! # Modules
//!
//! - [`codec`] - canonical projection, validation, JSON (de)serialization
//! - [`compile`] - reachability, index remapping, engine-space nodes
//! - [`transform`] - per-kind user → engine parameter mapping
//! - [`param_bank`] - fixed-width parameter bank layout and encoder
//! - [`hydrate`] - payload → graph state
//!
//! # Example
//!
//! ```rust
//! use fxgraph_contract::{compile, encode, normalize, BANK_WRITE_COUNT};
//! use fxgraph_core::{GraphState, NodeKind};
//!
//! let state = GraphState::default()
//!     .add_node(NodeKind::Reverb, 240.0, 120.0)
//!     .connect("input", "fx-1");
//! let payload = normalize(&state).unwrap();
//! let runtime = compile(&payload);
//! assert!(runtime.has_output_path);
//!
//! let writes = encode(&runtime, 1);
//! assert_eq!(writes.len(), BANK_WRITE_COUNT);
//! ```

pub mod codec;
pub mod compile;
pub mod error;
pub mod hydrate;
pub mod param_bank;
pub mod payload;
pub mod transform;

pub use codec::{deserialize, deserialize_str, normalize, serialize, serialize_state, validate};
pub use compile::{RuntimeEdge, RuntimeGraph, RuntimeNode, compile};
pub use error::ContractError;
pub use hydrate::graph_state_from_payload;
pub use param_bank::{
    BANK_WRITE_COUNT, BankHeader, ParamBank, ParamWrite, TOTAL_PARAM_COUNT, encode,
};
pub use payload::{GRAPH_SCHEMA_VERSION, GraphPayload, MAX_EDGES, MAX_NODES, PayloadEdge, PayloadNode};
