//! Effect graph model.
//!
//! A directed acyclic graph of effect nodes between two fixed anchors,
//! `input` and `output`. The graph is edited through a closed set of
//! [`GraphAction`]s, each producing a new immutable [`GraphState`].
//!
//! # Architecture
//!
//! ```text
//! GraphState ──apply(GraphAction)──▶ GraphState'
//!     │                                  │
//!     └── last_error = None on success   └── last_error = Some(code) on rejection,
//!                                            everything else unchanged
//! ```
//!
//! Cycle checks use Kahn's algorithm over the tentative edge set, see
//! [`has_cycle`].
//!
//! # Example
//!
//! ```rust
//! use fxgraph_core::graph::{GraphErrorCode, GraphState, NodeKind};
//!
//! let state = GraphState::default()
//!     .add_node(NodeKind::Delay, 200.0, 120.0)
//!     .connect("input", "fx-1")
//!     .connect("fx-1", "output");
//! assert!(state.last_error().is_none());
//!
//! let rejected = state.connect("output", "fx-1");
//! assert_eq!(rejected.last_error(), Some(GraphErrorCode::CycleDetected));
//! ```

mod action;
mod edge;
mod error;
mod node;
mod state;
mod topo;

pub use action::GraphAction;
pub use edge::{Edge, edge_id};
pub use error::GraphErrorCode;
pub use node::{
    INPUT_NODE_ID, Node, NodeKind, OUTPUT_NODE_ID, UnknownNodeKind, auto_id_serial, is_anchor_id,
};
pub use state::{
    DEFAULT_NODE_LIMIT, GraphState, INPUT_POSITION, MAX_NODE_LIMIT, OUTPUT_POSITION,
    clamp_node_limit,
};
pub use topo::has_cycle;
