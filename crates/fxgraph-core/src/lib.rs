//! fxgraph Core - effect graph state, history and parameter schema
//!
//! This crate holds the editor-side model of an effect routing graph: a
//! DAG of effect nodes between a fixed `input` and `output` anchor, edited
//! through a closed set of actions that each produce a new immutable
//! snapshot.
//!
//! # Core Abstractions
//!
//! ## Graph Model
//!
//! - [`GraphState`] - Immutable snapshot, the single source of truth
//! - [`GraphAction`] - The closed set of mutations
//! - [`GraphErrorCode`] - Why an action was rejected
//!
//! ## History
//!
//! - [`GraphHistory`] - Bounded undo/redo over shared snapshots
//! - [`HistoryAction`] - Graph mutations plus undo, redo, reset and replace
//!
//! ## Parameter Schema
//!
//! - [`ParamSpec`] - Range, default, slider scale and display format
//! - [`param_specs`] / [`resolve_param`] / [`format_param`]
//!
//! # Example
//!
//! ```rust
//! use fxgraph_core::{GraphAction, GraphHistory, NodeKind};
//!
//! let mut history = GraphHistory::default();
//! history.dispatch(GraphAction::AddNode {
//!     kind: NodeKind::Reverb,
//!     x: 240.0,
//!     y: 120.0,
//!     id: None,
//! });
//! assert_eq!(history.present().nodes().len(), 3);
//!
//! history.undo();
//! assert_eq!(history.present().nodes().len(), 2);
//! ```
//!
//! # Design Principles
//!
//! - **Never throws**: rejected actions surface as `last_error` on the result
//! - **Snapshots, not mutation**: every transition yields a new state
//! - **No dependencies on std**: `no_std` + `alloc` with `libm` for math

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod graph;
pub mod history;
pub mod math;
pub mod param_schema;

pub use graph::{
    DEFAULT_NODE_LIMIT, Edge, GraphAction, GraphErrorCode, GraphState, INPUT_NODE_ID,
    MAX_NODE_LIMIT, Node, NodeKind, OUTPUT_NODE_ID,
};
pub use history::{DEFAULT_HISTORY_LIMIT, GraphHistory, HistoryAction};
pub use param_schema::{
    ParamFormat, ParamScale, ParamSpec, default_params, format_param, param_spec, param_specs,
    param_value, resolve_param,
};
