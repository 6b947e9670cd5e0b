//! fxgraph Platform - delivery of graph snapshots to an audio engine
//!
//! This crate sits between the editor-side graph state and whatever hosts the
//! DSP engine. It watches graph snapshots, turns each distinct one into the
//! canonical contract payload and hands it to a sink that knows how to reach
//! the engine.
//!
//! # Core Abstractions
//!
//! ## Bridge
//!
//! - [`RuntimeBridge`] - Serializes snapshots, suppresses duplicates, counts revisions
//! - [`GraphSink`] - Receives `(payload, revision)` pairs
//!
//! ## Engine Sinks
//!
//! - [`ParamBankSink`] - Writes the fixed-width parameter bank through a [`ParameterSink`]
//! - [`StructuredSink`] - Posts an [`ApplyRuntimeGraph`] message through a [`MessagePort`]
//!
//! Any `FnMut(&str, u64)` closure is also a [`GraphSink`], any
//! `FnMut(usize, f32)` a [`ParameterSink`] and any `FnMut(&str)` a
//! [`MessagePort`].
//!
//! # Example
//!
//! ```rust
//! use fxgraph_contract::ParamBank;
//! use fxgraph_core::{GraphState, NodeKind};
//! use fxgraph_platform::{ParamBankSink, RuntimeBridge};
//!
//! let mut bridge = RuntimeBridge::new(ParamBankSink::new(ParamBank::new()));
//!
//! let state = GraphState::default().add_node(NodeKind::Reverb, 240.0, 120.0);
//! bridge.sync(&state);
//! bridge.sync(&state.select_node(Some("fx-1")));
//!
//! assert_eq!(bridge.revision(), 1);
//! assert_eq!(bridge.sink().target().decode_header().node_count, 3.0);
//! ```

pub mod bridge;
pub mod sink;

pub use bridge::{GraphSink, RuntimeBridge};
pub use sink::{
    APPLY_RUNTIME_GRAPH, ApplyRuntimeGraph, MessagePort, ParamBankSink, ParameterSink,
    StructuredSink,
};
