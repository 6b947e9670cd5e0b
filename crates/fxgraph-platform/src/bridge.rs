//! Change-deduplicating bridge from graph snapshots to an engine sink.
//!
//! [`RuntimeBridge`] re-serializes every observed [`GraphState`] into its
//! canonical payload string and forwards it only when the string differs from
//! the last one sent. Normalization imposes a canonical order, so graphs that
//! differ only in insertion order, selection or `last_error` never cause a
//! redundant emission.
//!
//! Only one payload is remembered: changing a graph and reverting it emits
//! twice, once per distinct string observed in sequence.
//!
//! # Example
//!
//! ```rust
//! use fxgraph_core::{GraphState, NodeKind};
//! use fxgraph_platform::RuntimeBridge;
//!
//! let mut sent = Vec::new();
//! let mut bridge = RuntimeBridge::new(|payload: &str, revision: u64| {
//!     sent.push((payload.len(), revision));
//! });
//!
//! let state = GraphState::default();
//! assert_eq!(bridge.sync(&state), Some(1));
//! assert_eq!(bridge.sync(&state), None);
//! assert_eq!(bridge.sync(&state.add_node(NodeKind::Delay, 0.0, 0.0)), Some(2));
//! drop(bridge);
//! assert_eq!(sent.len(), 2);
//! ```

use fxgraph_contract::serialize_state;
use fxgraph_core::GraphState;

/// Receives canonical payload strings together with their revision.
pub trait GraphSink {
    /// Delivers one payload. `revision` increases by one per emission.
    fn emit(&mut self, payload: &str, revision: u64);
}

impl<F> GraphSink for F
where
    F: FnMut(&str, u64),
{
    fn emit(&mut self, payload: &str, revision: u64) {
        self(payload, revision);
    }
}

/// Serializes graph snapshots and forwards each distinct payload once.
#[derive(Debug)]
pub struct RuntimeBridge<S> {
    sink: S,
    last_payload: Option<String>,
    revision: u64,
}

impl<S: GraphSink> RuntimeBridge<S> {
    /// Creates a bridge at revision `0` that has sent nothing yet.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            last_payload: None,
            revision: 0,
        }
    }

    /// Observes a graph snapshot.
    ///
    /// Returns the new revision when a payload was emitted, `None` when the
    /// canonical payload is unchanged or the state failed contract validation.
    /// Validation failures are logged and the cycle is skipped.
    pub fn sync(&mut self, state: &GraphState) -> Option<u64> {
        let payload = match serialize_state(state) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(code = err.code(), "runtime_bridge: skipping sync: {err}");
                return None;
            }
        };
        if self.last_payload.as_deref() == Some(payload.as_str()) {
            return None;
        }

        self.revision += 1;
        tracing::debug!(
            "runtime_bridge: emit revision {} ({} bytes)",
            self.revision,
            payload.len()
        );
        self.sink.emit(&payload, self.revision);
        self.last_payload = Some(payload);
        Some(self.revision)
    }

    /// Revision of the last emission (`0` before the first).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The last payload sent.
    pub fn last_payload(&self) -> Option<&str> {
        self.last_payload.as_deref()
    }

    /// Forgets the last payload so the next sync always emits.
    ///
    /// The revision keeps counting up.
    pub fn invalidate(&mut self) {
        self.last_payload = None;
    }

    /// The sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the bridge, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
