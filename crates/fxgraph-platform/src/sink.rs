//! Engine-side payload consumers.
//!
//! Two delivery paths sit behind [`GraphSink`]:
//!
//! - [`ParamBankSink`] decodes the payload, compiles it and writes every
//!   parameter-bank slot through a [`ParameterSink`] (plugin hosts that only
//!   expose indexed float parameters).
//! - [`StructuredSink`] posts a single [`ApplyRuntimeGraph`] JSON message
//!   through a [`MessagePort`] (hosts with a message channel).
//!
//! Both log and drop payloads that fail to decode; the previous engine state
//! stays in effect.

use fxgraph_contract::{
    ContractError, ParamBank, RuntimeEdge, RuntimeGraph, RuntimeNode, compile, deserialize_str,
    encode,
};
use serde::Serialize;

use crate::bridge::GraphSink;

/// Tag carried in the `type` field of [`ApplyRuntimeGraph`].
pub const APPLY_RUNTIME_GRAPH: &str = "applyRuntimeGraph";

/// Indexed float parameter host.
pub trait ParameterSink {
    /// Writes one host parameter.
    fn set_parameter(&mut self, index: usize, value: f32);
}

impl<F> ParameterSink for F
where
    F: FnMut(usize, f32),
{
    fn set_parameter(&mut self, index: usize, value: f32) {
        self(index, value);
    }
}

impl ParameterSink for ParamBank {
    fn set_parameter(&mut self, index: usize, value: f32) {
        self.set(index, value);
    }
}

/// Decodes payloads and writes the full parameter bank for each.
#[derive(Debug, Default)]
pub struct ParamBankSink<P> {
    target: P,
    applied: u64,
    rejected: u64,
}

impl<P: ParameterSink> ParamBankSink<P> {
    /// Wraps a parameter host.
    pub fn new(target: P) -> Self {
        Self {
            target,
            applied: 0,
            rejected: 0,
        }
    }

    /// Decodes `payload` and writes every bank slot, tagging the bank with
    /// `revision`.
    ///
    /// # Errors
    ///
    /// Returns the contract error when the payload does not decode. Nothing
    /// is written in that case.
    pub fn apply(&mut self, payload: &str, revision: u64) -> Result<usize, ContractError> {
        let graph = compile(&deserialize_str(payload)?);
        let writes = encode(&graph, revision);
        for write in &writes {
            self.target.set_parameter(write.index, write.value);
        }
        self.applied += 1;
        Ok(writes.len())
    }

    /// Number of payloads written to the host.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Number of payloads dropped because they failed to decode.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// The wrapped host.
    pub fn target(&self) -> &P {
        &self.target
    }

    /// Consumes the sink, returning the host.
    pub fn into_target(self) -> P {
        self.target
    }
}

impl<P: ParameterSink> GraphSink for ParamBankSink<P> {
    fn emit(&mut self, payload: &str, revision: u64) {
        match self.apply(payload, revision) {
            Ok(count) => tracing::trace!("param_bank_sink: revision {revision}, {count} writes"),
            Err(err) => {
                self.rejected += 1;
                tracing::warn!(code = err.code(), "param_bank_sink: dropped revision {revision}: {err}");
            }
        }
    }
}

/// Message posted to hosts with a structured channel.
///
/// Serializes as
/// `{"type":"applyRuntimeGraph","schemaVersion":1,"hasOutputPath":..,"nodes":[..],"edges":[..],"revision":..}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRuntimeGraph<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    /// Contract version of the source payload.
    pub schema_version: u32,
    /// Whether output is reachable from input.
    pub has_output_path: bool,
    /// Engine nodes in canonical order.
    pub nodes: &'a [RuntimeNode],
    /// Engine edges as index pairs.
    pub edges: &'a [RuntimeEdge],
    /// Bridge revision that produced this message.
    pub revision: u64,
}

impl<'a> ApplyRuntimeGraph<'a> {
    /// Wraps a compiled graph.
    pub fn new(graph: &'a RuntimeGraph, revision: u64) -> Self {
        Self {
            kind: APPLY_RUNTIME_GRAPH,
            schema_version: graph.schema_version,
            has_output_path: graph.has_output_path,
            nodes: &graph.nodes,
            edges: &graph.edges,
            revision,
        }
    }
}

/// Structured message channel to the engine.
pub trait MessagePort {
    /// Posts one serialized message.
    fn post_message(&mut self, message: &str);
}

impl<F> MessagePort for F
where
    F: FnMut(&str),
{
    fn post_message(&mut self, message: &str) {
        self(message);
    }
}

/// Decodes payloads and posts one [`ApplyRuntimeGraph`] message for each.
#[derive(Debug, Default)]
pub struct StructuredSink<M> {
    port: M,
}

impl<M: MessagePort> StructuredSink<M> {
    /// Wraps a message port.
    pub fn new(port: M) -> Self {
        Self { port }
    }

    /// Builds the message for `payload` without posting it.
    ///
    /// # Errors
    ///
    /// Returns the contract error when the payload does not decode.
    pub fn message(payload: &str, revision: u64) -> Result<String, ContractError> {
        let graph = compile(&deserialize_str(payload)?);
        serde_json::to_string(&ApplyRuntimeGraph::new(&graph, revision))
            .map_err(|e| ContractError::shape(e.to_string()))
    }

    /// The wrapped port.
    pub fn port(&self) -> &M {
        &self.port
    }

    /// Consumes the sink, returning the port.
    pub fn into_port(self) -> M {
        self.port
    }
}

impl<M: MessagePort> GraphSink for StructuredSink<M> {
    fn emit(&mut self, payload: &str, revision: u64) {
        match Self::message(payload, revision) {
            Ok(message) => self.port.post_message(&message),
            Err(err) => {
                tracing::warn!(code = err.code(), "structured_sink: dropped revision {revision}: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxgraph_contract::TOTAL_PARAM_COUNT;
    use fxgraph_contract::param_bank::REVISION_INDEX;
    use fxgraph_contract::serialize_state;
    use fxgraph_core::{GraphState, NodeKind};

    fn payload() -> String {
        let state = GraphState::default().add_node(NodeKind::Filter, 0.0, 0.0);
        serialize_state(&state).unwrap()
    }

    #[test]
    fn param_bank_sink_writes_full_bank() {
        let mut sink = ParamBankSink::new(ParamBank::new());
        sink.emit(&payload(), 7);
        assert_eq!(sink.applied(), 1);

        let bank = sink.into_target();
        assert_eq!(bank.as_slice().len(), TOTAL_PARAM_COUNT);
        assert_eq!(bank.revision(), 7.0);
        assert_eq!(bank.decode_header().node_count, 3.0);
    }

    #[test]
    fn param_bank_sink_drops_garbage() {
        let mut writes = 0usize;
        let mut sink = ParamBankSink::new(|_: usize, _: f32| writes += 1);
        sink.emit("{not json", 1);
        assert_eq!(sink.rejected(), 1);
        assert_eq!(sink.applied(), 0);
        drop(sink);
        assert_eq!(writes, 0);
    }

    #[test]
    fn closure_host_sees_every_index_once() {
        let mut seen = Vec::new();
        let mut sink = ParamBankSink::new(|index: usize, _: f32| seen.push(index));
        sink.emit(&payload(), 1);
        drop(sink);
        assert_eq!(seen.first(), Some(&6));
        assert_eq!(seen.last(), Some(&REVISION_INDEX));
        assert!(seen.windows(2).all(|w| w[0] + 1 == w[1]));
    }

    #[test]
    fn structured_message_shape() {
        let message = StructuredSink::<fn(&str)>::message(&payload(), 3).unwrap();
        let value: serde_json::Value = serde_json::from_str(&message).unwrap();
        assert_eq!(value["type"], "applyRuntimeGraph");
        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["hasOutputPath"], true);
        assert_eq!(value["revision"], 3);
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["nodes"][0]["effectType"], 6);
        assert!(value["nodes"][0]["p9"].is_number());
    }

    #[test]
    fn structured_sink_posts_and_drops() {
        let mut posted = Vec::new();
        let mut sink = StructuredSink::new(|m: &str| posted.push(m.to_string()));
        sink.emit(&payload(), 1);
        sink.emit("[]", 2);
        drop(sink);
        assert_eq!(posted.len(), 1);
    }
}
