//! Compiles a canonical payload into the engine-space [`RuntimeGraph`].
//!
//! The compiled graph is index-addressed: node order matches the payload's
//! canonical order, so edge indices are stable for a given payload.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use fxgraph_core::{INPUT_NODE_ID, OUTPUT_NODE_ID};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::payload::{GraphPayload, PayloadNode};
use crate::transform::{PARAM_SLOTS, engine_params};

/// Wire names of the engine parameter slots.
pub const PARAM_KEYS: [&str; PARAM_SLOTS] = ["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9"];

/// A graph in engine space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeGraph {
    /// Contract version the graph was compiled from.
    pub schema_version: u32,
    /// Whether `output` is reachable from `input`.
    pub has_output_path: bool,
    /// Nodes in canonical order.
    pub nodes: Vec<RuntimeNode>,
    /// Edges as index pairs into `nodes`.
    pub edges: Vec<RuntimeEdge>,
}

/// A node in engine space.
///
/// Serializes flat as `{effectType, bypass, p1, ..., p9}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeNode {
    /// Engine effect id (`0` for anchors).
    pub effect_type: u8,
    /// Bypass flag. Always `true` for anchors.
    pub bypass: bool,
    /// Engine parameters `p1..p9`.
    pub params: [f32; PARAM_SLOTS],
}

impl RuntimeNode {
    /// Compiles one payload node.
    pub fn from_payload(node: &PayloadNode) -> Self {
        Self {
            effect_type: node.kind.effect_type(),
            bypass: node.kind.is_anchor() || node.bypass,
            params: engine_params(node.kind, &node.params),
        }
    }
}

impl Serialize for RuntimeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RuntimeNode", 2 + PARAM_SLOTS)?;
        state.serialize_field("effectType", &self.effect_type)?;
        state.serialize_field("bypass", &self.bypass)?;
        for (key, value) in PARAM_KEYS.into_iter().zip(&self.params) {
            state.serialize_field(key, value)?;
        }
        state.end()
    }
}

/// An edge in engine space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeEdge {
    /// Index of the source node.
    pub from_index: i32,
    /// Index of the destination node.
    pub to_index: i32,
}

/// Compiles a validated payload into engine space.
///
/// Never fails. Edges whose endpoints do not resolve are dropped.
pub fn compile(payload: &GraphPayload) -> RuntimeGraph {
    let reachable = reachable_from_input(payload);
    let has_output_path = reachable.contains(OUTPUT_NODE_ID);

    let index: HashMap<&str, i32> = payload
        .nodes
        .iter()
        .zip(0..)
        .map(|(node, i)| (node.id.as_str(), i))
        .collect();

    let edges = payload
        .edges
        .iter()
        .filter_map(|edge| {
            Some(RuntimeEdge {
                from_index: *index.get(edge.from_node_id.as_str())?,
                to_index: *index.get(edge.to_node_id.as_str())?,
            })
        })
        .collect::<Vec<_>>();

    let nodes = payload
        .nodes
        .iter()
        .map(RuntimeNode::from_payload)
        .collect::<Vec<_>>();

    tracing::debug!(
        "graph_compile: {} nodes, {} edges, output path {}",
        nodes.len(),
        edges.len(),
        has_output_path
    );

    RuntimeGraph {
        schema_version: payload.schema_version,
        has_output_path,
        nodes,
        edges,
    }
}

/// Node ids reachable from `input` by breadth-first traversal.
fn reachable_from_input(payload: &GraphPayload) -> BTreeSet<&str> {
    let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for edge in &payload.edges {
        adjacency
            .entry(edge.from_node_id.as_str())
            .or_default()
            .push(edge.to_node_id.as_str());
    }

    let mut visited = BTreeSet::new();
    if payload.node(INPUT_NODE_ID).is_none() {
        return visited;
    }
    let mut queue = VecDeque::from([INPUT_NODE_ID]);
    visited.insert(INPUT_NODE_ID);
    while let Some(id) = queue.pop_front() {
        for &next in adjacency.get(id).into_iter().flatten() {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited
}
