//! Wire contract types (schema version 1).
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "nodes": [{ "id": "fx-1", "kind": "delay", "x": 200, "y": 120,
//!               "bypass": false, "params": { "mix": 25 } }],
//!   "edges": [{ "fromNodeId": "input", "toNodeId": "fx-1" }]
//! }
//! ```
//!
//! A [`GraphPayload`] is a canonical projection of a graph: nodes sorted by
//! id, params sorted by key, edges sorted by `(from, to)`. It is derived on
//! demand and never stored as the source of truth.

use std::collections::BTreeMap;

use fxgraph_core::NodeKind;
use serde::{Serialize, Serializer};

/// The only supported contract version.
pub const GRAPH_SCHEMA_VERSION: u32 = 1;

/// Hard ceiling on nodes in a payload.
pub const MAX_NODES: usize = 16;

/// Hard ceiling on edges in a payload.
pub const MAX_EDGES: usize = 64;

/// A graph in canonical wire form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPayload {
    /// Contract version, see [`GRAPH_SCHEMA_VERSION`].
    pub schema_version: u32,
    /// Nodes sorted by id.
    pub nodes: Vec<PayloadNode>,
    /// Edges sorted by `(from, to)`.
    pub edges: Vec<PayloadEdge>,
}

/// A node in wire form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadNode {
    /// Node id.
    pub id: String,
    /// Node kind, serialized by wire name.
    #[serde(serialize_with = "serialize_kind")]
    pub kind: NodeKind,
    /// Canvas x position.
    pub x: f32,
    /// Canvas y position.
    pub y: f32,
    /// Bypass flag.
    pub bypass: bool,
    /// Parameter values sorted by key.
    pub params: BTreeMap<String, f32>,
}

/// An edge in wire form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadEdge {
    /// Source node id.
    pub from_node_id: String,
    /// Destination node id.
    pub to_node_id: String,
}

impl PayloadEdge {
    /// Creates an edge.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from_node_id: from.into(),
            to_node_id: to.into(),
        }
    }
}

impl GraphPayload {
    /// Sorts nodes by id and edges by `(from, to)`.
    pub fn sort(&mut self) {
        self.nodes.sort_by(|a, b| a.id.cmp(&b.id));
        self.edges.sort();
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&PayloadNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

fn serialize_kind<S: Serializer>(kind: &NodeKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(kind.as_str())
}
