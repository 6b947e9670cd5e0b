//! Flattens a [`RuntimeGraph`] into a fixed-width numbered parameter bank.
//!
//! The engine only understands a flat array of scalar parameters. The bank
//! occupies a fixed address range after the host-owned parameters:
//!
//! ```text
//! index   0..6     host parameters (not written here)
//!         6..10    header: schema version, node count, edge count, has-output-path
//!        10..186   16 node slots x 11: effect type, bypass, p1..p9
//!       186..314   64 edge slots x 2: from index, to index
//!       314        revision counter
//! ```
//!
//! Every slot is written on every encode. Unused node slots carry the
//! sentinel `0, 1, 1, 0...`, unused edge slots `-1, -1`, so a shrinking
//! graph never leaves stale data behind.

use serde::Serialize;

use crate::compile::{RuntimeEdge, RuntimeGraph, RuntimeNode};
use crate::payload::{MAX_EDGES, MAX_NODES};
use crate::transform::PARAM_SLOTS;

/// Parameters owned by the host, before the bank.
pub const HOST_PARAM_COUNT: usize = 6;
/// First header slot.
pub const HEADER_OFFSET: usize = HOST_PARAM_COUNT;
/// Header slots: version, node count, edge count, has-output-path.
pub const HEADER_SIZE: usize = 4;
/// Slots per node: effect type, bypass, p1..p9.
pub const NODE_STRIDE: usize = 2 + PARAM_SLOTS;
/// First node slot.
pub const NODE_BANK_OFFSET: usize = HEADER_OFFSET + HEADER_SIZE;
/// Slots per edge: from index, to index.
pub const EDGE_STRIDE: usize = 2;
/// First edge slot.
pub const EDGE_BANK_OFFSET: usize = NODE_BANK_OFFSET + NODE_STRIDE * MAX_NODES;
/// Revision counter slot.
pub const REVISION_INDEX: usize = EDGE_BANK_OFFSET + EDGE_STRIDE * MAX_EDGES;
/// Total parameter count, host parameters included.
pub const TOTAL_PARAM_COUNT: usize = REVISION_INDEX + 1;
/// Number of writes produced by [`encode`].
pub const BANK_WRITE_COUNT: usize = TOTAL_PARAM_COUNT - HEADER_OFFSET;

/// One absolute parameter write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamWrite {
    /// Absolute parameter index.
    pub index: usize,
    /// Value to write.
    pub value: f32,
}

const UNUSED_NODE: RuntimeNode = RuntimeNode {
    effect_type: 0,
    bypass: true,
    params: [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
};

const UNUSED_EDGE: RuntimeEdge = RuntimeEdge {
    from_index: -1,
    to_index: -1,
};

#[inline]
fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

/// Encodes a compiled graph into bank writes, in ascending index order.
///
/// Always returns exactly [`BANK_WRITE_COUNT`] writes. Nodes and edges past
/// the ceilings are dropped. The revision is stored as `f32`, so it is exact
/// only up to 2^24.
#[allow(clippy::cast_precision_loss)]
pub fn encode(graph: &RuntimeGraph, revision: u64) -> Vec<ParamWrite> {
    let node_count = graph.nodes.len().min(MAX_NODES);
    let edge_count = graph.edges.len().min(MAX_EDGES);

    let mut values = Vec::with_capacity(BANK_WRITE_COUNT);
    values.extend([
        graph.schema_version as f32,
        node_count as f32,
        edge_count as f32,
        flag(graph.has_output_path),
    ]);

    for slot in 0..MAX_NODES {
        let node = graph.nodes.get(slot).unwrap_or(&UNUSED_NODE);
        values.push(f32::from(node.effect_type));
        values.push(flag(node.bypass));
        values.extend_from_slice(&node.params);
    }

    for slot in 0..MAX_EDGES {
        let edge = graph.edges.get(slot).unwrap_or(&UNUSED_EDGE);
        values.push(edge.from_index as f32);
        values.push(edge.to_index as f32);
    }

    values.push(revision as f32);

    debug_assert_eq!(values.len(), BANK_WRITE_COUNT);
    values
        .into_iter()
        .enumerate()
        .map(|(offset, value)| ParamWrite {
            index: HEADER_OFFSET + offset,
            value,
        })
        .collect()
}

/// Decoded bank header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BankHeader {
    /// Contract version.
    pub schema_version: f32,
    /// Number of used node slots.
    pub node_count: f32,
    /// Number of used edge slots.
    pub edge_count: f32,
    /// Whether `output` is reachable from `input`.
    pub has_output_path: bool,
}

/// An in-memory mirror of the full parameter array.
///
/// Stands in for the engine side in tests and tools: apply writes, then read
/// slots back by absolute index.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamBank {
    values: Vec<f32>,
}

impl Default for ParamBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamBank {
    /// Creates a zeroed bank of [`TOTAL_PARAM_COUNT`] slots.
    pub fn new() -> Self {
        Self {
            values: vec![0.0; TOTAL_PARAM_COUNT],
        }
    }

    /// Sets one slot. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Applies a batch of writes.
    pub fn apply(&mut self, writes: &[ParamWrite]) {
        for write in writes {
            self.set(write.index, write.value);
        }
    }

    /// Reads one slot.
    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    /// All slots.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Reads the header block.
    pub fn decode_header(&self) -> BankHeader {
        let h = &self.values[HEADER_OFFSET..HEADER_OFFSET + HEADER_SIZE];
        BankHeader {
            schema_version: h[0],
            node_count: h[1],
            edge_count: h[2],
            has_output_path: h[3] != 0.0,
        }
    }

    /// The slots of node slot `slot`, or `None` past the ceiling.
    pub fn node_slot(&self, slot: usize) -> Option<&[f32]> {
        if slot >= MAX_NODES {
            return None;
        }
        let start = NODE_BANK_OFFSET + slot * NODE_STRIDE;
        Some(&self.values[start..start + NODE_STRIDE])
    }

    /// `(from, to)` of edge slot `slot`, or `None` past the ceiling.
    pub fn edge_slot(&self, slot: usize) -> Option<(f32, f32)> {
        if slot >= MAX_EDGES {
            return None;
        }
        let start = EDGE_BANK_OFFSET + slot * EDGE_STRIDE;
        Some((self.values[start], self.values[start + 1]))
    }

    /// The revision counter.
    pub fn revision(&self) -> f32 {
        self.values[REVISION_INDEX]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::normalize;
    use crate::compile::compile;
    use fxgraph_core::{GraphState, NodeKind};

    #[test]
    fn layout_constants() {
        assert_eq!(NODE_STRIDE, 11);
        assert_eq!(NODE_BANK_OFFSET, 10);
        assert_eq!(EDGE_BANK_OFFSET, 186);
        assert_eq!(REVISION_INDEX, 314);
        assert_eq!(TOTAL_PARAM_COUNT, 315);
        assert_eq!(BANK_WRITE_COUNT, 309);
    }

    #[test]
    fn writes_cover_the_bank_in_order() {
        let graph = compile(&normalize(&GraphState::default()).unwrap());
        let writes = encode(&graph, 7);
        assert_eq!(writes.len(), BANK_WRITE_COUNT);
        for (i, write) in writes.iter().enumerate() {
            assert_eq!(write.index, HEADER_OFFSET + i);
        }
    }

    #[test]
    fn default_graph_bank() {
        let graph = compile(&normalize(&GraphState::default()).unwrap());
        let mut bank = ParamBank::new();
        bank.apply(&encode(&graph, 3));

        let header = bank.decode_header();
        assert_eq!(header.schema_version, 1.0);
        assert_eq!(header.node_count, 2.0);
        assert_eq!(header.edge_count, 1.0);
        assert!(header.has_output_path);
        assert_eq!(bank.edge_slot(0), Some((0.0, 1.0)));
        assert_eq!(bank.revision(), 3.0);
        assert!(bank.as_slice()[..HEADER_OFFSET].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn unused_slots_carry_sentinels() {
        let state = GraphState::default().add_node(NodeKind::Chorus, 0.0, 0.0);
        let graph = compile(&normalize(&state).unwrap());
        let mut bank = ParamBank::new();
        bank.apply(&encode(&graph, 1));

        for slot in 3..MAX_NODES {
            let node = bank.node_slot(slot).unwrap();
            assert_eq!(node[0], 0.0, "slot {slot} effect type");
            assert_eq!(node[1], 1.0, "slot {slot} bypass");
            assert_eq!(node[2], 1.0, "slot {slot} p1");
            assert!(node[3..].iter().all(|&v| v == 0.0));
        }
        for slot in 1..MAX_EDGES {
            assert_eq!(bank.edge_slot(slot), Some((-1.0, -1.0)));
        }
        assert!(bank.node_slot(MAX_NODES).is_none());
        assert!(bank.edge_slot(MAX_EDGES).is_none());
    }

    #[test]
    fn shrinking_graph_overwrites_stale_slots() {
        let big = GraphState::default()
            .add_node(NodeKind::Delay, 0.0, 0.0)
            .add_node(NodeKind::Reverb, 0.0, 0.0)
            .connect("input", "fx-1")
            .connect("fx-1", "fx-2");
        let mut bank = ParamBank::new();
        bank.apply(&encode(&compile(&normalize(&big).unwrap()), 1));
        assert_eq!(bank.node_slot(1).unwrap()[0], 7.0);

        bank.apply(&encode(&compile(&normalize(&GraphState::default()).unwrap()), 2));
        assert_eq!(bank.decode_header().node_count, 2.0);
        assert_eq!(bank.node_slot(2).unwrap()[0], 0.0);
        assert_eq!(bank.edge_slot(1), Some((-1.0, -1.0)));
        assert_eq!(bank.edge_slot(2), Some((-1.0, -1.0)));
    }

    #[test]
    fn effect_slot_layout() {
        let state = GraphState::default()
            .add_node(NodeKind::Distortion, 0.0, 0.0)
            .update_node_param("fx-1", "drive", 100.0)
            .update_node_param("fx-1", "mix", 50.0)
            .toggle_node_bypass("fx-1");
        let mut bank = ParamBank::new();
        bank.apply(&encode(&compile(&normalize(&state).unwrap()), 9));
        let slot = bank.node_slot(0).unwrap();
        assert_eq!(slot[0], 4.0);
        assert_eq!(slot[1], 1.0);
        assert_eq!(slot[2], 1.0);
        assert_eq!(slot[6], 0.5);
        assert!(slot[7..].iter().all(|&v| v == 0.0));
    }
}
