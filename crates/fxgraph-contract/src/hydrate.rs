//! Rebuilds a [`GraphState`] from a payload.
//!
//! Used when loading persisted graphs and presets. The payload is validated
//! against the contract and then against the graph invariants, so a stored
//! document can never produce a state the reducer could not have produced.

use fxgraph_core::{Edge, GraphState, Node};

use crate::codec::validate;
use crate::error::ContractError;
use crate::payload::GraphPayload;

/// Hydrates a graph state from a payload.
///
/// Edge ids are re-derived from their endpoints, the selection is cleared
/// and the auto-id serial resumes after the highest `fx-<n>` id. The node
/// limit is clamped into the supported range and raised to fit the payload.
///
/// # Errors
///
/// - any [`validate`] failure
/// - [`ContractError::InvalidGraph`] if the payload breaks a graph invariant
///   (missing anchors, duplicate ids, cycles and so on)
pub fn graph_state_from_payload(
    payload: &GraphPayload,
    node_limit: usize,
) -> Result<GraphState, ContractError> {
    validate(payload)?;

    let nodes = payload
        .nodes
        .iter()
        .map(|n| Node {
            id: n.id.clone(),
            kind: n.kind,
            x: n.x,
            y: n.y,
            bypass: n.bypass,
            params: n.params.clone(),
        })
        .collect();
    let edges = payload
        .edges
        .iter()
        .map(|e| Edge::new(e.from_node_id.as_str(), e.to_node_id.as_str()))
        .collect();

    let state = GraphState::from_parts(nodes, edges, None, node_limit)?;
    tracing::debug!(
        "graph_hydrate: {} nodes, {} edges, next serial {}",
        state.nodes().len(),
        state.edges().len(),
        state.next_node_serial()
    );
    Ok(state)
}
