//! The closed set of graph mutations.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use super::node::NodeKind;

/// A single graph mutation, applied with [`GraphState::apply`](super::GraphState::apply).
#[derive(Debug, Clone, PartialEq)]
pub enum GraphAction {
    /// Adds an effect node. `id: None` auto-generates `fx-<serial>`.
    AddNode {
        /// Effect kind. Anchor kinds are rejected.
        kind: NodeKind,
        /// Canvas x position.
        x: f32,
        /// Canvas y position.
        y: f32,
        /// Explicit id, or `None` to auto-generate.
        id: Option<String>,
    },
    /// Removes a node and every incident edge.
    RemoveNode {
        /// Node to remove.
        node_id: String,
    },
    /// Updates a node's canvas position.
    MoveNode {
        /// Node to move.
        node_id: String,
        /// New x position.
        x: f32,
        /// New y position.
        y: f32,
    },
    /// Adds a directed edge.
    Connect {
        /// Source node id.
        from: String,
        /// Destination node id.
        to: String,
    },
    /// Removes a directed edge.
    Disconnect {
        /// Source node id.
        from: String,
        /// Destination node id.
        to: String,
    },
    /// Sets or clears the selection.
    SelectNode {
        /// Node to select, or `None` to clear.
        node_id: Option<String>,
    },
    /// Sets a single parameter value.
    UpdateNodeParam {
        /// Target node.
        node_id: String,
        /// Parameter key.
        key: String,
        /// New value. Must be finite.
        value: f32,
    },
    /// Flips a node's bypass flag.
    ToggleNodeBypass {
        /// Target node.
        node_id: String,
    },
}

impl GraphAction {
    /// Short action name, used in log events.
    pub const fn name(&self) -> &'static str {
        match self {
            GraphAction::AddNode { .. } => "addNode",
            GraphAction::RemoveNode { .. } => "removeNode",
            GraphAction::MoveNode { .. } => "moveNode",
            GraphAction::Connect { .. } => "connect",
            GraphAction::Disconnect { .. } => "disconnect",
            GraphAction::SelectNode { .. } => "selectNode",
            GraphAction::UpdateNodeParam { .. } => "updateNodeParam",
            GraphAction::ToggleNodeBypass { .. } => "toggleNodeBypass",
        }
    }

    /// Navigation actions change what is focused, not the graph itself.
    /// The history never records them.
    pub const fn is_navigation(&self) -> bool {
        matches!(self, GraphAction::SelectNode { .. })
    }
}
