//! Immutable graph snapshots and the mutation reducer.
//!
//! [`GraphState`] is the single source of truth for the effect graph. It is
//! never edited in place: [`GraphState::apply`] takes a [`GraphAction`] and
//! returns a new snapshot. Rejected actions return a copy of the input with
//! [`last_error`](GraphState::last_error) set; nothing else changes.
//!
//! # Invariants
//!
//! Every state reachable through this API satisfies:
//!
//! - exactly one `input` anchor and one `output` anchor
//! - edges form a DAG (no cycles, no self edges, at most one edge per pair)
//! - `nodes().len() <= node_limit()`
//! - every edge endpoint references an existing node
//! - the selection, if any, references an existing node

#[cfg(not(feature = "std"))]
use alloc::{
    collections::BTreeSet,
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};
#[cfg(feature = "std")]
use std::collections::BTreeSet;

use super::action::GraphAction;
use super::edge::Edge;
use super::error::GraphErrorCode;
use super::node::{INPUT_NODE_ID, Node, NodeKind, OUTPUT_NODE_ID, auto_id_serial};
use super::topo::has_cycle;

/// Node limit used when none is configured.
pub const DEFAULT_NODE_LIMIT: usize = 8;

/// Upper bound for the configurable node limit (matches the contract ceiling).
pub const MAX_NODE_LIMIT: usize = 16;

/// Default canvas position of the input anchor.
pub const INPUT_POSITION: (f32, f32) = (80.0, 120.0);

/// Default canvas position of the output anchor.
pub const OUTPUT_POSITION: (f32, f32) = (460.0, 120.0);

/// Clamps a requested node limit into the supported range.
#[inline]
pub fn clamp_node_limit(limit: usize) -> usize {
    limit.clamp(DEFAULT_NODE_LIMIT, MAX_NODE_LIMIT)
}

/// An immutable snapshot of the effect graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphState {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    selected_node_id: Option<String>,
    node_limit: usize,
    next_node_serial: u32,
    last_error: Option<GraphErrorCode>,
}

impl Default for GraphState {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_LIMIT)
    }
}

impl GraphState {
    /// Creates the default graph: both anchors and a passthrough edge.
    ///
    /// `node_limit` is clamped into `8..=16`.
    pub fn new(node_limit: usize) -> Self {
        let (ix, iy) = INPUT_POSITION;
        let (ox, oy) = OUTPUT_POSITION;
        Self {
            nodes: vec![
                Node::new(INPUT_NODE_ID, NodeKind::Input, ix, iy),
                Node::new(OUTPUT_NODE_ID, NodeKind::Output, ox, oy),
            ],
            edges: vec![Edge::new(INPUT_NODE_ID, OUTPUT_NODE_ID)],
            selected_node_id: None,
            node_limit: clamp_node_limit(node_limit),
            next_node_serial: 1,
            last_error: None,
        }
    }

    /// Builds a state from raw parts, checking every graph invariant.
    ///
    /// Edge ids are re-derived from their endpoints. The auto-id serial is
    /// recomputed from existing `fx-<n>` ids. `node_limit` is clamped and then
    /// raised to fit the node count. An invalid selection collapses to `None`.
    ///
    /// # Errors
    ///
    /// - [`GraphErrorCode::NodeLimitReached`] if there are more than
    ///   [`MAX_NODE_LIMIT`] nodes
    /// - [`GraphErrorCode::DuplicateNodeId`] on repeated ids
    /// - [`GraphErrorCode::IoNodeRequired`] if the anchors are missing,
    ///   duplicated or carry the wrong id
    /// - [`GraphErrorCode::NodeNotFound`] for dangling edges
    /// - [`GraphErrorCode::SelfEdgeForbidden`], [`GraphErrorCode::EdgeAlreadyExists`]
    ///   or [`GraphErrorCode::CycleDetected`] for invalid edge sets
    pub fn from_parts(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        selected_node_id: Option<String>,
        node_limit: usize,
    ) -> Result<Self, GraphErrorCode> {
        if nodes.len() > MAX_NODE_LIMIT {
            return Err(GraphErrorCode::NodeLimitReached);
        }

        let mut ids = BTreeSet::new();
        for node in &nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(GraphErrorCode::DuplicateNodeId);
            }
        }

        let anchor_ok = |kind: NodeKind, id: &str| {
            let mut matching = nodes.iter().filter(|n| n.kind == kind);
            matches!((matching.next(), matching.next()), (Some(n), None) if n.id == id)
        };
        if !anchor_ok(NodeKind::Input, INPUT_NODE_ID) || !anchor_ok(NodeKind::Output, OUTPUT_NODE_ID)
        {
            return Err(GraphErrorCode::IoNodeRequired);
        }

        let mut pairs = BTreeSet::new();
        let mut rebuilt = Vec::with_capacity(edges.len());
        for edge in edges {
            if edge.from == edge.to {
                return Err(GraphErrorCode::SelfEdgeForbidden);
            }
            if !ids.contains(edge.from.as_str()) || !ids.contains(edge.to.as_str()) {
                return Err(GraphErrorCode::NodeNotFound);
            }
            if !pairs.insert((edge.from.clone(), edge.to.clone())) {
                return Err(GraphErrorCode::EdgeAlreadyExists);
            }
            rebuilt.push(Edge::new(edge.from, edge.to));
        }
        if has_cycle(&nodes, &rebuilt) {
            return Err(GraphErrorCode::CycleDetected);
        }

        let next_node_serial = nodes
            .iter()
            .filter_map(|n| auto_id_serial(&n.id))
            .max()
            .map_or(1, |max| max.saturating_add(1).max(1));
        let node_limit = clamp_node_limit(node_limit).max(nodes.len());
        let selected_node_id =
            selected_node_id.filter(|id| nodes.iter().any(|n| n.id == *id));

        Ok(Self {
            nodes,
            edges: rebuilt,
            selected_node_id,
            node_limit,
            next_node_serial,
            last_error: None,
        })
    }

    // --- Accessors ---

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns `true` if a node with this id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Returns `true` if an edge `from → to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.iter().any(|e| e.connects(from, to))
    }

    /// Currently selected node id.
    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node_id.as_deref()
    }

    /// Currently selected node.
    pub fn selected_node(&self) -> Option<&Node> {
        self.selected_node_id().and_then(|id| self.node(id))
    }

    /// Maximum number of nodes, anchors included.
    pub fn node_limit(&self) -> usize {
        self.node_limit
    }

    /// Serial used for the next auto-generated `fx-<n>` id.
    pub fn next_node_serial(&self) -> u32 {
        self.next_node_serial
    }

    /// Error left by the most recent action, if it was rejected.
    pub fn last_error(&self) -> Option<GraphErrorCode> {
        self.last_error
    }

    /// Returns `true` if no more nodes can be added.
    pub fn is_full(&self) -> bool {
        self.nodes.len() >= self.node_limit
    }

    /// Compares everything except `last_error`.
    pub fn same_graph(&self, other: &GraphState) -> bool {
        self.nodes == other.nodes
            && self.edges == other.edges
            && self.selected_node_id == other.selected_node_id
            && self.node_limit == other.node_limit
            && self.next_node_serial == other.next_node_serial
    }

    /// Returns a copy with `last_error` cleared.
    #[must_use]
    pub fn without_error(&self) -> GraphState {
        GraphState {
            last_error: None,
            ..self.clone()
        }
    }

    fn with_error(&self, code: GraphErrorCode) -> GraphState {
        GraphState {
            last_error: Some(code),
            ..self.clone()
        }
    }

    // --- Reducer ---

    /// Applies an action, returning the next snapshot.
    ///
    /// Never panics and never fails: a rejected action yields a copy of
    /// `self` with [`last_error`](Self::last_error) set. A successful one
    /// clears it.
    #[must_use]
    pub fn apply(&self, action: &GraphAction) -> GraphState {
        let result = match action {
            GraphAction::AddNode { kind, x, y, id } => self.try_add_node(*kind, *x, *y, id.as_deref()),
            GraphAction::RemoveNode { node_id } => self.try_remove_node(node_id),
            GraphAction::MoveNode { node_id, x, y } => self.try_move_node(node_id, *x, *y),
            GraphAction::Connect { from, to } => self.try_connect(from, to),
            GraphAction::Disconnect { from, to } => self.try_disconnect(from, to),
            GraphAction::SelectNode { node_id } => self.try_select_node(node_id.as_deref()),
            GraphAction::UpdateNodeParam {
                node_id,
                key,
                value,
            } => self.try_update_node_param(node_id, key, *value),
            GraphAction::ToggleNodeBypass { node_id } => self.try_toggle_node_bypass(node_id),
        };

        match result {
            Ok(next) => next,
            Err(code) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("graph_{}: rejected with {}", action.name(), code.code());
                self.with_error(code)
            }
        }
    }

    fn try_add_node(
        &self,
        kind: NodeKind,
        x: f32,
        y: f32,
        id: Option<&str>,
    ) -> Result<GraphState, GraphErrorCode> {
        if kind.is_anchor() {
            return Err(GraphErrorCode::IoNodeRequired);
        }
        if !(x.is_finite() && y.is_finite()) {
            return Err(GraphErrorCode::InvalidNodeParam);
        }
        if self.is_full() {
            return Err(GraphErrorCode::NodeLimitReached);
        }
        let auto = id.is_none();
        let id = id.map_or_else(|| format!("fx-{}", self.next_node_serial), ToString::to_string);
        if self.contains_node(&id) {
            return Err(GraphErrorCode::DuplicateNodeId);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_add: {kind} node {id}");

        let mut next = self.without_error();
        next.nodes.push(Node::new(id, kind, x, y));
        if auto {
            next.next_node_serial = self.next_node_serial.saturating_add(1);
        }
        Ok(next)
    }

    fn try_remove_node(&self, node_id: &str) -> Result<GraphState, GraphErrorCode> {
        if node_id == INPUT_NODE_ID || node_id == OUTPUT_NODE_ID {
            return Err(GraphErrorCode::IoNodeRequired);
        }
        if !self.contains_node(node_id) {
            return Err(GraphErrorCode::NodeNotFound);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_remove: node {node_id}");

        let mut next = self.without_error();
        next.nodes.retain(|n| n.id != node_id);
        next.edges.retain(|e| !e.touches(node_id));
        if next.selected_node_id.as_deref() == Some(node_id) {
            next.selected_node_id = None;
        }
        Ok(next)
    }

    fn try_move_node(&self, node_id: &str, x: f32, y: f32) -> Result<GraphState, GraphErrorCode> {
        if !self.contains_node(node_id) {
            return Err(GraphErrorCode::NodeNotFound);
        }
        if !(x.is_finite() && y.is_finite()) {
            return Err(GraphErrorCode::InvalidNodeParam);
        }
        self.try_update_node(node_id, |node| {
            node.x = x;
            node.y = y;
        })
    }

    // The edge count is not capped here; a graph past `MAX_EDGES` in
    // fxgraph-contract is rejected when it is serialized.
    fn try_connect(&self, from: &str, to: &str) -> Result<GraphState, GraphErrorCode> {
        if from == to {
            return Err(GraphErrorCode::SelfEdgeForbidden);
        }
        if !self.contains_node(from) || !self.contains_node(to) {
            return Err(GraphErrorCode::NodeNotFound);
        }
        if self.has_edge(from, to) {
            return Err(GraphErrorCode::EdgeAlreadyExists);
        }

        let mut edges = self.edges.clone();
        edges.push(Edge::new(from, to));
        if has_cycle(&self.nodes, &edges) {
            return Err(GraphErrorCode::CycleDetected);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_connect: {from} → {to}");

        Ok(GraphState {
            edges,
            ..self.without_error()
        })
    }

    fn try_disconnect(&self, from: &str, to: &str) -> Result<GraphState, GraphErrorCode> {
        if !self.has_edge(from, to) {
            return Err(GraphErrorCode::EdgeNotFound);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_disconnect: {from} → {to}");

        let mut next = self.without_error();
        next.edges.retain(|e| !e.connects(from, to));
        Ok(next)
    }

    fn try_select_node(&self, node_id: Option<&str>) -> Result<GraphState, GraphErrorCode> {
        if let Some(id) = node_id
            && !self.contains_node(id)
        {
            return Err(GraphErrorCode::NodeNotFound);
        }
        Ok(GraphState {
            selected_node_id: node_id.map(ToString::to_string),
            ..self.without_error()
        })
    }

    fn try_update_node_param(
        &self,
        node_id: &str,
        key: &str,
        value: f32,
    ) -> Result<GraphState, GraphErrorCode> {
        if !self.contains_node(node_id) {
            return Err(GraphErrorCode::NodeNotFound);
        }
        if !value.is_finite() {
            return Err(GraphErrorCode::InvalidNodeParam);
        }
        self.try_update_node(node_id, |node| {
            node.params.insert(key.to_string(), value);
        })
    }

    fn try_toggle_node_bypass(&self, node_id: &str) -> Result<GraphState, GraphErrorCode> {
        self.try_update_node(node_id, |node| node.bypass = !node.bypass)
    }

    fn try_update_node(
        &self,
        node_id: &str,
        edit: impl FnOnce(&mut Node),
    ) -> Result<GraphState, GraphErrorCode> {
        let mut next = self.without_error();
        let node = next
            .nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or(GraphErrorCode::NodeNotFound)?;
        edit(node);
        Ok(next)
    }

    // --- Convenience wrappers ---

    /// Adds an effect node with an auto-generated id.
    #[must_use]
    pub fn add_node(&self, kind: NodeKind, x: f32, y: f32) -> GraphState {
        self.apply(&GraphAction::AddNode { kind, x, y, id: None })
    }

    /// Adds an effect node with an explicit id.
    #[must_use]
    pub fn add_node_with_id(&self, kind: NodeKind, x: f32, y: f32, id: &str) -> GraphState {
        self.apply(&GraphAction::AddNode {
            kind,
            x,
            y,
            id: Some(id.to_string()),
        })
    }

    /// Removes a node and its incident edges.
    #[must_use]
    pub fn remove_node(&self, node_id: &str) -> GraphState {
        self.apply(&GraphAction::RemoveNode {
            node_id: node_id.to_string(),
        })
    }

    /// Moves a node.
    #[must_use]
    pub fn move_node(&self, node_id: &str, x: f32, y: f32) -> GraphState {
        self.apply(&GraphAction::MoveNode {
            node_id: node_id.to_string(),
            x,
            y,
        })
    }

    /// Connects `from → to`.
    #[must_use]
    pub fn connect(&self, from: &str, to: &str) -> GraphState {
        self.apply(&GraphAction::Connect {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Removes the edge `from → to`.
    #[must_use]
    pub fn disconnect(&self, from: &str, to: &str) -> GraphState {
        self.apply(&GraphAction::Disconnect {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Sets or clears the selection.
    #[must_use]
    pub fn select_node(&self, node_id: Option<&str>) -> GraphState {
        self.apply(&GraphAction::SelectNode {
            node_id: node_id.map(ToString::to_string),
        })
    }

    /// Sets one parameter value.
    #[must_use]
    pub fn update_node_param(&self, node_id: &str, key: &str, value: f32) -> GraphState {
        self.apply(&GraphAction::UpdateNodeParam {
            node_id: node_id.to_string(),
            key: key.to_string(),
            value,
        })
    }

    /// Flips a node's bypass flag.
    #[must_use]
    pub fn toggle_node_bypass(&self, node_id: &str) -> GraphState {
        self.apply(&GraphAction::ToggleNodeBypass {
            node_id: node_id.to_string(),
        })
    }
}
