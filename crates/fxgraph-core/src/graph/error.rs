//! Mutation error codes.
//!
//! Mutation errors are never raised: a failed action returns the previous
//! graph with [`GraphState::last_error`](super::GraphState::last_error) set.

use core::fmt;

/// Diagnostic code for a rejected graph mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphErrorCode {
    /// The graph already holds `node_limit` nodes.
    NodeLimitReached,
    /// A node with this id already exists.
    DuplicateNodeId,
    /// The operation would remove or duplicate an `input`/`output` anchor.
    IoNodeRequired,
    /// The referenced node does not exist.
    NodeNotFound,
    /// An edge from a node to itself was requested.
    SelfEdgeForbidden,
    /// An edge for this ordered pair already exists.
    EdgeAlreadyExists,
    /// The edge would close a cycle.
    CycleDetected,
    /// No edge exists for this ordered pair.
    EdgeNotFound,
    /// A parameter value or node position is not a finite number.
    InvalidNodeParam,
}

impl GraphErrorCode {
    /// Stable `ERR_*` code string.
    pub const fn code(self) -> &'static str {
        match self {
            GraphErrorCode::NodeLimitReached => "ERR_NODE_LIMIT_REACHED",
            GraphErrorCode::DuplicateNodeId => "ERR_DUPLICATE_NODE_ID",
            GraphErrorCode::IoNodeRequired => "ERR_IO_NODE_REQUIRED",
            GraphErrorCode::NodeNotFound => "ERR_NODE_NOT_FOUND",
            GraphErrorCode::SelfEdgeForbidden => "ERR_SELF_EDGE_FORBIDDEN",
            GraphErrorCode::EdgeAlreadyExists => "ERR_EDGE_ALREADY_EXISTS",
            GraphErrorCode::CycleDetected => "ERR_CYCLE_DETECTED",
            GraphErrorCode::EdgeNotFound => "ERR_EDGE_NOT_FOUND",
            GraphErrorCode::InvalidNodeParam => "ERR_INVALID_NODE_PARAM",
        }
    }

    /// Short description for display.
    pub const fn description(self) -> &'static str {
        match self {
            GraphErrorCode::NodeLimitReached => "node limit reached",
            GraphErrorCode::DuplicateNodeId => "duplicate node id",
            GraphErrorCode::IoNodeRequired => "input and output nodes are required",
            GraphErrorCode::NodeNotFound => "node not found",
            GraphErrorCode::SelfEdgeForbidden => "a node cannot connect to itself",
            GraphErrorCode::EdgeAlreadyExists => "edge already exists",
            GraphErrorCode::CycleDetected => "connection would create a cycle",
            GraphErrorCode::EdgeNotFound => "edge not found",
            GraphErrorCode::InvalidNodeParam => "parameter and position values must be finite",
        }
    }
}

impl fmt::Display for GraphErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GraphErrorCode {}
