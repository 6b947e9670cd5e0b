//! Error types for contract operations.

use fxgraph_core::GraphErrorCode;
use thiserror::Error;

/// Errors raised while validating, parsing or hydrating a graph payload.
///
/// Each variant maps to a stable `ERR_*` code, see [`ContractError::code`].
/// Shape errors (the document is not a payload at all) are kept distinct
/// from semantic errors (a well-formed payload that breaks a rule).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContractError {
    /// Malformed document or a field of the wrong type.
    #[error("invalid payload shape: {0}")]
    InvalidPayloadShape(String),

    /// Missing or unsupported `schemaVersion`.
    #[error("unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// Zero nodes or more than the node ceiling.
    #[error("node count {count} outside 1..={max}")]
    NodeLimitReached {
        /// Node count in the payload.
        count: usize,
        /// Hard ceiling.
        max: usize,
    },

    /// More edges than the edge ceiling.
    #[error("edge count {count} exceeds {max}")]
    EdgeLimitReached {
        /// Edge count in the payload.
        count: usize,
        /// Hard ceiling.
        max: usize,
    },

    /// Node kind outside the closed enumeration.
    #[error("invalid node kind '{kind}' on node '{node}'")]
    InvalidNodeKind {
        /// Offending node id (empty if the id itself was unreadable).
        node: String,
        /// Kind string as found.
        kind: String,
    },

    /// Non-numeric or non-finite parameter value.
    #[error("invalid value for parameter '{param}' on node '{node}'")]
    InvalidNodeParam {
        /// Offending node id.
        node: String,
        /// Parameter key.
        param: String,
    },

    /// Edge endpoint not in the node set.
    #[error("edge {from} -> {to} references a missing node")]
    EdgeNodeNotFound {
        /// Source node id.
        from: String,
        /// Destination node id.
        to: String,
    },

    /// Payload is well-formed but cannot become a graph state.
    #[error("payload violates graph invariants: {0}")]
    InvalidGraph(GraphErrorCode),
}

impl ContractError {
    /// Stable `ERR_*` code string.
    pub fn code(&self) -> &'static str {
        match self {
            ContractError::InvalidPayloadShape(_) => "ERR_INVALID_PAYLOAD_SHAPE",
            ContractError::UnsupportedSchemaVersion(_) => "ERR_UNSUPPORTED_SCHEMA_VERSION",
            ContractError::NodeLimitReached { .. } => "ERR_NODE_LIMIT_REACHED",
            ContractError::EdgeLimitReached { .. } => "ERR_EDGE_LIMIT_REACHED",
            ContractError::InvalidNodeKind { .. } => "ERR_INVALID_NODE_KIND",
            ContractError::InvalidNodeParam { .. } => "ERR_INVALID_NODE_PARAM",
            ContractError::EdgeNodeNotFound { .. } => "ERR_EDGE_NODE_NOT_FOUND",
            ContractError::InvalidGraph(code) => code.code(),
        }
    }

    /// Create a shape error.
    pub fn shape(reason: impl Into<String>) -> Self {
        ContractError::InvalidPayloadShape(reason.into())
    }
}

impl From<GraphErrorCode> for ContractError {
    fn from(code: GraphErrorCode) -> Self {
        ContractError::InvalidGraph(code)
    }
}
