//! Graph edge types.
//!
//! An edge is a directed connection between two node ids. At most one edge
//! exists per ordered pair; edges are identified by that pair, never by id.

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

/// Derives the edge id for an ordered endpoint pair: `edge-<from>-<to>`.
///
/// Display label only. Node ids may contain `-`, so distinct pairs can share
/// a label (`a-b -> c` and `a -> b-c`).
pub fn edge_id(from: &str, to: &str) -> String {
    format!("edge-{from}-{to}")
}

/// A directed connection from one node to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Derived id, see [`edge_id`].
    pub id: String,
    /// Source node id.
    pub from: String,
    /// Destination node id.
    pub to: String,
}

impl Edge {
    /// Creates an edge, deriving its id from the endpoints.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        Self {
            id: edge_id(&from, &to),
            from,
            to,
        }
    }

    /// Returns `true` if this edge connects `from` to `to`.
    #[inline]
    pub fn connects(&self, from: &str, to: &str) -> bool {
        self.from == from && self.to == to
    }

    /// Returns `true` if either endpoint is `node_id`.
    #[inline]
    pub fn touches(&self, node_id: &str) -> bool {
        self.from == node_id || self.to == node_id
    }
}
