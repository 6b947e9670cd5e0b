//! Topological checks over node/edge lists.

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, vec, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use super::edge::Edge;
use super::node::Node;

// --- Kahn's topological sort ---

/// Returns `true` if `edges` contain a cycle over `nodes`.
///
/// Runs Kahn's algorithm: nodes with zero in-degree are removed repeatedly;
/// if fewer nodes are visited than exist, a cycle remains. Self edges count
/// as cycles. Edges whose endpoints are unknown are ignored.
pub fn has_cycle(nodes: &[Node], edges: &[Edge]) -> bool {
    let n = nodes.len();
    let index: BTreeMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();

    let mut in_degree = vec![0u32; n];
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];

    for edge in edges {
        let (Some(&from), Some(&to)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str()))
        else {
            continue;
        };
        outgoing[from].push(to);
        in_degree[to] += 1;
    }

    // Seed queue with zero in-degree nodes.
    let mut queue: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut visited = 0usize;

    while let Some(idx) = queue.pop() {
        visited += 1;
        for &to in &outgoing[idx] {
            in_degree[to] -= 1;
            if in_degree[to] == 0 {
                queue.push(to);
            }
        }
    }

    visited != n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter()
            .map(|id| Node::new(*id, NodeKind::Delay, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn chain_is_acyclic() {
        let nodes = nodes(&["a", "b", "c"]);
        let edges = vec![Edge::new("a", "b"), Edge::new("b", "c")];
        assert!(!has_cycle(&nodes, &edges));
    }

    #[test]
    fn diamond_is_acyclic() {
        let nodes = nodes(&["a", "b", "c", "d"]);
        let edges = vec![
            Edge::new("a", "b"),
            Edge::new("a", "c"),
            Edge::new("b", "d"),
            Edge::new("c", "d"),
        ];
        assert!(!has_cycle(&nodes, &edges));
    }

    #[test]
    fn back_edge_is_a_cycle() {
        let nodes = nodes(&["a", "b", "c"]);
        let edges = vec![
            Edge::new("a", "b"),
            Edge::new("b", "c"),
            Edge::new("c", "a"),
        ];
        assert!(has_cycle(&nodes, &edges));
    }

    #[test]
    fn self_edge_is_a_cycle() {
        let nodes = nodes(&["a"]);
        assert!(has_cycle(&nodes, &[Edge::new("a", "a")]));
    }
}
