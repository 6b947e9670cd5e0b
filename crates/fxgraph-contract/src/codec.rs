//! Canonical projection, validation and (de)serialization of graph payloads.
//!
//! Deserialization treats input as untrusted: the document is parsed into a
//! [`serde_json::Value`] and every field is type-checked by hand, with no
//! coercion between types. Shape violations are reported as
//! [`ContractError::InvalidPayloadShape`], distinct from the semantic checks
//! performed by [`validate`].

use std::collections::{BTreeMap, BTreeSet};

use fxgraph_core::{GraphState, NodeKind};
use serde_json::{Map, Value};

use crate::error::ContractError;
use crate::payload::{
    GRAPH_SCHEMA_VERSION, GraphPayload, MAX_EDGES, MAX_NODES, PayloadEdge, PayloadNode,
};

/// Projects a graph state into canonical payload form and validates it.
///
/// Selection and `last_error` are dropped; positions are kept.
///
/// # Errors
///
/// Any [`validate`] failure.
pub fn normalize(state: &GraphState) -> Result<GraphPayload, ContractError> {
    let mut payload = GraphPayload {
        schema_version: GRAPH_SCHEMA_VERSION,
        nodes: state
            .nodes()
            .iter()
            .map(|node| PayloadNode {
                id: node.id.clone(),
                kind: node.kind,
                x: node.x,
                y: node.y,
                bypass: node.bypass,
                params: node.params.clone(),
            })
            .collect(),
        edges: state
            .edges()
            .iter()
            .map(|edge| PayloadEdge::new(edge.from.as_str(), edge.to.as_str()))
            .collect(),
    };
    payload.sort();
    validate(&payload)?;
    Ok(payload)
}

/// Checks a payload against the contract rules, reporting the first violation.
///
/// Order: schema version, node count, edge count, parameter values, edge
/// endpoints. Node kinds are checked while parsing, since [`NodeKind`] is a
/// closed enum.
///
/// # Errors
///
/// The first [`ContractError`] found.
pub fn validate(payload: &GraphPayload) -> Result<(), ContractError> {
    if payload.schema_version != GRAPH_SCHEMA_VERSION {
        return Err(ContractError::UnsupportedSchemaVersion(
            payload.schema_version.to_string(),
        ));
    }
    let node_count = payload.nodes.len();
    if node_count == 0 || node_count > MAX_NODES {
        return Err(ContractError::NodeLimitReached {
            count: node_count,
            max: MAX_NODES,
        });
    }
    if payload.edges.len() > MAX_EDGES {
        return Err(ContractError::EdgeLimitReached {
            count: payload.edges.len(),
            max: MAX_EDGES,
        });
    }
    for node in &payload.nodes {
        let position = [("x", node.x), ("y", node.y)];
        if let Some((axis, _)) = position.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ContractError::InvalidNodeParam {
                node: node.id.clone(),
                param: (*axis).to_string(),
            });
        }
        if let Some((key, _)) = node.params.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ContractError::InvalidNodeParam {
                node: node.id.clone(),
                param: key.clone(),
            });
        }
    }
    let ids: BTreeSet<&str> = payload.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &payload.edges {
        if !ids.contains(edge.from_node_id.as_str()) || !ids.contains(edge.to_node_id.as_str()) {
            return Err(ContractError::EdgeNodeNotFound {
                from: edge.from_node_id.clone(),
                to: edge.to_node_id.clone(),
            });
        }
    }
    Ok(())
}

/// Encodes a payload as compact JSON in canonical order.
///
/// # Errors
///
/// Only if the JSON encoder itself fails.
pub fn serialize(payload: &GraphPayload) -> Result<String, ContractError> {
    serde_json::to_string(payload).map_err(|e| ContractError::shape(e.to_string()))
}

/// [`normalize`] followed by [`serialize`].
///
/// # Errors
///
/// Any [`validate`] failure.
pub fn serialize_state(state: &GraphState) -> Result<String, ContractError> {
    serialize(&normalize(state)?)
}

/// Parses a payload from raw bytes.
///
/// # Errors
///
/// See [`deserialize_str`].
pub fn deserialize(bytes: &[u8]) -> Result<GraphPayload, ContractError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ContractError::shape(e.to_string()))?;
    from_value(&value)
}

/// Parses a payload from a JSON string.
///
/// The result is sorted into canonical order and passed through [`validate`].
///
/// # Errors
///
/// - [`ContractError::InvalidPayloadShape`] for malformed JSON or mistyped fields
/// - [`ContractError::UnsupportedSchemaVersion`] for a missing or wrong version
/// - [`ContractError::InvalidNodeKind`] for an unknown kind string
/// - [`ContractError::InvalidNodeParam`] for a non-number or non-finite value
/// - any [`validate`] failure
pub fn deserialize_str(text: &str) -> Result<GraphPayload, ContractError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ContractError::shape(e.to_string()))?;
    from_value(&value)
}

fn from_value(value: &Value) -> Result<GraphPayload, ContractError> {
    let root = value
        .as_object()
        .ok_or_else(|| ContractError::shape("payload is not an object"))?;
    let raw_nodes = root
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or_else(|| ContractError::shape("`nodes` is not an array"))?;
    let raw_edges = root
        .get("edges")
        .and_then(Value::as_array)
        .ok_or_else(|| ContractError::shape("`edges` is not an array"))?;

    match root.get("schemaVersion") {
        Some(v) if v.as_u64() == Some(u64::from(GRAPH_SCHEMA_VERSION)) => {}
        Some(v) => return Err(ContractError::UnsupportedSchemaVersion(v.to_string())),
        None => return Err(ContractError::UnsupportedSchemaVersion("missing".into())),
    }

    let nodes = raw_nodes
        .iter()
        .map(parse_node)
        .collect::<Result<Vec<_>, _>>()?;
    let edges = raw_edges
        .iter()
        .map(parse_edge)
        .collect::<Result<Vec<_>, _>>()?;

    let mut payload = GraphPayload {
        schema_version: GRAPH_SCHEMA_VERSION,
        nodes,
        edges,
    };
    payload.sort();
    validate(&payload)?;

    tracing::trace!(
        "payload_parse: {} nodes, {} edges",
        payload.nodes.len(),
        payload.edges.len()
    );
    Ok(payload)
}

fn parse_node(value: &Value) -> Result<PayloadNode, ContractError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ContractError::shape("node is not an object"))?;
    let id = str_field(obj, "id", "node")?;

    let kind = match obj.get("kind") {
        Some(Value::String(name)) => {
            NodeKind::from_name(name).ok_or_else(|| ContractError::InvalidNodeKind {
                node: id.to_string(),
                kind: name.clone(),
            })?
        }
        other => {
            return Err(ContractError::InvalidNodeKind {
                node: id.to_string(),
                kind: other.map(Value::to_string).unwrap_or_default(),
            });
        }
    };

    let bypass = obj
        .get("bypass")
        .and_then(Value::as_bool)
        .ok_or_else(|| ContractError::shape(format!("node '{id}': `bypass` is not a boolean")))?;
    let x = coordinate(obj, "x", id)?;
    let y = coordinate(obj, "y", id)?;

    let raw_params = obj
        .get("params")
        .and_then(Value::as_object)
        .ok_or_else(|| ContractError::shape(format!("node '{id}': `params` is not an object")))?;
    let mut params = BTreeMap::new();
    for (key, raw) in raw_params {
        let value = finite_f32(raw).ok_or_else(|| ContractError::InvalidNodeParam {
            node: id.to_string(),
            param: key.clone(),
        })?;
        params.insert(key.clone(), value);
    }

    Ok(PayloadNode {
        id: id.to_string(),
        kind,
        x,
        y,
        bypass,
        params,
    })
}

fn parse_edge(value: &Value) -> Result<PayloadEdge, ContractError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ContractError::shape("edge is not an object"))?;
    Ok(PayloadEdge::new(
        str_field(obj, "fromNodeId", "edge")?,
        str_field(obj, "toNodeId", "edge")?,
    ))
}

fn str_field<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    what: &str,
) -> Result<&'a str, ContractError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ContractError::shape(format!("{what}: `{key}` is not a string")))
}

fn coordinate(obj: &Map<String, Value>, key: &str, id: &str) -> Result<f32, ContractError> {
    obj.get(key)
        .and_then(finite_f32)
        .ok_or_else(|| ContractError::shape(format!("node '{id}': `{key}` is not a finite number")))
}

/// A JSON number that is still finite after narrowing to `f32`.
#[allow(clippy::cast_possible_truncation)]
fn finite_f32(value: &Value) -> Option<f32> {
    let narrowed = value.as_f64()? as f32;
    narrowed.is_finite().then_some(narrowed)
}
