//! Integration tests for fxgraph-contract.
//!
//! Full pipeline scenarios: edit a graph, serialize it, parse it back,
//! compile it and encode it into a parameter bank.

use fxgraph_contract::param_bank::{EDGE_BANK_OFFSET, NODE_BANK_OFFSET, NODE_STRIDE, REVISION_INDEX};
use fxgraph_contract::{
    ContractError, ParamBank, compile, deserialize, encode, graph_state_from_payload, normalize,
    serialize_state,
};
use fxgraph_core::{GraphState, NodeKind};

fn crunch_chain() -> GraphState {
    GraphState::default()
        .add_node(NodeKind::Compressor, 160.0, 120.0)
        .add_node(NodeKind::Distortion, 260.0, 120.0)
        .add_node(NodeKind::Eq, 360.0, 120.0)
        .disconnect("input", "output")
        .connect("input", "fx-1")
        .connect("fx-1", "fx-2")
        .connect("fx-2", "fx-3")
        .connect("fx-3", "output")
        .update_node_param("fx-2", "drive", 100.0)
        .update_node_param("fx-2", "mix", 50.0)
}

#[test]
fn json_to_bank_pipeline() {
    let state = crunch_chain();
    assert!(state.last_error().is_none());

    let json = serialize_state(&state).unwrap();
    let payload = deserialize(json.as_bytes()).unwrap();
    let runtime = compile(&payload);
    assert!(runtime.has_output_path);

    let mut bank = ParamBank::new();
    bank.apply(&encode(&runtime, 42));

    // Canonical order: fx-1, fx-2, fx-3, input, output.
    let distortion = bank.node_slot(1).unwrap();
    assert_eq!(distortion[0], 4.0);
    assert_eq!(distortion[2], 1.0);
    assert_eq!(distortion[6], 0.5);

    assert_eq!(bank.get(NODE_BANK_OFFSET + 3 * NODE_STRIDE), Some(0.0));
    assert_eq!(bank.get(EDGE_BANK_OFFSET), Some(0.0));
    assert_eq!(bank.get(EDGE_BANK_OFFSET + 1), Some(1.0));
    assert_eq!(bank.get(REVISION_INDEX), Some(42.0));
}

#[test]
fn disconnected_chain_reports_no_output_path() {
    let state = crunch_chain().disconnect("fx-2", "fx-3");
    let runtime = compile(&normalize(&state).unwrap());
    assert!(!runtime.has_output_path);

    let mut bank = ParamBank::new();
    bank.apply(&encode(&runtime, 1));
    assert!(!bank.decode_header().has_output_path);
    assert_eq!(bank.decode_header().edge_count, 3.0);
}

#[test]
fn hydrated_state_keeps_editing() {
    let json = serialize_state(&crunch_chain()).unwrap();
    let payload = deserialize(json.as_bytes()).unwrap();
    let state = graph_state_from_payload(&payload, 8).unwrap();

    let next = state.add_node(NodeKind::Reverb, 0.0, 0.0);
    assert!(next.contains_node("fx-4"));

    let rejected = state.connect("output", "fx-1");
    assert_eq!(rejected.last_error().map(|e| e.code()), Some("ERR_CYCLE_DETECTED"));
}

#[test]
fn untrusted_documents_fail_cleanly() {
    let cases: [(&[u8], &str); 5] = [
        (b"", "ERR_INVALID_PAYLOAD_SHAPE"),
        (b"null", "ERR_INVALID_PAYLOAD_SHAPE"),
        (br#"{"nodes":[],"edges":[]}"#, "ERR_UNSUPPORTED_SCHEMA_VERSION"),
        (br#"{"schemaVersion":1,"nodes":[],"edges":[]}"#, "ERR_NODE_LIMIT_REACHED"),
        (
            br#"{"schemaVersion":1,"nodes":[{"id":"input","kind":"input","x":0,"y":0,"bypass":false,"params":[]}],"edges":[]}"#,
            "ERR_INVALID_PAYLOAD_SHAPE",
        ),
    ];
    for (bytes, code) in cases {
        let err: ContractError = deserialize(bytes).unwrap_err();
        assert_eq!(err.code(), code, "{}", String::from_utf8_lossy(bytes));
    }
}

#[test]
fn default_graph_without_passthrough() {
    let state = GraphState::default().disconnect("input", "output");
    let runtime = compile(&normalize(&state).unwrap());
    assert!(!runtime.has_output_path);
    assert!(runtime.edges.is_empty());
}

#[test]
fn compile_and_encode_are_deterministic() {
    let state = crunch_chain();
    let a = compile(&normalize(&state).unwrap());
    let b = compile(&normalize(&state).unwrap());
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
    assert_eq!(encode(&a, 5), encode(&b, 5));
}
