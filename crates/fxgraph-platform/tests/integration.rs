//! Integration tests for fxgraph-platform.
//!
//! Drive a history through edits, undo and redo while a bridge mirrors every
//! present snapshot into a parameter bank.

use fxgraph_contract::param_bank::REVISION_INDEX;
use fxgraph_contract::{ParamBank, compile, deserialize_str, encode};
use fxgraph_core::{GraphAction, GraphHistory, NodeKind};
use fxgraph_platform::{ParamBankSink, RuntimeBridge, StructuredSink};

fn add(kind: NodeKind) -> GraphAction {
    GraphAction::AddNode {
        kind,
        x: 200.0,
        y: 120.0,
        id: None,
    }
}

#[test]
fn bank_follows_history() {
    let mut history = GraphHistory::new(Default::default());
    let mut bridge = RuntimeBridge::new(ParamBankSink::new(ParamBank::new()));
    bridge.sync(history.present());

    history.dispatch(add(NodeKind::Delay));
    bridge.sync(history.present());
    assert_eq!(bridge.sink().target().decode_header().node_count, 3.0);

    history.dispatch(GraphAction::SelectNode {
        node_id: Some("fx-1".into()),
    });
    assert_eq!(bridge.sync(history.present()), None);

    assert!(history.undo());
    bridge.sync(history.present());
    assert_eq!(bridge.sink().target().decode_header().node_count, 2.0);

    assert!(history.redo());
    bridge.sync(history.present());
    assert_eq!(bridge.revision(), 4);
    assert_eq!(bridge.sink().target().get(REVISION_INDEX), Some(4.0));
    assert_eq!(bridge.sink().applied(), 4);
}

#[test]
fn rejected_edit_keeps_engine_state() {
    let mut history = GraphHistory::new(Default::default());
    let mut bridge = RuntimeBridge::new(ParamBankSink::new(ParamBank::new()));
    bridge.sync(history.present());
    let before = bridge.sink().target().clone();

    history.dispatch(GraphAction::Connect {
        from: "output".into(),
        to: "input".into(),
    });
    assert!(history.present().last_error().is_some());
    assert_eq!(bridge.sync(history.present()), None);
    assert_eq!(bridge.sink().target(), &before);
}

#[test]
fn bank_matches_direct_encoding() {
    let mut history = GraphHistory::new(Default::default());
    history.dispatch(add(NodeKind::Compressor));
    history.dispatch(GraphAction::UpdateNodeParam {
        node_id: "fx-1".into(),
        key: "ratio".into(),
        value: 8.0,
    });

    let mut bridge = RuntimeBridge::new(ParamBankSink::new(ParamBank::new()));
    bridge.sync(history.present());

    let payload = bridge.last_payload().unwrap();
    let mut expected = ParamBank::new();
    expected.apply(&encode(&compile(&deserialize_str(payload).unwrap()), 1));
    assert_eq!(bridge.sink().target(), &expected);
}

#[test]
fn structured_sink_receives_one_message_per_revision() {
    let mut messages = Vec::new();
    {
        let mut bridge = RuntimeBridge::new(StructuredSink::new(|m: &str| {
            messages.push(m.to_string());
        }));
        let mut history = GraphHistory::new(Default::default());
        bridge.sync(history.present());
        history.dispatch(add(NodeKind::Chorus));
        bridge.sync(history.present());
        bridge.sync(history.present());
    }
    assert_eq!(messages.len(), 2);

    let last: serde_json::Value = serde_json::from_str(&messages[1]).unwrap();
    assert_eq!(last["type"], "applyRuntimeGraph");
    assert_eq!(last["revision"], 2);
    assert_eq!(last["nodes"][0]["effectType"], 1);
}
