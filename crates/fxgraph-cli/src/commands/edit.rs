//! Graph editing command.
//!
//! Replays a list of operations through the undo history and prints the
//! resulting canonical payload:
//!
//! ```text
//! fxgraph edit add:delay connect:input:fx-1 connect:fx-1:output set:fx-1:time:500
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use fxgraph_config::Settings;
use fxgraph_contract::{graph_state_from_payload, serialize_state};
use fxgraph_core::{GraphAction, GraphHistory, NodeKind};

use super::common::{pretty, read_payload, write_text};

#[derive(Args)]
pub struct EditArgs {
    /// Start from this payload instead of the default graph
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail on the first rejected operation
    #[arg(long)]
    strict: bool,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,

    /// Operations: add:<kind>[:<id>], remove:<id>, move:<id>:<x>:<y>,
    /// connect:<from>:<to>, disconnect:<from>:<to>, set:<id>:<key>:<value>,
    /// bypass:<id>, undo, redo, reset
    #[arg(value_name = "OP")]
    ops: Vec<EditOp>,
}

/// One command-line edit operation.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    /// Add an effect node, optionally with an explicit id.
    Add { kind: NodeKind, id: Option<String> },
    /// Remove a node.
    Remove(String),
    /// Move a node.
    Move { id: String, x: f32, y: f32 },
    /// Add an edge.
    Connect { from: String, to: String },
    /// Remove an edge.
    Disconnect { from: String, to: String },
    /// Set a parameter.
    Set { id: String, key: String, value: f32 },
    /// Toggle bypass.
    Bypass(String),
    /// Undo the last tracked edit.
    Undo,
    /// Redo the last undone edit.
    Redo,
    /// Reset to the default graph.
    Reset,
}

impl FromStr for EditOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let number = |v: &str| {
            v.parse::<f32>()
                .map_err(|_| format!("invalid number '{v}' in '{s}'"))
        };
        let op = match parts.as_slice() {
            ["add", kind] | ["add", kind, _] => EditOp::Add {
                kind: kind.parse().map_err(|e| format!("{e}"))?,
                id: parts.get(2).map(|id| (*id).to_string()),
            },
            ["remove", id] => EditOp::Remove((*id).to_string()),
            ["move", id, x, y] => EditOp::Move {
                id: (*id).to_string(),
                x: number(*x)?,
                y: number(*y)?,
            },
            ["connect", from, to] => EditOp::Connect {
                from: (*from).to_string(),
                to: (*to).to_string(),
            },
            ["disconnect", from, to] => EditOp::Disconnect {
                from: (*from).to_string(),
                to: (*to).to_string(),
            },
            ["set", id, key, value] => EditOp::Set {
                id: (*id).to_string(),
                key: (*key).to_string(),
                value: number(*value)?,
            },
            ["bypass", id] => EditOp::Bypass((*id).to_string()),
            ["undo"] => EditOp::Undo,
            ["redo"] => EditOp::Redo,
            ["reset"] => EditOp::Reset,
            _ => return Err(format!("invalid operation '{s}'")),
        };
        Ok(op)
    }
}

impl EditOp {
    /// Applies the operation to `history`.
    ///
    /// Returns a message when the operation was rejected or had no effect.
    fn apply(&self, history: &mut GraphHistory) -> Option<String> {
        let action = match self {
            EditOp::Undo => return (!history.undo()).then(|| "nothing to undo".to_string()),
            EditOp::Redo => return (!history.redo()).then(|| "nothing to redo".to_string()),
            EditOp::Reset => {
                history.reset();
                return None;
            }
            EditOp::Add { kind, id } => {
                // New nodes line up left to right between the anchors.
                let slot = history.present().nodes().len().saturating_sub(2);
                GraphAction::AddNode {
                    kind: *kind,
                    x: 160.0 + 100.0 * slot as f32,
                    y: 120.0,
                    id: id.clone(),
                }
            }
            EditOp::Remove(id) => GraphAction::RemoveNode { node_id: id.clone() },
            EditOp::Move { id, x, y } => GraphAction::MoveNode {
                node_id: id.clone(),
                x: *x,
                y: *y,
            },
            EditOp::Connect { from, to } => GraphAction::Connect {
                from: from.clone(),
                to: to.clone(),
            },
            EditOp::Disconnect { from, to } => GraphAction::Disconnect {
                from: from.clone(),
                to: to.clone(),
            },
            EditOp::Set { id, key, value } => GraphAction::UpdateNodeParam {
                node_id: id.clone(),
                key: key.clone(),
                value: *value,
            },
            EditOp::Bypass(id) => GraphAction::ToggleNodeBypass { node_id: id.clone() },
        };
        history.dispatch(action);
        history.present().last_error().map(|err| err.to_string())
    }
}

pub fn run(args: EditArgs, settings: &Settings) -> anyhow::Result<()> {
    let initial = match &args.input {
        Some(path) => {
            let payload = read_payload(path)?;
            graph_state_from_payload(&payload, settings.node_limit)
                .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?
        }
        None => fxgraph_core::GraphState::new(settings.node_limit),
    };
    let mut history = GraphHistory::with_limit(initial, settings.history_limit);

    for (i, op) in args.ops.iter().enumerate() {
        if let Some(problem) = op.apply(&mut history) {
            if args.strict {
                anyhow::bail!("operation {} ({op:?}) rejected: {problem}", i + 1);
            }
            eprintln!("warning: operation {} ({op:?}): {problem}", i + 1);
        }
    }
    tracing::debug!(
        "edit: {} ops, {} undo steps",
        args.ops.len(),
        history.past_len()
    );

    let json = serialize_state(history.present()).map_err(|e| anyhow::anyhow!("{e}"))?;
    let text = if args.compact { json } else { pretty(&json)? };
    write_text(args.output.as_deref(), &text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ops(ops: &[&str]) -> GraphHistory {
        let mut history = GraphHistory::new(Default::default());
        for op in ops {
            op.parse::<EditOp>().unwrap().apply(&mut history);
        }
        history
    }

    #[test]
    fn parse_ops() {
        assert_eq!(
            "add:eq".parse::<EditOp>().unwrap(),
            EditOp::Add {
                kind: NodeKind::Eq,
                id: None
            }
        );
        assert_eq!(
            "add:delay:echo".parse::<EditOp>().unwrap(),
            EditOp::Add {
                kind: NodeKind::Delay,
                id: Some("echo".into())
            }
        );
        assert_eq!(
            "set:fx-1:mix:40".parse::<EditOp>().unwrap(),
            EditOp::Set {
                id: "fx-1".into(),
                key: "mix".into(),
                value: 40.0
            }
        );
        assert_eq!("undo".parse::<EditOp>().unwrap(), EditOp::Undo);
    }

    #[test]
    fn parse_errors() {
        assert!("add:flanger".parse::<EditOp>().is_err());
        assert!("move:fx-1:a:2".parse::<EditOp>().is_err());
        assert!("connect:a".parse::<EditOp>().is_err());
        assert!("explode".parse::<EditOp>().is_err());
    }

    #[test]
    fn ops_go_through_history() {
        let history = run_ops(&["add:delay", "connect:input:fx-1", "undo"]);
        assert!(history.present().contains_node("fx-1"));
        assert!(!history.present().has_edge("input", "fx-1"));
        assert!(history.can_redo());
    }

    #[test]
    fn rejected_op_reports_code() {
        let mut history = GraphHistory::new(Default::default());
        let problem = "connect:output:input"
            .parse::<EditOp>()
            .unwrap()
            .apply(&mut history);
        assert!(problem.unwrap().contains("ERR_CYCLE_DETECTED"));
        assert_eq!(
            EditOp::Undo.apply(&mut history).as_deref(),
            Some("nothing to undo")
        );
    }

    #[test]
    fn added_nodes_are_spread_out() {
        let history = run_ops(&["add:delay", "add:reverb"]);
        let x1 = history.present().node("fx-1").unwrap().x;
        let x2 = history.present().node("fx-2").unwrap().x;
        assert!(x2 > x1);
    }
}
