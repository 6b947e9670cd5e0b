//! Factory presets bundled with fxgraph.
//!
//! Built-in graphs that are always available without a store. Each one is
//! produced by replaying graph actions on the default graph, so they obey the
//! same invariants as anything a user could build.

use fxgraph_core::{GraphAction, GraphState, NodeKind};

/// Names of the factory presets, in display order.
pub static FACTORY_PRESET_NAMES: &[&str] = &["clean", "crunch", "ambient"];

/// A built-in preset.
#[derive(Debug, Clone, PartialEq)]
pub struct FactoryPreset {
    /// Short identifier.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// The preset graph.
    pub graph: GraphState,
}

/// Returns every factory preset.
pub fn factory_presets() -> Vec<FactoryPreset> {
    FACTORY_PRESET_NAMES
        .iter()
        .filter_map(|name| get_factory_preset(name))
        .collect()
}

/// Returns a factory preset by name (case-insensitive).
pub fn get_factory_preset(name: &str) -> Option<FactoryPreset> {
    let preset = match name.to_ascii_lowercase().as_str() {
        "clean" => FactoryPreset {
            name: "clean",
            description: "Input straight to output",
            graph: GraphState::default(),
        },
        "crunch" => FactoryPreset {
            name: "crunch",
            description: "Compressor into hard distortion, tamed by EQ",
            graph: chain(
                &[NodeKind::Compressor, NodeKind::Distortion, NodeKind::Eq],
                &[
                    ("fx-1", "ratio", 6.0),
                    ("fx-1", "threshold", -24.0),
                    ("fx-2", "drive", 85.0),
                    ("fx-2", "warmth", 65.0),
                    ("fx-3", "low", 3.0),
                    ("fx-3", "high", -2.5),
                ],
            ),
        },
        "ambient" => FactoryPreset {
            name: "ambient",
            description: "Slow chorus, long echoes and a big room",
            graph: chain(
                &[NodeKind::Chorus, NodeKind::Delay, NodeKind::Reverb],
                &[
                    ("fx-1", "rate", 0.4),
                    ("fx-1", "depth", 70.0),
                    ("fx-2", "time", 520.0),
                    ("fx-2", "feedback", 55.0),
                    ("fx-2", "mix", 35.0),
                    ("fx-3", "decay", 6.5),
                    ("fx-3", "mix", 45.0),
                ],
            ),
        },
        _ => return None,
    };
    Some(preset)
}

/// Returns `true` if `name` is a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    FACTORY_PRESET_NAMES
        .iter()
        .any(|n| n.eq_ignore_ascii_case(name))
}

/// input -> kinds[0] -> ... -> output, laid out left to right.
fn chain(kinds: &[NodeKind], params: &[(&str, &str, f32)]) -> GraphState {
    let mut actions = vec![GraphAction::Disconnect {
        from: "input".into(),
        to: "output".into(),
    }];
    let mut prev = String::from("input");
    for (i, &kind) in kinds.iter().enumerate() {
        let id = format!("fx-{}", i + 1);
        actions.push(GraphAction::AddNode {
            kind,
            x: 160.0 + 100.0 * i as f32,
            y: 120.0,
            id: None,
        });
        actions.push(GraphAction::Connect {
            from: prev,
            to: id.clone(),
        });
        prev = id;
    }
    actions.push(GraphAction::Connect {
        from: prev,
        to: "output".into(),
    });
    actions.extend(params.iter().map(|&(node, key, value)| GraphAction::UpdateNodeParam {
        node_id: node.into(),
        key: key.into(),
        value,
    }));

    actions
        .iter()
        .fold(GraphState::default(), |state, action| state.apply(action))
}
