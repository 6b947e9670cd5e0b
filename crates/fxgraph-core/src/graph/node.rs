//! Graph node types.
//!
//! Each node has a string id, a [`NodeKind`] that determines its role (one of
//! the two fixed anchors or an effect), a canvas position, a bypass flag and
//! a sparse parameter map. Parameter keys are interpreted against the
//! per-kind table in [`param_schema`](crate::param_schema); the map itself
//! is an open record so that unknown keys survive a load/save cycle.

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, string::String};
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use core::fmt;
use core::str::FromStr;

/// Fixed id of the audio input anchor.
pub const INPUT_NODE_ID: &str = "input";

/// Fixed id of the audio output anchor.
pub const OUTPUT_NODE_ID: &str = "output";

/// The role of a node in the effect graph.
///
/// The set is closed: adding a variant forces every exhaustive `match`
/// (parameter schema, engine transform, effect type id) to be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// Receives external audio. Exactly one per graph.
    Input,
    /// Produces the final output. Exactly one per graph.
    Output,
    /// Modulated short delay.
    Chorus,
    /// Dynamics compressor.
    Compressor,
    /// Feedback delay line.
    Delay,
    /// Waveshaping distortion.
    Distortion,
    /// Three-band equalizer.
    Eq,
    /// Multi-mode filter.
    Filter,
    /// Algorithmic reverb.
    Reverb,
}

impl NodeKind {
    /// Every kind, anchors first.
    pub const ALL: [NodeKind; 9] = [
        NodeKind::Input,
        NodeKind::Output,
        NodeKind::Chorus,
        NodeKind::Compressor,
        NodeKind::Delay,
        NodeKind::Distortion,
        NodeKind::Eq,
        NodeKind::Filter,
        NodeKind::Reverb,
    ];

    /// Effect kinds only, in engine type order.
    pub const EFFECTS: [NodeKind; 7] = [
        NodeKind::Chorus,
        NodeKind::Compressor,
        NodeKind::Delay,
        NodeKind::Distortion,
        NodeKind::Eq,
        NodeKind::Filter,
        NodeKind::Reverb,
    ];

    /// Wire name of the kind (lowercase).
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Input => "input",
            NodeKind::Output => "output",
            NodeKind::Chorus => "chorus",
            NodeKind::Compressor => "compressor",
            NodeKind::Delay => "delay",
            NodeKind::Distortion => "distortion",
            NodeKind::Eq => "eq",
            NodeKind::Filter => "filter",
            NodeKind::Reverb => "reverb",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            NodeKind::Input => "Input",
            NodeKind::Output => "Output",
            NodeKind::Chorus => "Chorus",
            NodeKind::Compressor => "Compressor",
            NodeKind::Delay => "Delay",
            NodeKind::Distortion => "Distortion",
            NodeKind::Eq => "EQ",
            NodeKind::Filter => "Filter",
            NodeKind::Reverb => "Reverb",
        }
    }

    /// Returns `true` for the `input`/`output` anchors.
    pub const fn is_anchor(self) -> bool {
        matches!(self, NodeKind::Input | NodeKind::Output)
    }

    /// Engine effect type id. Anchors map to `0`.
    pub const fn effect_type(self) -> u8 {
        match self {
            NodeKind::Input | NodeKind::Output => 0,
            NodeKind::Chorus => 1,
            NodeKind::Compressor => 2,
            NodeKind::Delay => 3,
            NodeKind::Distortion => 4,
            NodeKind::Eq => 5,
            NodeKind::Filter => 6,
            NodeKind::Reverb => 7,
        }
    }

    /// Looks up a kind by wire name. Exact, case-sensitive match.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown node kind name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNodeKind(pub String);

impl fmt::Display for UnknownNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node kind: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownNodeKind {}

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownNodeKind(s.into()))
    }
}

/// A node in the effect graph.
///
/// Nodes are plain values. A [`GraphState`](super::GraphState) only hands out
/// shared references, so a published node is never changed in place; every
/// edit produces a new state holding a new node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique id within the graph.
    pub id: String,
    /// Node role.
    pub kind: NodeKind,
    /// Canvas x position.
    pub x: f32,
    /// Canvas y position.
    pub y: f32,
    /// Bypass flag (only meaningful for effect nodes).
    pub bypass: bool,
    /// Sparse parameter values keyed by schema key, sorted by key.
    pub params: BTreeMap<String, f32>,
}

impl Node {
    /// Creates a node with no parameters and bypass off.
    pub fn new(id: impl Into<String>, kind: NodeKind, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            kind,
            x,
            y,
            bypass: false,
            params: BTreeMap::new(),
        }
    }

    /// Builder: sets a parameter value.
    pub fn with_param(mut self, key: impl Into<String>, value: f32) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Builder: sets the bypass flag.
    pub fn with_bypass(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }

    /// Returns `true` if this is one of the fixed anchors.
    #[inline]
    pub fn is_anchor(&self) -> bool {
        self.kind.is_anchor()
    }
}

/// Returns `true` if `id` is one of the fixed anchor ids.
#[inline]
pub fn is_anchor_id(id: &str) -> bool {
    id == INPUT_NODE_ID || id == OUTPUT_NODE_ID
}

/// Extracts `n` from an auto-generated `fx-<n>` id.
///
/// Returns `None` for ids that don't follow the auto-id pattern.
pub fn auto_id_serial(id: &str) -> Option<u32> {
    let digits = id.strip_prefix("fx-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
