//! Per-kind parameter schema.
//!
//! Every effect kind has a fixed, ordered list of [`ParamSpec`]s describing
//! its user-facing controls: key, label, range, step, default, slider scale
//! and display format. Anchors have no parameters.
//!
//! Node parameter maps are sparse. A missing key means "use the default",
//! so the schema is consulted whenever a value is displayed or compiled:
//!
//! - [`param_value`] reads a node value, falling back to the default
//! - [`resolve_param`] additionally rejects non-finite and out-of-range
//!   values, which is what the engine transform uses
//! - [`format_param`] renders the value for display (`"--"` when unknown)
//!
//! # Example
//!
//! ```rust
//! use fxgraph_core::graph::{Node, NodeKind};
//! use fxgraph_core::param_schema::{format_param, param_value};
//!
//! let node = Node::new("fx-1", NodeKind::Filter, 0.0, 0.0).with_param("mode", 3.0);
//! assert_eq!(param_value(&node, "cutoff"), Some(2500.0));
//! assert_eq!(format_param(&node, "mode"), "Notch");
//! assert_eq!(format_param(&node, "cutoff"), "2500 Hz");
//! assert_eq!(format_param(&node, "nope"), "--");
//! ```

#[cfg(not(feature = "std"))]
use alloc::{
    collections::BTreeMap,
    format,
    string::{String, ToString},
};
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use crate::graph::{Node, NodeKind};
use crate::math::round_half_up;

/// Slider mapping between a plain value and a `[0, 1]` position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// `normalized = ln(value/min) / ln(max/min)`. Requires `min > 0`.
    Logarithmic,
}

/// Display format for a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamFormat {
    /// `55%`
    Percent,
    /// `375 ms`
    Milliseconds,
    /// `+1.8 dB`, `-18.0 dB`
    Decibels,
    /// `4.0:1`
    Ratio,
    /// `0.71`
    Unitless,
    /// `0.50 Hz` below 1 Hz, `1.2 Hz` otherwise.
    RateHz,
    /// `2500 Hz`
    Hertz,
    /// `2.4 s`
    Seconds,
    /// Filter mode label, see [`FILTER_MODE_LABELS`].
    FilterMode,
}

/// Display labels for the filter `mode` parameter, by index.
pub const FILTER_MODE_LABELS: [&str; 6] = ["LP", "HP", "BP", "Notch", "Peak", "All-pass"];

/// Describes one user-facing parameter of an effect kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Key in the node's parameter map.
    pub key: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Minimum plain value.
    pub min: f32,
    /// Maximum plain value.
    pub max: f32,
    /// Slider step.
    pub step: f32,
    /// Value used when the node has none.
    pub default: f32,
    /// Slider scale.
    pub scale: ParamScale,
    /// Display format.
    pub format: ParamFormat,
}

impl ParamSpec {
    const fn new(
        key: &'static str,
        label: &'static str,
        min: f32,
        max: f32,
        step: f32,
        default: f32,
        format: ParamFormat,
    ) -> Self {
        Self {
            key,
            label,
            min,
            max,
            step,
            default,
            scale: ParamScale::Linear,
            format,
        }
    }

    const fn log(mut self) -> Self {
        self.scale = ParamScale::Logarithmic;
        self
    }

    /// Returns `true` if `value` is finite and within `[min, max]`.
    #[inline]
    pub fn accepts(&self, value: f32) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Resolves a raw value: missing, non-finite or out-of-range → default.
    #[inline]
    pub fn resolve(&self, raw: Option<f32>) -> f32 {
        match raw {
            Some(value) if self.accepts(value) => value,
            _ => self.default,
        }
    }

    /// Clamps a value to the parameter's range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Converts a plain value to a slider position in `[0, 1]`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || value <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
        }
    }

    /// Converts a slider position back to a plain value.
    ///
    /// Inverse of [`normalize`](Self::normalize).
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                self.min * libm::powf(self.max / self.min, normalized)
            }
        }
    }

    /// Renders a value in this parameter's display format.
    pub fn format(&self, value: f32) -> String {
        match self.format {
            ParamFormat::Percent => format!("{:.0}%", round_half_up(value)),
            ParamFormat::Milliseconds => format!("{:.0} ms", round_half_up(value)),
            ParamFormat::Hertz => format!("{:.0} Hz", round_half_up(value)),
            ParamFormat::Decibels => {
                if value >= 0.0 {
                    format!("+{:.1} dB", value.abs())
                } else {
                    format!("{value:.1} dB")
                }
            }
            ParamFormat::Ratio => format!("{value:.1}:1"),
            ParamFormat::Unitless => format!("{value:.2}"),
            ParamFormat::RateHz if value < 1.0 => format!("{value:.2} Hz"),
            ParamFormat::RateHz => format!("{value:.1} Hz"),
            ParamFormat::Seconds => format!("{value:.1} s"),
            ParamFormat::FilterMode => {
                let last = (FILTER_MODE_LABELS.len() - 1) as f32;
                // Float-to-int casts saturate; NaN maps to 0.
                let idx = round_half_up(value).clamp(0.0, last) as usize;
                FILTER_MODE_LABELS[idx].to_string()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Schema table
// ---------------------------------------------------------------------------

use ParamFormat::{
    Decibels, FilterMode, Hertz, Milliseconds, Percent, RateHz, Ratio, Seconds, Unitless,
};

const CHORUS: &[ParamSpec] = &[
    ParamSpec::new("rate", "Rate", 0.05, 5.0, 0.01, 1.2, RateHz),
    ParamSpec::new("depth", "Depth", 0.0, 100.0, 1.0, 55.0, Percent),
    ParamSpec::new("mix", "Mix", 0.0, 100.0, 1.0, 35.0, Percent),
];

const COMPRESSOR: &[ParamSpec] = &[
    ParamSpec::new("threshold", "Threshold", -48.0, 0.0, 0.5, -18.0, Decibels),
    ParamSpec::new("ratio", "Ratio", 1.0, 20.0, 0.1, 4.0, Ratio),
    ParamSpec::new("attack", "Attack", 1.0, 100.0, 1.0, 10.0, Milliseconds),
];

const DELAY: &[ParamSpec] = &[
    ParamSpec::new("time", "Time", 1.0, 1200.0, 1.0, 375.0, Milliseconds),
    ParamSpec::new("feedback", "Feedback", 0.0, 100.0, 1.0, 35.0, Percent),
    ParamSpec::new("mix", "Mix", 0.0, 100.0, 1.0, 25.0, Percent),
];

const DISTORTION: &[ParamSpec] = &[
    ParamSpec::new("drive", "Drive", 0.0, 100.0, 1.0, 60.0, Percent),
    ParamSpec::new("warmth", "Warmth", 0.0, 100.0, 1.0, 50.0, Percent),
    ParamSpec::new("aura", "Aura", 0.0, 100.0, 1.0, 50.0, Percent),
    ParamSpec::new("output", "Output", 0.0, 100.0, 1.0, 100.0, Percent),
    ParamSpec::new("mix", "Dry/Wet", 0.0, 100.0, 1.0, 100.0, Percent),
];

const EQ: &[ParamSpec] = &[
    ParamSpec::new("low", "Low", -12.0, 12.0, 0.1, 1.8, Decibels),
    ParamSpec::new("mid", "Mid", -12.0, 12.0, 0.1, -0.6, Decibels),
    ParamSpec::new("high", "High", -12.0, 12.0, 0.1, 2.1, Decibels),
];

const FILTER: &[ParamSpec] = &[
    ParamSpec::new("cutoff", "Cutoff", 40.0, 20000.0, 10.0, 2500.0, Hertz).log(),
    ParamSpec::new("q", "Q", 0.2, 20.0, 0.01, 0.707, Unitless),
    ParamSpec::new("mode", "Mode", 0.0, 5.0, 1.0, 0.0, FilterMode),
    ParamSpec::new("mix", "Mix", 0.0, 100.0, 1.0, 100.0, Percent),
];

const REVERB: &[ParamSpec] = &[
    ParamSpec::new("decay", "Decay", 0.1, 10.0, 0.1, 2.4, Seconds),
    ParamSpec::new("damping", "Damping", 0.0, 1.0, 0.01, 0.7, Unitless),
    ParamSpec::new("mix", "Mix", 0.0, 100.0, 1.0, 30.0, Percent),
];

/// The ordered parameter list for a kind. Empty for anchors.
pub fn param_specs(kind: NodeKind) -> &'static [ParamSpec] {
    match kind {
        NodeKind::Input | NodeKind::Output => &[],
        NodeKind::Chorus => CHORUS,
        NodeKind::Compressor => COMPRESSOR,
        NodeKind::Delay => DELAY,
        NodeKind::Distortion => DISTORTION,
        NodeKind::Eq => EQ,
        NodeKind::Filter => FILTER,
        NodeKind::Reverb => REVERB,
    }
}

/// Looks up one parameter of a kind.
pub fn param_spec(kind: NodeKind, key: &str) -> Option<&'static ParamSpec> {
    param_specs(kind).iter().find(|spec| spec.key == key)
}

/// Every parameter of a kind at its default value.
pub fn default_params(kind: NodeKind) -> BTreeMap<String, f32> {
    param_specs(kind)
        .iter()
        .map(|spec| (spec.key.to_string(), spec.default))
        .collect()
}

/// A node's value for `key`, or the schema default when unset.
///
/// Returns `None` only when the key is neither set nor in the schema.
pub fn param_value(node: &Node, key: &str) -> Option<f32> {
    node.params
        .get(key)
        .copied()
        .or_else(|| param_spec(node.kind, key).map(|spec| spec.default))
}

/// The engine-facing value for `key`.
///
/// Missing, non-finite and out-of-range values resolve to the default.
/// Returns `None` when the key is not in the schema for `kind`.
pub fn resolve_param(kind: NodeKind, params: &BTreeMap<String, f32>, key: &str) -> Option<f32> {
    param_spec(kind, key).map(|spec| spec.resolve(params.get(key).copied()))
}

/// Renders a node's value for `key`, or `"--"` when there is nothing to show.
///
/// Unknown keys that are set on the node are rendered as plain numbers.
pub fn format_param(node: &Node, key: &str) -> String {
    match (param_spec(node.kind, key), node.params.get(key)) {
        (Some(spec), value) => spec.format(value.copied().unwrap_or(spec.default)),
        (None, Some(value)) => format!("{value:.2}"),
        (None, None) => "--".to_string(),
    }
}
