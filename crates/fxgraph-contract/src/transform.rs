//! Per-kind mapping from user parameters to engine parameters.
//!
//! Each effect kind maps its schema parameters onto up to [`PARAM_SLOTS`]
//! engine slots `p1..p9`. Every input is first resolved against the schema
//! (missing, non-finite or out-of-range values fall back to the default),
//! so each transform is total.
//!
//! | Kind | p1 | p2 | p3 | p4 | p5 |
//! |------|----|----|----|----|----|
//! | anchors | 1 | | | | |
//! | chorus | depth | rate curve | mix | | |
//! | compressor | threshold (linear) | ratio | attack | | |
//! | delay | feedback | mix | time | | |
//! | distortion | drive | warmth | aura | output | mix |
//! | eq | tilt | mid gain | low | mid | high |
//! | filter | cutoff (log) | q | mode | mix | |
//! | reverb | mix | decay | damping | | |
//!
//! Unused slots are zero.

use std::collections::BTreeMap;

use fxgraph_core::math::{db_to_linear, log_unit, round_half_up, unit};
use fxgraph_core::{NodeKind, resolve_param};

/// Number of engine parameter slots per node.
pub const PARAM_SLOTS: usize = 9;

/// Engine sample rate the chorus rate curve is calibrated against.
pub const CHORUS_SAMPLE_RATE: f32 = 48_000.0;

/// Rate (Hz) that maps to a normalized chorus rate of `1.0`.
pub const CHORUS_MAX_RATE_HZ: f32 = 0.001 * CHORUS_SAMPLE_RATE / core::f32::consts::TAU;

/// Engine parameters for a node of `kind` with the given user parameters.
pub fn engine_params(kind: NodeKind, params: &BTreeMap<String, f32>) -> [f32; PARAM_SLOTS] {
    let get = |key: &str| resolve_param(kind, params, key).unwrap_or_default();
    let mut p = [0.0; PARAM_SLOTS];

    match kind {
        NodeKind::Input | NodeKind::Output => {
            p[0] = 1.0;
        }
        NodeKind::Chorus => {
            p[0] = unit(get("depth"), 0.0, 100.0);
            p[1] = chorus_rate(get("rate"));
            p[2] = unit(get("mix"), 0.0, 100.0);
        }
        NodeKind::Compressor => {
            p[0] = db_to_linear(get("threshold")).clamp(0.0, 1.0);
            p[1] = get("ratio").clamp(1.0, 20.0);
            p[2] = unit(get("attack"), 1.0, 100.0);
        }
        NodeKind::Delay => {
            p[0] = unit(get("feedback"), 0.0, 100.0);
            p[1] = unit(get("mix"), 0.0, 100.0);
            p[2] = unit(get("time"), 1.0, 1200.0);
        }
        NodeKind::Distortion => {
            for (slot, key) in ["drive", "warmth", "aura", "output", "mix"].into_iter().enumerate() {
                p[slot] = unit(get(key), 0.0, 100.0);
            }
        }
        NodeKind::Eq => {
            let (low, mid, high) = (get("low"), get("mid"), get("high"));
            p[0] = ((high - low) / 24.0).clamp(-1.0, 1.0);
            p[1] = (1.0 + mid / 12.0).clamp(0.0, 2.0);
            p[2] = unit(low, -12.0, 12.0);
            p[3] = unit(mid, -12.0, 12.0);
            p[4] = unit(high, -12.0, 12.0);
        }
        NodeKind::Filter => {
            p[0] = 0.01 + 0.99 * log_unit(get("cutoff"), 40.0, 20_000.0);
            p[1] = get("q").clamp(0.2, 20.0);
            p[2] = round_half_up(get("mode")).clamp(0.0, 5.0);
            p[3] = unit(get("mix"), 0.0, 100.0);
        }
        NodeKind::Reverb => {
            p[0] = unit(get("mix"), 0.0, 100.0);
            p[1] = unit(get("decay"), 0.1, 10.0);
            p[2] = get("damping").clamp(0.0, 1.0);
        }
    }
    p
}

/// Perceptual curve for the chorus rate: `clamp(rate / R, 0, 1) ^ 0.25`.
#[inline]
pub fn chorus_rate(rate_hz: f32) -> f32 {
    (rate_hz / CHORUS_MAX_RATE_HZ).clamp(0.0, 1.0).powf(0.25)
}
