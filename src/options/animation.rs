use serde::{Deserialize, Serialize};

/// Loop timing and regeneration parameters. These override the matching
/// descriptor fields when a preset is supplied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationOptions {
    /// Loop duration in milliseconds.
    pub loop_duration_ms: f64,
    /// Target FPS cap (0 = unlimited).
    pub target_fps: u32,
    /// Rendered frames between barcode regenerations (weave).
    pub regen_interval: u32,
    /// Minimum slice displacement magnitude (weave).
    pub spread_min: f32,
    /// Maximum slice displacement magnitude (weave).
    pub spread_max: f32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            loop_duration_ms: 10_000.0,
            target_fps: 300,
            regen_interval: 1,
            spread_min: 0.03,
            spread_max: 0.08,
        }
    }
}
