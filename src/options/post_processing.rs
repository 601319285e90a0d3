use serde::{Deserialize, Serialize};

/// Post-processing effect parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PostProcessingOptions {
    /// SSAO contribution strength.
    pub ao_strength: f32,
    /// SSAO sampling radius in view space.
    pub ao_radius: f32,
    /// Depth bias to prevent SSAO self-occlusion.
    pub ao_bias: f32,
    /// Exponent applied to the AO factor.
    pub ao_power: f32,
    /// Exposure multiplier for tone mapping.
    pub exposure: f32,
    /// Gamma correction exponent.
    pub gamma: f32,
}

impl Default for PostProcessingOptions {
    fn default() -> Self {
        Self {
            ao_strength: 0.85,
            ao_radius: 0.35,
            ao_bias: 0.025,
            ao_power: 2.0,
            exposure: 1.0,
            gamma: 1.0,
        }
    }
}
