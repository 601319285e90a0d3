//! Runtime options with TOML preset support.
//!
//! All tweakable settings (camera, post-processing, animation timing)
//! serialize to/from TOML so a demo can be launched with a preset file.

mod animation;
mod camera;
mod post_processing;

use std::path::Path;

pub use animation::AnimationOptions;
pub use camera::CameraOptions;
pub use post_processing::PostProcessingOptions;
use serde::{Deserialize, Serialize};

use crate::error::CycloramaError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[animation]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Post-processing effect parameters.
    pub post_processing: PostProcessingOptions,
    /// Loop timing and regeneration parameters.
    pub animation: AnimationOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CycloramaError> {
        let content =
            std::fs::read_to_string(path).map_err(CycloramaError::Io)?;
        toml::from_str(&content)
            .map_err(|e| CycloramaError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), CycloramaError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CycloramaError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(CycloramaError::Io)?;
        }
        std::fs::write(path, content).map_err(CycloramaError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[animation]
loop_duration_ms = 5000.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.animation.loop_duration_ms, 5000.0);
        // Everything else should be default
        assert_eq!(opts.animation.regen_interval, 1);
        assert_eq!(opts.camera.fovy, 60.0);
        assert_eq!(
            opts.post_processing.ao_strength,
            PostProcessingOptions::default().ao_strength
        );
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = std::env::temp_dir().join("cyclorama-options-test");
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.animation.regen_interval = 4;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(opts, loaded);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
