use serde::{Deserialize, Serialize};

/// Camera projection and orbit-control parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Initial orbit distance from the scene center.
    pub distance: f32,
    /// Orbit rotation speed per pixel of drag.
    pub rotate_speed: f32,
    /// Pan speed per pixel of shift-drag.
    pub pan_speed: f32,
    /// Zoom speed per scroll step.
    pub zoom_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            znear: 0.1,
            zfar: 100.0,
            // |(4.5, 4.5, 4.5)|, the framing all three demos start from
            distance: 7.794,
            rotate_speed: 0.01,
            pan_speed: 0.01,
            zoom_speed: 0.05,
        }
    }
}
