//! Parameterized driver for the 3x3x3 cube-grid demos.
//!
//! One driver serves both cube demos; everything that differs between them
//! (step count, easing, phase-offset source, fly-in distance, group zoom)
//! is carried by [`GridParams`].

use glam::{EulerRot, Mat4, Vec3};

use crate::anim::easing::Easing;

/// Number of cubes along each grid axis.
pub const GRID_SIDE: i32 = 3;
/// Total cube count.
pub const GRID_CUBES: usize = 27;

/// Where each cube's phase offset comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridOffsets {
    /// Offset equals the cube's linear index `(z+1)*9 + (y+1)*3 + (x+1)`,
    /// sweeping the grid corner to corner.
    LinearIndex,
    /// Hand-tuned per-cube offsets, shifted down by 0.49 and clamped to
    /// [0, 10] so the smallest entry lands exactly on zero.
    Table([f32; GRID_CUBES]),
}

/// Animation parameters for a cube-grid demo.
#[derive(Debug, Clone)]
pub struct GridParams {
    /// Phase divisor: a cube with offset `o` activates at loop time
    /// `o / steps` and takes `1 / steps` of the loop to finish.
    pub steps: f32,
    /// Easing applied to per-cube progress.
    pub easing: Easing,
    /// Offset value whose cube is pinned at full progress for the whole
    /// loop (`None` disables the anchor).
    pub anchor_offset: Option<f32>,
    /// Distance along the cube's grid direction it flies in from
    /// (0 disables the fly-in).
    pub fly_distance: f32,
    /// Uniform group scale at the end of the loop (1 at the start).
    pub zoom_end: f32,
    /// Group translation at the end of the loop (zero at the start).
    pub drift: Vec3,
    /// Ambient scene tumble rate.
    pub spin_speed: f32,
    /// Per-cube phase offset source.
    pub offsets: GridOffsets,
}

/// Immutable per-cube data derived from grid position.
#[derive(Debug, Clone)]
pub struct GridElement {
    /// Rest position (grid coordinates in [-1, 1]).
    pub rest: Vec3,
    /// Normalized direction from the grid center (zero for the center cube).
    pub dir: Vec3,
    /// Phase offset in [0, steps].
    pub offset: f32,
}

/// Per-frame derived state for one cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeState {
    /// World-space position before group/scene transforms.
    pub position: Vec3,
    /// Uniform scale in [0, 1].
    pub scale: f32,
    /// Whether the cube is drawn this frame.
    pub visible: bool,
}

/// Drives the 27 cubes of a grid demo from loop-normalized time.
pub struct GridDriver {
    params: GridParams,
    elements: Vec<GridElement>,
    states: Vec<CubeState>,
}

impl GridDriver {
    /// Build the 27 elements in z-major order (matching the linear index).
    pub fn new(params: GridParams) -> Self {
        let mut elements = Vec::with_capacity(GRID_CUBES);
        for z in -1..GRID_SIDE - 1 {
            for y in -1..GRID_SIDE - 1 {
                for x in -1..GRID_SIDE - 1 {
                    let ptr =
                        ((z + 1) * 9 + (y + 1) * 3 + (x + 1)) as usize;
                    let rest = Vec3::new(x as f32, y as f32, z as f32);
                    let offset = match params.offsets {
                        GridOffsets::LinearIndex => ptr as f32,
                        GridOffsets::Table(table) => {
                            (table[ptr] - 0.49).clamp(0.0, 10.0)
                        }
                    };
                    elements.push(GridElement {
                        rest,
                        dir: rest.normalize_or_zero(),
                        offset,
                    });
                }
            }
        }

        let states = vec![
            CubeState {
                position: Vec3::ZERO,
                scale: 0.0,
                visible: false,
            };
            elements.len()
        ];

        Self {
            params,
            elements,
            states,
        }
    }

    /// Activation progress for a cube with the given phase offset, before
    /// easing. Clamped to [0, 1]; the anchor cube is pinned at 1.
    pub fn progress(&self, offset: f32, loop_time: f32) -> f32 {
        if self.params.anchor_offset == Some(offset) {
            return 1.0;
        }
        let start = offset / self.params.steps;
        if loop_time < start {
            0.0
        } else {
            ((loop_time - start) * self.params.steps).clamp(0.0, 1.0)
        }
    }

    /// Recompute all cube states for the given loop-normalized time.
    pub fn update(&mut self, loop_time: f32) {
        for (element, state) in self.elements.iter().zip(&mut self.states) {
            let anchored =
                self.params.anchor_offset == Some(element.offset);
            let start = element.offset / self.params.steps;
            let progress = if anchored {
                1.0
            } else if loop_time < start {
                0.0
            } else {
                ((loop_time - start) * self.params.steps).clamp(0.0, 1.0)
            };

            let eased = self.params.easing.evaluate(progress);
            let flown = element.rest + element.dir * self.params.fly_distance;
            state.position = element.rest.lerp(flown, 1.0 - eased);
            state.scale = eased;
            state.visible = anchored || loop_time >= start;
        }
    }

    /// Per-frame cube states, in linear-index order.
    pub fn states(&self) -> &[CubeState] {
        &self.states
    }

    /// Immutable per-cube data, in linear-index order.
    pub fn elements(&self) -> &[GridElement] {
        &self.elements
    }

    /// Local transform of one cube.
    pub fn element_transform(state: &CubeState) -> Mat4 {
        Mat4::from_translation(state.position)
            * Mat4::from_scale(Vec3::splat(state.scale))
    }

    /// Whole-group zoom/drift transform, linear over the loop.
    pub fn group_transform(&self, loop_time: f32) -> Mat4 {
        let t = Easing::Linear.evaluate(loop_time);
        let scale = 1.0 + (self.params.zoom_end - 1.0) * t;
        Mat4::from_translation(self.params.drift * t)
            * Mat4::from_scale(Vec3::splat(scale))
    }

    /// Ambient scene tumble. Runs off absolute time so it never snaps at
    /// the loop boundary; the three axes use slightly detuned periods.
    pub fn scene_rotation(&self, time_ms: f64) -> Mat4 {
        let t = self.params.spin_speed * time_ms as f32;
        Mat4::from_euler(EulerRot::XYZ, t / 1000.0, t / 1100.0, t / 900.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cascade_like() -> GridParams {
        GridParams {
            steps: 27.0,
            easing: Easing::InOutQuad,
            anchor_offset: Some(0.0),
            fly_distance: 0.0,
            zoom_end: 1.0 / 3.0,
            drift: Vec3::splat(-1.0),
            spin_speed: 0.5,
            offsets: GridOffsets::LinearIndex,
        }
    }

    fn burst_like() -> GridParams {
        GridParams {
            steps: 4.0,
            easing: Easing::OutQuint,
            anchor_offset: Some(0.0),
            fly_distance: 5.0,
            zoom_end: 1.0 / 3.0,
            drift: Vec3::ZERO,
            spin_speed: 0.5,
            offsets: GridOffsets::Table([
                3.9, 2.4, 3.8, 2.0, 1.5, 2.1, 3.2, 2.5, 3.3, 2.8, 1.0, 2.9,
                0.5, 0.0, 0.5, 3.0, 1.0, 3.1, 3.6, 2.6, 3.7, 2.2, 1.5, 2.3,
                3.5, 2.7, 3.4,
            ]),
        }
    }

    #[test]
    fn builds_full_population() {
        let driver = GridDriver::new(cascade_like());
        assert_eq!(driver.elements().len(), GRID_CUBES);
        assert_eq!(driver.states().len(), GRID_CUBES);
    }

    #[test]
    fn anchor_is_always_complete() {
        let mut driver = GridDriver::new(cascade_like());
        for i in 0..=100 {
            driver.update(i as f32 / 100.0);
            // Linear-index anchor is cube 0
            let state = driver.states()[0];
            assert_eq!(state.scale, 1.0);
            assert!(state.visible);
        }
    }

    #[test]
    fn progress_is_zero_before_activation() {
        let driver = GridDriver::new(cascade_like());
        // Cube with offset 13 activates at 13/27 of the loop
        assert_eq!(driver.progress(13.0, 0.0), 0.0);
        assert_eq!(driver.progress(13.0, 13.0 / 27.0 - 0.01), 0.0);
        assert!(driver.progress(13.0, 13.0 / 27.0 + 0.01) > 0.0);
    }

    #[test]
    fn progress_is_monotonic_within_a_loop() {
        let driver = GridDriver::new(cascade_like());
        for offset in [1.0, 7.0, 13.0, 26.0] {
            let mut prev = 0.0f32;
            for i in 0..=1000 {
                let p = driver.progress(offset, i as f32 / 1000.0);
                assert!((0.0..=1.0).contains(&p));
                assert!(p >= prev, "offset {offset} regressed at step {i}");
                prev = p;
            }
        }
    }

    #[test]
    fn hidden_cubes_reappear_after_wrap() {
        let mut driver = GridDriver::new(cascade_like());
        driver.update(0.99);
        let late = driver.states()[26];
        assert!(late.visible);
        // Wrapping back to the loop start hides everything but the anchor
        driver.update(0.0);
        assert!(!driver.states()[26].visible);
        assert!(driver.states()[0].visible);
    }

    #[test]
    fn burst_table_anchor_is_center_cube() {
        let driver = GridDriver::new(burst_like());
        // Table entry 13 is 0.0 -> clamp(0.0 - 0.49) == 0.0, the anchor
        let center = &driver.elements()[13];
        assert_eq!(center.offset, 0.0);
        assert_eq!(center.rest, Vec3::ZERO);
    }

    #[test]
    fn fly_in_starts_out_along_grid_direction() {
        let mut driver = GridDriver::new(burst_like());
        driver.update(0.0);
        // Corner cube (index 0) has not activated yet: parked 5 units out
        let element = &driver.elements()[0];
        let state = driver.states()[0];
        let expected = element.rest + element.dir * 5.0;
        assert!((state.position - expected).length() < 1e-5);
        assert_eq!(state.scale, 0.0);
    }

    #[test]
    fn fly_in_settles_at_rest() {
        let mut driver = GridDriver::new(burst_like());
        driver.update(0.999);
        for (element, state) in
            driver.elements().iter().zip(driver.states())
        {
            if state.scale >= 1.0 - 1e-4 {
                assert!((state.position - element.rest).length() < 1e-3);
            }
        }
    }

    #[test]
    fn group_zoom_interpolates_linearly() {
        let driver = GridDriver::new(cascade_like());
        let start = driver.group_transform(0.0);
        assert!(start.abs_diff_eq(Mat4::IDENTITY, 1e-6));

        let end = driver.group_transform(1.0);
        let scaled = end.transform_point3(Vec3::X);
        // Scale 1/3, drift (-1, -1, -1)
        assert!(
            (scaled - (Vec3::X / 3.0 + Vec3::splat(-1.0))).length() < 1e-5
        );
    }

    #[test]
    fn scene_rotation_is_identity_at_time_zero() {
        let driver = GridDriver::new(cascade_like());
        assert!(driver
            .scene_rotation(0.0)
            .abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn scene_rotation_ignores_loop_wrap() {
        let driver = GridDriver::new(cascade_like());
        let a = driver.scene_rotation(9_999.0);
        let b = driver.scene_rotation(10_001.0);
        // Nearly equal across the loop boundary, but not snapped back
        assert!(!a.abs_diff_eq(driver.scene_rotation(1.0), 1e-3));
        assert!(a.abs_diff_eq(b, 1e-2));
    }

    #[test]
    fn all_cubes_complete_by_loop_end() {
        let mut driver = GridDriver::new(burst_like());
        // Largest table offset is 3.9 - 0.49 = 3.41 -> start 0.8525, so the
        // last cube is still settling at loop end but well past half scale
        driver.update(0.9999);
        for state in driver.states() {
            assert!(state.visible);
            assert!(state.scale > 0.9);
        }
    }
}
