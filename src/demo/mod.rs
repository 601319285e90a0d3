//! Declarative per-demo descriptors.
//!
//! Each demo is data: a clear color, a loop duration, and either grid or
//! weave animation parameters. The engine reads a descriptor and wires up
//! the matching render path; nothing else in the crate branches on demo
//! identity.

use glam::Vec3;

use crate::anim::easing::Easing;
use crate::anim::grid::{GridOffsets, GridParams};
use crate::error::CycloramaError;

/// Hand-tuned phase offsets for the burst demo, indexed by cube linear
/// index. Entry 13 (the center cube) is the anchor.
const BURST_OFFSETS: [f32; 27] = [
    3.9, 2.4, 3.8, 2.0, 1.5, 2.1, 3.2, 2.5, 3.3, 2.8, 1.0, 2.9, 0.5, 0.0,
    0.5, 3.0, 1.0, 3.1, 3.6, 2.6, 3.7, 2.2, 1.5, 2.3, 3.5, 2.7, 3.4,
];

/// The three demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    /// Cube grid, corner-to-corner sweep.
    Cascade,
    /// Cube grid, radial fly-in with hand-tuned phases.
    Burst,
    /// Barcode-sliced mesh with three-channel compositing.
    Weave,
}

impl DemoKind {
    /// Parse a demo name from the command line.
    ///
    /// # Errors
    ///
    /// Returns [`CycloramaError::UnknownDemo`] for unrecognized names.
    pub fn parse(name: &str) -> Result<Self, CycloramaError> {
        match name {
            "cascade" => Ok(Self::Cascade),
            "burst" => Ok(Self::Burst),
            "weave" => Ok(Self::Weave),
            _ => Err(CycloramaError::UnknownDemo(name.to_owned())),
        }
    }

    /// The demo's CLI/window name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cascade => "cascade",
            Self::Burst => "burst",
            Self::Weave => "weave",
        }
    }
}

/// Animation parameters for the weave demo.
#[derive(Debug, Clone)]
pub struct WeaveParams {
    /// Number of slice groups (and mesh instances).
    pub slices: u32,
    /// Number of barcode lines (offset-table columns).
    pub lines: u32,
    /// Rendered frames between table regenerations (1 = every frame).
    pub regen_interval: u32,
    /// Displacement magnitude range, re-randomized at each regeneration.
    pub spread_range: (f32, f32),
    /// Ambient scene tumble rate (0 = static; the stock demo does not
    /// tumble).
    pub spin_speed: f32,
}

/// Everything that distinguishes one demo from another.
#[derive(Debug, Clone)]
pub struct DemoDescriptor {
    /// Which demo this is.
    pub kind: DemoKind,
    /// Loop duration in milliseconds.
    pub loop_duration_ms: f64,
    /// Background clear color (linear, pre-converted from sRGB).
    pub clear_color: wgpu::Color,
    /// Cube-grid parameters (cascade, burst).
    pub grid: Option<GridParams>,
    /// Weave parameters.
    pub weave: Option<WeaveParams>,
}

impl DemoDescriptor {
    /// Descriptor for the requested demo.
    pub fn preset(kind: DemoKind) -> Self {
        match kind {
            DemoKind::Cascade => cascade(),
            DemoKind::Burst => burst(),
            DemoKind::Weave => weave(),
        }
    }
}

/// Cube grid sweeping corner to corner while the group zooms out and
/// drifts.
pub fn cascade() -> DemoDescriptor {
    DemoDescriptor {
        kind: DemoKind::Cascade,
        loop_duration_ms: 10_000.0,
        clear_color: srgb_clear(0x26, 0x26, 0x26),
        grid: Some(GridParams {
            steps: 27.0,
            easing: Easing::InOutQuad,
            anchor_offset: Some(0.0),
            fly_distance: 0.0,
            zoom_end: 1.0 / 3.0,
            drift: Vec3::splat(-1.0),
            spin_speed: 0.5,
            offsets: GridOffsets::LinearIndex,
        }),
        weave: None,
    }
}

/// Cube grid with hand-tuned phases and a radial fly-in; the group zooms
/// but holds position.
pub fn burst() -> DemoDescriptor {
    DemoDescriptor {
        kind: DemoKind::Burst,
        loop_duration_ms: 10_000.0,
        clear_color: srgb_clear(0x1a, 0x1a, 0x1a),
        grid: Some(GridParams {
            steps: 4.0,
            easing: Easing::OutQuint,
            anchor_offset: Some(0.0),
            fly_distance: 5.0,
            zoom_end: 1.0 / 3.0,
            drift: Vec3::ZERO,
            spin_speed: 0.5,
            offsets: GridOffsets::Table(BURST_OFFSETS),
        }),
        weave: None,
    }
}

/// Barcode-sliced torus knot composited from three color channels.
pub fn weave() -> DemoDescriptor {
    DemoDescriptor {
        kind: DemoKind::Weave,
        loop_duration_ms: 10_000.0,
        clear_color: srgb_clear(0x05, 0x05, 0x05),
        grid: None,
        weave: Some(WeaveParams {
            slices: 10,
            lines: 512,
            regen_interval: 1,
            spread_range: (0.03, 0.08),
            spin_speed: 0.0,
        }),
    }
}

/// Convert an 8-bit sRGB clear color to the linear values wgpu expects.
pub fn srgb_clear(r: u8, g: u8, b: u8) -> wgpu::Color {
    wgpu::Color {
        r: srgb_to_linear(r),
        g: srgb_to_linear(g),
        b: srgb_to_linear(b),
        a: 1.0,
    }
}

fn srgb_to_linear(c: u8) -> f64 {
    let c = f64::from(c) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_names() {
        for kind in [DemoKind::Cascade, DemoKind::Burst, DemoKind::Weave] {
            assert_eq!(DemoKind::parse(kind.name()).unwrap(), kind);
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        match DemoKind::parse("spin") {
            Err(CycloramaError::UnknownDemo(name)) => {
                assert_eq!(name, "spin");
            }
            other => panic!("expected UnknownDemo, got {other:?}"),
        }
    }

    #[test]
    fn cascade_constants() {
        let desc = cascade();
        let grid = desc.grid.unwrap();
        assert_eq!(grid.steps, 27.0);
        assert_eq!(grid.easing, Easing::InOutQuad);
        assert_eq!(grid.anchor_offset, Some(0.0));
        assert_eq!(grid.fly_distance, 0.0);
        assert_eq!(grid.offsets, GridOffsets::LinearIndex);
        assert!(desc.weave.is_none());
    }

    #[test]
    fn burst_constants() {
        let desc = burst();
        let grid = desc.grid.unwrap();
        assert_eq!(grid.steps, 4.0);
        assert_eq!(grid.easing, Easing::OutQuint);
        assert_eq!(grid.fly_distance, 5.0);
        assert_eq!(grid.drift, Vec3::ZERO);
        match grid.offsets {
            GridOffsets::Table(table) => {
                assert_eq!(table.len(), 27);
                assert_eq!(table[13], 0.0);
            }
            GridOffsets::LinearIndex => panic!("expected offset table"),
        }
    }

    #[test]
    fn weave_constants() {
        let desc = weave();
        let weave = desc.weave.unwrap();
        assert_eq!(weave.slices, 10);
        assert_eq!(weave.lines, 512);
        assert_eq!(weave.regen_interval, 1);
        assert!(weave.spread_range.0 < weave.spread_range.1);
        // The mesh sits still; only the table flicker and the orbit
        // camera move.
        assert_eq!(weave.spin_speed, 0.0);
        assert!(desc.grid.is_none());
    }

    #[test]
    fn every_demo_loops_every_ten_seconds() {
        for kind in [DemoKind::Cascade, DemoKind::Burst, DemoKind::Weave] {
            assert_eq!(
                DemoDescriptor::preset(kind).loop_duration_ms,
                10_000.0
            );
        }
    }

    #[test]
    fn clear_colors_are_linearized() {
        // sRGB 0x26 -> ~0.0194 linear
        let c = cascade().clear_color;
        assert!((c.r - 0.0194).abs() < 1e-3);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);

        // Below the sRGB linear-segment knee
        let w = weave().clear_color;
        assert!((w.r - (5.0 / 255.0) / 12.92).abs() < 1e-9);
    }
}
