//! Easing functions for animation interpolation.

use serde::{Deserialize, Serialize};

/// Easing curves used by the demos. All variants map [0, 1] onto [0, 1]
/// without overshooting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    /// Identity (no easing).
    Linear,
    /// Quadratic ease-in-out: slow start, fast middle, slow end.
    InOutQuad,
    /// Quintic ease-out: very fast start with a long settle.
    OutQuint,
}

impl Easing {
    /// Evaluate the easing function at time t.
    ///
    /// Input is clamped to [0.0, 1.0]; the result is also in [0.0, 1.0].
    #[inline]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let omt = -2.0 * t + 2.0;
                    1.0 - omt * omt / 2.0
                }
            }
            Self::OutQuint => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt * omt * omt
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 3] =
        [Easing::Linear, Easing::InOutQuad, Easing::OutQuint];

    #[test]
    fn endpoints_are_exact() {
        for curve in CURVES {
            assert_eq!(curve.evaluate(0.0), 0.0, "{curve:?} at 0");
            assert!(
                (curve.evaluate(1.0) - 1.0).abs() < 1e-6,
                "{curve:?} at 1"
            );
        }
    }

    #[test]
    fn input_is_clamped() {
        for curve in CURVES {
            assert_eq!(curve.evaluate(-0.5), 0.0, "{curve:?} below range");
            assert!(
                (curve.evaluate(1.5) - 1.0).abs() < 1e-6,
                "{curve:?} above range"
            );
        }
    }

    #[test]
    fn output_stays_in_unit_range() {
        for curve in CURVES {
            for i in 0..=1000 {
                let t = i as f32 / 1000.0;
                let v = curve.evaluate(t);
                assert!(
                    (0.0..=1.0).contains(&v),
                    "{curve:?} escaped range at t={t}: {v}"
                );
            }
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for curve in CURVES {
            let mut prev = 0.0f32;
            for i in 0..=1000 {
                let v = curve.evaluate(i as f32 / 1000.0);
                assert!(v >= prev - 1e-6, "{curve:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn in_out_quad_midpoint() {
        assert!((Easing::InOutQuad.evaluate(0.5) - 0.5).abs() < 1e-6);
        // Ease-in below the midpoint, ease-out above it
        assert!(Easing::InOutQuad.evaluate(0.25) < 0.25);
        assert!(Easing::InOutQuad.evaluate(0.75) > 0.75);
    }

    #[test]
    fn out_quint_front_loads_progress() {
        // 1 - 0.5^5 = 0.96875
        assert!((Easing::OutQuint.evaluate(0.5) - 0.96875).abs() < 1e-6);
        assert!(Easing::OutQuint.evaluate(0.25) > 0.7);
    }
}
