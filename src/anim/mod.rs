//! Pure animation state: easing curves, the loop clock, the cube-grid
//! driver, and the barcode offset/vector tables.
//!
//! Everything in this module is CPU-only and deterministic given its
//! inputs, which is where the bulk of the test coverage lives.

pub mod barcode;
pub mod clock;
pub mod easing;
pub mod grid;
