// -- Lint policy ---------------------------------------------------------
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]

//! Looping 3D animation demos rendered with wgpu.
//!
//! Cyclorama ships three self-contained real-time demos that all close a
//! perfect loop every ten seconds:
//!
//! - **cascade**: a 3x3x3 cube grid scaling in cube by cube while the
//!   whole group zooms out and the scene tumbles.
//! - **burst**: the same grid with hand-tuned phase offsets and a radial
//!   fly-in.
//! - **weave**: an instanced procedural mesh sliced into groups by a
//!   regenerated "barcode" table, rendered once per color channel and
//!   additively recombined.
//!
//! # Key entry points
//!
//! - [`engine::DemoEngine`] - the per-demo render orchestrator
//! - [`demo::DemoDescriptor`] - declarative per-demo animation parameters
//! - [`options::Options`] - runtime configuration (camera, effects, timing)

pub mod anim;
pub mod camera;
pub mod demo;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod options;
pub mod renderer;
pub mod util;
