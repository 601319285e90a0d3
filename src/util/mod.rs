//! Small utilities shared across the engine.

pub mod frame_timing;

pub use frame_timing::FrameTiming;
