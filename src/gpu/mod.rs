//! GPU plumbing shared by every pass: context ownership, pipeline
//! construction helpers, and shader composition.

pub mod pipeline_helpers;
pub mod render_context;
pub mod shader_composer;
