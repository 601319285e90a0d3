//! Screen-space post-processing passes.

pub mod channels;
pub mod composite;
pub mod screen_pass;
pub mod ssao;
