//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the cyclorama crate.
#[derive(Debug)]
pub enum CycloramaError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Shader composition failure.
    ShaderCompose(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Unknown demo name on the command line.
    UnknownDemo(String),
}

impl fmt::Display for CycloramaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::ShaderCompose(msg) => {
                write!(f, "shader composition error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::UnknownDemo(name) => {
                write!(f, "unknown demo '{name}' (expected cascade, burst, or weave)")
            }
        }
    }
}

impl std::error::Error for CycloramaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for CycloramaError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for CycloramaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
