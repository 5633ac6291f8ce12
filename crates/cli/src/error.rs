//! CLI errors and the exit codes the test harness keys on.
//!
//! Exit code scheme:
//! - 0:   success (including early exit after compile or link)
//! - 1:   any other failure, argument errors included
//! - 101: a shader stage failed to compile
//! - 102: the program failed to link

use frag_capture_core::RenderError;
use std::fmt;

/// Errors produced by the CLI, each mapped to an exit code.
pub enum CliError {
    /// A failure anywhere in the render pipeline.
    Render(RenderError),
    /// Command-line arguments that clap could not parse.
    Usage(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(RenderError::ShaderCompile { .. }) => 101,
            CliError::Render(RenderError::ShaderLink { .. }) => 102,
            CliError::Render(_) | CliError::Usage(_) => 1,
        }
    }

    /// Driver log to print verbatim before the error line.
    pub fn driver_log(&self) -> Option<&str> {
        match self {
            CliError::Render(e) => e.driver_log(),
            CliError::Usage(_) => None,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Render(e) => write!(f, "{e}"),
            CliError::Usage(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        CliError::Render(e)
    }
}
