//! Error types for the frag-capture core.
//!
//! Every failure in the pipeline is fatal for the run. The core never exits
//! the process itself; errors travel up to the binary, which prints them and
//! maps them to an exit code.

use thiserror::Error;

/// Errors produced while preparing, rendering or capturing a shader.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The fragment source has no line terminator, or no `#version` on its first line.
    #[error("malformed shader: {0}")]
    MalformedShader(String),

    /// The `#version` line names a GLSL version outside the supported table.
    #[error("cannot find a supported GLSL version in first line of fragment shader: ``{line}''")]
    UnsupportedVersion {
        /// First line of the shader, truncated to 80 characters.
        line: String,
    },

    /// A required input file could not be read.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Any other I/O failure (e.g. writing the binary dump).
    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    /// A shader stage failed to compile. The driver log is kept verbatim.
    #[error("{stage} shader compilation failed ({file})")]
    ShaderCompile {
        stage: &'static str,
        file: String,
        log: String,
    },

    /// The program failed to link. The driver log is kept verbatim.
    #[error("program linking failed")]
    ShaderLink { log: String },

    /// The linked program does not expose the quad position attribute.
    #[error("cannot find position of {0}")]
    MissingAttribute(&'static str),

    /// The uniform sidecar is not a JSON object.
    #[error("invalid uniform JSON in {path}: {reason}")]
    InvalidUniformJson { path: String, reason: String },

    /// An active uniform has no entry in the uniform specification.
    #[error("missing JSON entry for uniform: {0}")]
    MissingUniformSpec(String),

    /// An active uniform has more than one entry in the uniform specification.
    #[error("more than one JSON entry for uniform: {0}")]
    AmbiguousUniformSpec(String),

    /// A uniform entry lacks its `func` or `args` field.
    #[error("malformed JSON: no '{field}' entry for uniform: {name}")]
    MalformedUniformSpec { name: String, field: &'static str },

    /// The `args` of an entry do not fit the binding function.
    #[error("bad arguments for uniform {name} ({func}): {reason}")]
    UniformArguments {
        name: String,
        func: String,
        reason: String,
    },

    /// The driver returned no location for an active uniform.
    #[error("cannot find uniform named: {0}")]
    UniformNotFound(String),

    /// `func` names no known binding function, or one the target API lacks.
    #[error("unknown/unsupported uniform init func: {0}")]
    UnsupportedBindingFunction(String),

    /// A GL call left an error flag set.
    #[error("OpenGL error after {call}: {code}")]
    GraphicsApi { call: String, code: &'static str },

    /// The driver failed to create or return a GL object.
    #[error("{call} failed: {reason}")]
    GlObject { call: &'static str, reason: String },

    /// The PNG encoder rejected the pixel buffer or failed to write.
    #[error("PNG encoding failed: {0}")]
    ImageEncode(String),

    /// Context creation or buffer swapping failed.
    #[error("graphics context error: {0}")]
    Context(String),
}

impl RenderError {
    /// Driver diagnostic attached to compile and link failures.
    ///
    /// Returned separately so the top level can print it verbatim ahead of
    /// the one-line error message.
    pub fn driver_log(&self) -> Option<&str> {
        match self {
            RenderError::ShaderCompile { log, .. } | RenderError::ShaderLink { log } => {
                Some(log.as_str())
            }
            _ => None,
        }
    }
}
