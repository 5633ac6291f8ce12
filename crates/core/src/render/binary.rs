//! Dumping the linked program binary to disk.

use crate::error::RenderError;
use crate::fs::FileSystem;
use crate::gl::{check_error, GlApi};
use crate::params::RenderParams;
use std::path::Path;

/// What [`dump_program_binary`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryDump {
    /// The context is older than OpenGL 4.1 / OpenGL ES 3.0.
    Unsupported,
    /// The driver advertises no program binary format.
    NoFormats,
    /// The raw binary was written.
    Written { format: u32, len: usize },
}

/// Writes the driver's binary for `program` to `path`, byte for byte.
///
/// Unsupported contexts and drivers without binary formats are reported and
/// skipped; they are not errors.
///
/// # Errors
///
/// Returns `GraphicsApi` or `GlObject` if the driver refuses to return the binary, or
/// `Io` if writing `path` fails.
pub fn dump_program_binary<G: GlApi, F: FileSystem>(
    gl: &G,
    params: &RenderParams,
    program: G::Program,
    path: &Path,
    fs: &F,
) -> Result<BinaryDump, RenderError> {
    if !params.supports_program_binary() {
        tracing::info!(
            current = %params.api_description(),
            "cannot dump binary: requires OpenGL >= 4.1 or OpenGLES >= 3.0"
        );
        return Ok(BinaryDump::Unsupported);
    }

    let formats = gl.num_program_binary_formats();
    check_error(gl, "glGetIntegerv")?;
    if formats <= 0 {
        tracing::info!("cannot dump binary: driver supports zero binary format");
        return Ok(BinaryDump::NoFormats);
    }

    let binary = gl.program_binary(program);
    check_error(gl, "glGetProgramBinary")?;
    let binary = binary.ok_or_else(|| RenderError::GlObject {
        call: "glGetProgramBinary",
        reason: "driver returned no binary".into(),
    })?;

    fs.write(path, &binary.bytes)?;
    tracing::info!(
        path = %path.display(),
        format = binary.format,
        bytes = binary.bytes.len(),
        "program binary written"
    );
    Ok(BinaryDump::Written {
        format: binary.format,
        len: binary.bytes.len(),
    })
}
