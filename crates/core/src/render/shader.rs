//! Compiling shader stages and linking them into a program.
//!
//! Failures carry the driver's info log untouched; the binary prints it
//! verbatim ahead of the error message.

use crate::error::RenderError;
use crate::gl::{check_error, GlApi, ShaderStage};
use crate::params::RenderParams;

/// Compiles one shader stage.
///
/// `file` names the shader in diagnostics.
///
/// # Errors
///
/// Returns `RenderError::ShaderCompile` with the info log if compilation
/// fails, or `GlObject` if the shader object cannot be created.
pub fn compile_shader<G: GlApi>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
    file: &str,
) -> Result<G::Shader, RenderError> {
    let shader = gl
        .create_shader(stage)
        .map_err(|reason| RenderError::GlObject {
            call: "glCreateShader",
            reason,
        })?;
    check_error(gl, "glCreateShader")?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    check_error(gl, "glCompileShader")?;

    if gl.shader_compile_status(shader) {
        Ok(shader)
    } else {
        Err(RenderError::ShaderCompile {
            stage: stage.name(),
            file: file.to_string(),
            log: gl.shader_info_log(shader),
        })
    }
}

/// Creates a program from both stages and links it.
///
/// When the negotiated context can hand program binaries back, the program
/// is marked retrievable before linking.
///
/// # Errors
///
/// Returns `RenderError::ShaderLink` with the info log if linking fails.
pub fn link_program<G: GlApi>(
    gl: &G,
    params: &RenderParams,
    vertex: G::Shader,
    fragment: G::Shader,
) -> Result<G::Program, RenderError> {
    let program = gl
        .create_program()
        .map_err(|reason| RenderError::GlObject {
            call: "glCreateProgram",
            reason,
        })?;
    if params.supports_program_binary() {
        gl.program_binary_retrievable_hint(program);
    }
    check_error(gl, "glCreateProgram")?;

    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);
    check_error(gl, "glLinkProgram")?;

    if gl.program_link_status(program) {
        Ok(program)
    } else {
        Err(RenderError::ShaderLink {
            log: gl.program_info_log(program),
        })
    }
}
