//! Binding active uniforms from the JSON sidecar.
//!
//! - [`spec`] -- sidecar parsing, default entries, sidecar path derivation.
//! - [`dispatch`] -- the closed table of `glUniform*` binding functions.

pub mod dispatch;
pub mod spec;

use crate::error::RenderError;
use crate::fs::FileSystem;
use crate::gl::{check_error, GlApi};
use crate::params::RenderParams;

pub use dispatch::{lookup, BindingFunction, ElementType, BINDING_FUNCTIONS};
pub use spec::{load_uniform_spec, sidecar_path, UniformEntry, UniformSpec};

/// Binds every active uniform of `program`, which must be the current program.
///
/// A program without active uniforms returns immediately, before the
/// sidecar is looked up. Otherwise each active uniform, in index order, is
/// matched to its sidecar entry, converted through the dispatch table and
/// set; a GL error check follows every call.
///
/// Returns the number of uniforms bound.
///
/// # Errors
///
/// Any of the uniform errors of [`RenderError`], `GraphicsApi` if the
/// driver flags an error, or `GlObject` if it cannot describe a uniform.
pub fn bind_uniforms<G: GlApi, F: FileSystem>(
    gl: &G,
    program: G::Program,
    params: &RenderParams,
    fs: &F,
) -> Result<usize, RenderError> {
    let count = gl.active_uniform_count(program);
    check_error(gl, "glGetProgramiv")?;
    if count == 0 {
        return Ok(0);
    }

    let spec = load_uniform_spec(fs, params)?;

    for index in 0..count {
        let uniform = gl
            .active_uniform(program, index)
            .ok_or_else(|| RenderError::GlObject {
                call: "glGetActiveUniform",
                reason: format!("no uniform at index {index}"),
            })?;
        let name = uniform.base_name();
        let entry = spec.entry(name)?;

        let location = gl.uniform_location(program, name);
        check_error(gl, "glGetUniformLocation")?;
        let location = location.ok_or_else(|| RenderError::UniformNotFound(name.to_string()))?;

        let func = dispatch::lookup(entry.func)
            .filter(|f| f.available_on(params.api))
            .ok_or_else(|| RenderError::UnsupportedBindingFunction(entry.func.to_string()))?;
        let value = func
            .convert_args(entry.args)
            .map_err(|reason| RenderError::UniformArguments {
                name: name.to_string(),
                func: func.name.to_string(),
                reason,
            })?;

        tracing::debug!(
            uniform = name,
            size = uniform.size,
            func = func.name,
            "binding uniform"
        );
        gl.set_uniform(&location, func, &value);
        check_error(gl, func.name)?;
    }

    Ok(count as usize)
}
