//! From fragment source to a program ready to draw the quad.
//!
//! Stages run in a fixed order:
//!
//! ```text
//! Uncompiled -> FragmentCompiled -> VertexCompiled -> Linked
//!            -> BinaryDumped (optional) -> UniformsBound -> ViewportReady
//! ```
//!
//! Compile and link failures end the run; "exit after compile" and "exit
//! after link" stop early with success and are reported as [`Prepared`]
//! variants so the caller decides how to exit.

use crate::error::RenderError;
use crate::fs::FileSystem;
use crate::gl::{check_error, GlApi, ShaderStage};
use crate::params::RenderParams;
use crate::render::binary::dump_program_binary;
use crate::render::fullscreen::{vertex_shader_source, POSITION_ATTRIBUTE, QUAD_VERTICES};
use crate::render::shader::{compile_shader, link_program};
use crate::uniform::bind_uniforms;

/// Pipeline progress, logged as each stage completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uncompiled,
    FragmentCompiled,
    VertexCompiled,
    Linked,
    BinaryDumped,
    UniformsBound,
    ViewportReady,
}

/// Shader and program handles for the single program of a run.
///
/// Handles are released with the context.
pub struct CompiledProgram<G: GlApi> {
    pub fragment: G::Shader,
    pub vertex: G::Shader,
    pub program: G::Program,
}

/// Result of [`prepare_program`].
pub enum Prepared<G: GlApi> {
    /// The fragment shader compiled and an early exit was requested.
    ExitAfterCompile,
    /// The program linked (and was dumped, if asked) and an early exit was requested.
    ExitAfterLink,
    /// The program is current, its uniforms are set and the viewport is sized.
    Ready(CompiledProgram<G>),
}

fn advance(state: &mut PipelineState, next: PipelineState) {
    tracing::debug!(from = ?*state, to = ?next, "pipeline stage");
    *state = next;
}

/// Runs the pipeline for `frag_source` on the current context.
///
/// `params.api` and `params.api_version` must already hold the negotiated
/// context version: binary retrieval and vertex array use depend on them.
///
/// # Errors
///
/// `ShaderCompile` / `ShaderLink` for driver rejections, `MissingAttribute`
/// if the program lacks the quad position input, and any uniform binding or
/// binary dump error.
pub fn prepare_program<G: GlApi, F: FileSystem>(
    gl: &G,
    params: &RenderParams,
    frag_source: &str,
    fs: &F,
) -> Result<Prepared<G>, RenderError> {
    let mut state = PipelineState::Uncompiled;
    let frag_file = params.frag_path.display().to_string();

    let fragment = compile_shader(gl, ShaderStage::Fragment, frag_source, &frag_file)?;
    advance(&mut state, PipelineState::FragmentCompiled);
    if params.exit_after_compile {
        return Ok(Prepared::ExitAfterCompile);
    }

    let vert_source = vertex_shader_source(params, fs)?;
    let vert_file = params
        .vert_path
        .as_ref()
        .map_or_else(|| frag_file.clone(), |p| p.display().to_string());
    let vertex = compile_shader(gl, ShaderStage::Vertex, &vert_source, &vert_file)?;
    advance(&mut state, PipelineState::VertexCompiled);

    let program = link_program(gl, params, vertex, fragment)?;
    advance(&mut state, PipelineState::Linked);

    if let Some(path) = &params.binary_out {
        dump_program_binary(gl, params, program, path, fs)?;
        advance(&mut state, PipelineState::BinaryDumped);
    }
    if params.exit_after_link {
        return Ok(Prepared::ExitAfterLink);
    }

    let location = gl.attrib_location(program, POSITION_ATTRIBUTE);
    check_error(gl, "glGetAttribLocation")?;
    let location = location.ok_or(RenderError::MissingAttribute(POSITION_ATTRIBUTE))?;

    if params.needs_vertex_array() {
        gl.bind_new_vertex_array()
            .map_err(|reason| RenderError::GlObject {
                call: "glGenVertexArrays",
                reason,
            })?;
    }
    gl.upload_positions(location, &QUAD_VERTICES)
        .map_err(|reason| RenderError::GlObject {
            call: "glGenBuffers",
            reason,
        })?;
    check_error(gl, "glVertexAttribPointer")?;

    gl.use_program(program);
    check_error(gl, "glUseProgram")?;
    let bound = bind_uniforms(gl, program, params, fs)?;
    advance(&mut state, PipelineState::UniformsBound);
    tracing::debug!(uniforms = bound, "uniforms bound");

    gl.viewport(params.width, params.height);
    check_error(gl, "glViewport")?;
    advance(&mut state, PipelineState::ViewportReady);

    Ok(Prepared::Ready(CompiledProgram {
        fragment,
        vertex,
        program,
    }))
}
