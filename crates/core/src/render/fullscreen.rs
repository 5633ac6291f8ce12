//! Full-screen quad geometry and the vertex shader that feeds it.
//!
//! The quad is two triangles covering clip space, uploaded as 2-component
//! float positions bound to [`POSITION_ATTRIBUTE`]. The synthesized vertex
//! shader declares that attribute with the GLSL version of the fragment
//! shader, so both stages link without version mismatches.

use crate::error::RenderError;
use crate::fs::FileSystem;
use crate::params::RenderParams;

/// Vertex attribute shared by the synthesized shader and the pipeline.
pub const POSITION_ATTRIBUTE: &str = "_GLF_vertexPosition";

/// Two triangles, six `(x, y)` vertices, covering `[-1, 1]^2`.
pub const QUAD_VERTICES: [f32; 12] = [
    -1.0, -1.0, -1.0, 1.0, 1.0, -1.0, //
    1.0, 1.0, -1.0, 1.0, 1.0, -1.0,
];

/// Number of vertices in [`QUAD_VERTICES`].
pub const QUAD_VERTEX_COUNT: i32 = 6;

/// Declaration tail and body shared by every synthesized vertex shader.
const VERTEX_SHADER_BODY: &str = "vec2 _GLF_vertexPosition;
void main(void) {
    gl_Position = vec4(_GLF_vertexPosition, 0.0, 1.0);
}
";

/// Returns the vertex shader source for this run.
///
/// An explicit vertex shader file is returned verbatim. Otherwise the
/// source is generated for `params.shader_version`: GLSL ES 300 gets the
/// `es` suffix and an `in` position, every other version a legacy
/// `attribute` position.
///
/// # Errors
///
/// Returns `FileNotFound` if the explicit vertex shader cannot be read.
pub fn vertex_shader_source<F: FileSystem>(
    params: &RenderParams,
    fs: &F,
) -> Result<String, RenderError> {
    if let Some(path) = &params.vert_path {
        return fs.read_to_string(path);
    }
    Ok(synthesize_vertex_shader(params.shader_version))
}

/// Generates the quad vertex shader for a GLSL version.
pub fn synthesize_vertex_shader(version: u32) -> String {
    let (suffix, qualifier) = if version == 300 {
        (" es", "in")
    } else {
        ("", "attribute")
    };
    format!("#version {version}{suffix}\n{qualifier} {VERTEX_SHADER_BODY}")
}
