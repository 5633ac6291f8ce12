//! The slice of OpenGL the pipeline uses.
//!
//! [`GlApi`] is implemented for `glow::Context` in [`glow_backend`]. The
//! pipeline, uniform binder and frame capture are written against the trait
//! only, so they run unchanged against a recording double in tests.
//!
//! Methods are safe: the `glow` implementation owns the `unsafe` blocks and
//! relies on being called on the thread that owns the current context.

pub mod glow_backend;

use crate::error::RenderError;
use crate::uniform::dispatch::BindingFunction;

/// Shader stage to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Lower-case stage name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }

    /// The GL enum for this stage.
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

/// Description of one active uniform, as reported after linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUniform {
    /// Name as reported by the driver; arrays carry a `[0]` suffix.
    pub name: String,
    /// Array length, 1 for non-arrays.
    pub size: i32,
    /// GL type enum (`FLOAT_VEC2`, ...).
    pub utype: u32,
}

impl ActiveUniform {
    /// Name without any array subscript (`weights[0]` becomes `weights`).
    pub fn base_name(&self) -> &str {
        match self.name.find('[') {
            Some(i) => &self.name[..i],
            None => &self.name,
        }
    }
}

/// Values for one uniform binding call, already converted to GL element types.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(Vec<f32>),
    Int(Vec<i32>),
    Uint(Vec<u32>),
}

impl UniformValue {
    /// Number of scalar elements carried.
    pub fn len(&self) -> usize {
        match self {
            UniformValue::Float(v) => v.len(),
            UniformValue::Int(v) => v.len(),
            UniformValue::Uint(v) => v.len(),
        }
    }

    /// True when no element is carried.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A retrieved program binary and its driver-specific format tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramBinary {
    pub format: u32,
    pub bytes: Vec<u8>,
}

/// Symbolic name of a `glGetError` code.
pub fn gl_error_name(code: u32) -> &'static str {
    match code {
        glow::NO_ERROR => "GL_NO_ERROR",
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        glow::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        glow::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        _ => "UNKNOWN_ERROR",
    }
}

/// OpenGL operations used to compile, bind, draw and read back one program.
pub trait GlApi {
    type Shader: Copy;
    type Program: Copy;
    type UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;

    fn create_program(&self) -> Result<Self::Program, String>;
    /// Asks the driver to keep the linked binary retrievable.
    fn program_binary_retrievable_hint(&self, program: Self::Program);
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;

    /// `GL_NUM_PROGRAM_BINARY_FORMATS`.
    fn num_program_binary_formats(&self) -> i32;
    fn program_binary(&self, program: Self::Program) -> Option<ProgramBinary>;

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    /// Creates a vertex array object and leaves it bound.
    fn bind_new_vertex_array(&self) -> Result<(), String>;
    /// Uploads 2-component float positions and wires them to attribute `location`.
    fn upload_positions(&self, location: u32, vertices: &[f32]) -> Result<(), String>;
    fn use_program(&self, program: Self::Program);

    fn active_uniform_count(&self, program: Self::Program) -> u32;
    fn active_uniform(&self, program: Self::Program, index: u32) -> Option<ActiveUniform>;
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    /// Issues the GL call named by `func` with `value`.
    ///
    /// Exactly one call is made. Scalar forms read `func.components` values
    /// and zero-fill missing ones.
    fn set_uniform(
        &self,
        location: &Self::UniformLocation,
        func: &BindingFunction,
        value: &UniformValue,
    );

    /// `glGetError`; `glow::NO_ERROR` when no error flag is set.
    fn error(&self) -> u32;

    fn viewport(&self, width: u32, height: u32);
    fn clear(&self, rgba: [f32; 4]);
    fn draw_triangles(&self, first: i32, count: i32);
    fn flush(&self);
    /// Reads `width * height` RGBA8 pixels from the bound read buffer, bottom row first.
    fn read_pixels(&self, width: u32, height: u32) -> Vec<u8>;
}

/// Fails with `GraphicsApi` if the last GL call left an error flag set.
///
/// # Errors
///
/// Returns `RenderError::GraphicsApi` naming `call` and the GL error.
pub fn check_error<G: GlApi>(gl: &G, call: &str) -> Result<(), RenderError> {
    match gl.error() {
        glow::NO_ERROR => Ok(()),
        code => Err(RenderError::GraphicsApi {
            call: call.to_string(),
            code: gl_error_name(code),
        }),
    }
}
