//! Run configuration shared by every stage of the pipeline.
//!
//! `RenderParams` is filled once from defaults and command-line overrides.
//! Only `api` and `api_version` change afterwards, when the graphics context
//! reports what it actually negotiated.

use std::fmt;
use std::path::PathBuf;

/// OpenGL API family of the rendering context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    OpenGl,
    OpenGlEs,
}

impl Api {
    /// Formats an API version (`major*100 + minor*10`) as e.g. `OpenGLES 3.0`.
    pub fn describe(self, version: u32) -> String {
        format!("{self} {}.{}", version / 100, (version % 100) / 10)
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Api::OpenGl => write!(f, "OpenGL"),
            Api::OpenGlEs => write!(f, "OpenGLES"),
        }
    }
}

/// The context an API family and GLSL version call for, as `(api, major*100 + minor*10)`.
///
/// GLSL 100 and 300 are the ES languages; everything else maps to the
/// desktop GL release that introduced that language version.
pub fn context_for_glsl(glsl_version: u32) -> (Api, u32) {
    match glsl_version {
        100 => (Api::OpenGlEs, 200),
        300 => (Api::OpenGlEs, 300),
        110 => (Api::OpenGl, 200),
        120 => (Api::OpenGl, 210),
        130 => (Api::OpenGl, 300),
        140 => (Api::OpenGl, 310),
        150 => (Api::OpenGl, 320),
        v => (Api::OpenGl, v),
    }
}

/// Immutable-after-parse configuration for one render.
#[derive(Debug, Clone)]
pub struct RenderParams {
    /// Framebuffer width in pixels.
    pub width: u32,
    /// Framebuffer height in pixels.
    pub height: u32,
    /// GLSL version detected from the fragment shader (0 until detected).
    pub shader_version: u32,
    /// API family, requested first and then overwritten with the negotiated one.
    pub api: Api,
    /// API version as `major*100 + minor*10`, overwritten after negotiation.
    pub api_version: u32,
    /// Fragment shader path. The uniform sidecar path derives from it.
    pub frag_path: PathBuf,
    /// Optional vertex shader used instead of the synthesized one.
    pub vert_path: Option<PathBuf>,
    /// PNG destination.
    pub output: PathBuf,
    /// Optional destination for the linked program binary.
    pub binary_out: Option<PathBuf>,
    /// Frames rendered before the capture.
    pub delay: u32,
    pub exit_after_compile: bool,
    pub exit_after_link: bool,
    /// Keep the window open after capture until a key is pressed.
    pub persist: bool,
}

impl RenderParams {
    /// Default parameters for the given fragment shader.
    pub fn new(frag_path: impl Into<PathBuf>) -> Self {
        Self {
            width: 256,
            height: 256,
            shader_version: 0,
            api: Api::OpenGl,
            api_version: 0,
            frag_path: frag_path.into(),
            vert_path: None,
            output: PathBuf::from("output.png"),
            binary_out: None,
            delay: 5,
            exit_after_compile: false,
            exit_after_link: false,
            persist: false,
        }
    }

    /// Whether program binaries can be retrieved on the negotiated context.
    ///
    /// Requires OpenGL 4.1 or OpenGL ES 3.0.
    pub fn supports_program_binary(&self) -> bool {
        match self.api {
            Api::OpenGl => self.api_version >= 410,
            Api::OpenGlEs => self.api_version >= 300,
        }
    }

    /// Whether the quad needs a vertex array object (ES, or GL 3.0 and later).
    pub fn needs_vertex_array(&self) -> bool {
        self.api == Api::OpenGlEs || self.api_version >= 300
    }

    /// Human-readable negotiated API, e.g. `OpenGL 3.3`.
    pub fn api_description(&self) -> String {
        self.api.describe(self.api_version)
    }
}
