#![deny(unsafe_code)]
//! Core of frag-capture: render a GLSL fragment shader onto a full-screen
//! quad and capture the result as a PNG.
//!
//! Provides GLSL `#version` detection, vertex shader synthesis, the
//! JSON-driven uniform binder, the compile/link pipeline with optional
//! binary dump, frame capture, and the frame loop. OpenGL is reached through
//! the [`GlApi`] trait and files through [`FileSystem`].

pub mod error;
pub mod fs;
pub mod gl;
pub mod params;
pub mod render;
pub mod uniform;
pub mod version;

#[cfg(test)]
mod testing;

pub use error::RenderError;
pub use fs::{FileSystem, StdFileSystem};
pub use gl::GlApi;
pub use params::{context_for_glsl, Api, RenderParams};
pub use render::{prepare_program, run_frames, GraphicsContext, Prepared};
pub use uniform::{bind_uniforms, UniformSpec};
pub use version::detect_version;
