//! Shader-to-pixel rendering.
//!
//! # Module overview
//!
//! - [`fullscreen`] -- Quad geometry and the synthesized vertex shader.
//! - [`shader`] -- Stage compilation and program linking.
//! - [`binary`] -- Program binary dump.
//! - [`pipeline`] -- Compile, link, bind and size the viewport, in order.
//! - [`capture`] -- Framebuffer read-back, row flip and PNG encoding.
//! - [`context`] -- The window/context collaborator trait.
//! - [`frame_loop`] -- Draw frames, capture once, present.

pub mod binary;
pub mod capture;
pub mod context;
pub mod frame_loop;
pub mod fullscreen;
pub mod pipeline;
pub mod shader;

pub use binary::{dump_program_binary, BinaryDump};
pub use capture::{capture_frame, flip_rows, PixelBuffer};
pub use context::GraphicsContext;
pub use frame_loop::{draw_frame, run_frames, LoopOutcome};
pub use fullscreen::{synthesize_vertex_shader, vertex_shader_source, POSITION_ATTRIBUTE};
pub use pipeline::{prepare_program, CompiledProgram, PipelineState, Prepared};
pub use shader::{compile_shader, link_program};
