//! The render loop: draw, capture once, present.

use crate::error::RenderError;
use crate::gl::{check_error, GlApi};
use crate::params::RenderParams;
use crate::render::capture::capture_frame;
use crate::render::context::GraphicsContext;
use crate::render::fullscreen::QUAD_VERTEX_COUNT;

/// Opaque black, the background behind the quad.
const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Frames drawn and whether the capture happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOutcome {
    pub frames: u32,
    pub captured: bool,
}

/// Clears and draws the quad as two separate triangles.
///
/// # Errors
///
/// Returns `GraphicsApi` if any draw call flags an error.
pub fn draw_frame<G: GlApi>(gl: &G) -> Result<(), RenderError> {
    let half = QUAD_VERTEX_COUNT / 2;
    gl.clear(CLEAR_COLOR);
    gl.draw_triangles(0, half);
    gl.draw_triangles(half, half);
    gl.flush();
    check_error(gl, "glDrawArrays")
}

/// Renders frames until the capture is done, or, with `persist`, until the
/// context stops the loop.
///
/// The capture reads the back buffer of the frame that brings the counter
/// to `params.delay` (a delay of 0 behaves like 1), before that frame is
/// swapped. Earlier frames are rendered and presented but never captured.
/// `terminate` is called on every path, errors included.
///
/// # Errors
///
/// Propagates draw, capture and swap errors.
pub fn run_frames<C: GraphicsContext, G: GlApi>(
    ctx: &mut C,
    gl: &G,
    params: &RenderParams,
) -> Result<LoopOutcome, RenderError> {
    let result = render_until_done(ctx, gl, params);
    ctx.terminate();
    result
}

fn render_until_done<C: GraphicsContext, G: GlApi>(
    ctx: &mut C,
    gl: &G,
    params: &RenderParams,
) -> Result<LoopOutcome, RenderError> {
    let target = params.delay.max(1);
    let mut outcome = LoopOutcome {
        frames: 0,
        captured: false,
    };

    while ctx.should_continue_looping() {
        draw_frame(gl)?;
        outcome.frames += 1;

        let capture_now = !outcome.captured && outcome.frames == target;
        if capture_now {
            capture_frame(gl, params)?;
            outcome.captured = true;
        }
        ctx.swap_buffers()?;

        if capture_now {
            if !params.persist {
                break;
            }
            tracing::info!("Press any key to close the window...");
            ctx.wait_for_keypress();
        }
    }

    Ok(outcome)
}
