//! The window/context collaborator driving the render loop.
//!
//! Context creation is platform code and lives with the binary; the loop
//! only needs to poll, swap, arm the key-wait and tear down.

use crate::error::RenderError;

/// A live graphics context with a presentable surface.
///
/// All methods are called from the thread that owns the context.
pub trait GraphicsContext {
    /// Processes pending window events; false once the loop should stop.
    fn should_continue_looping(&mut self) -> bool;

    /// Presents the back buffer.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Context` if the swap fails.
    fn swap_buffers(&mut self) -> Result<(), RenderError>;

    /// From now on, any key press makes [`should_continue_looping`] return false.
    ///
    /// [`should_continue_looping`]: GraphicsContext::should_continue_looping
    fn wait_for_keypress(&mut self);

    /// Releases the context and its window.
    fn terminate(&mut self);
}
