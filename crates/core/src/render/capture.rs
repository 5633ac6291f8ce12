//! Reading back the framebuffer and writing it as a PNG.
//!
//! GL returns rows bottom-up; image files store them top-down. The buffer
//! is flipped row by row before encoding, leaving the byte order within
//! each row untouched.

use crate::error::RenderError;
use crate::gl::{check_error, GlApi};
use crate::params::RenderParams;
use std::path::Path;

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// An RGBA8 pixel buffer with top-left origin, ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Builds a top-left-origin buffer from GL's bottom-left-origin rows.
    pub fn from_gl_rows(width: u32, height: u32, rows: &[u8]) -> Self {
        Self {
            width,
            height,
            data: flip_rows(rows, width as usize * CHANNELS, height as usize),
        }
    }

    /// Encodes the buffer as an 8-bit RGBA PNG at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ImageEncode` with the encoder's message if the buffer size
    /// does not match the dimensions or the file cannot be written.
    pub fn write_png(self, path: &Path) -> Result<(), RenderError> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| RenderError::ImageEncode("RGBA buffer size mismatch".into()))?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| RenderError::ImageEncode(e.to_string()))
    }
}

/// Reverses the order of `height` rows of `stride` bytes each.
///
/// Destination row `r` is source row `height - 1 - r`.
pub fn flip_rows(data: &[u8], stride: usize, height: usize) -> Vec<u8> {
    if stride == 0 {
        return Vec::new();
    }
    data.chunks_exact(stride)
        .take(height)
        .rev()
        .flatten()
        .copied()
        .collect()
}

/// Reads the current color buffer and writes it to `params.output`.
///
/// # Errors
///
/// Returns `GraphicsApi` if the read-back fails, or `ImageEncode` if PNG
/// encoding fails.
pub fn capture_frame<G: GlApi>(gl: &G, params: &RenderParams) -> Result<(), RenderError> {
    let rows = gl.read_pixels(params.width, params.height);
    check_error(gl, "glReadPixels")?;

    PixelBuffer::from_gl_rows(params.width, params.height, &rows).write_png(&params.output)?;
    tracing::info!(
        path = %params.output.display(),
        width = params.width,
        height = params.height,
        "frame captured"
    );
    Ok(())
}
