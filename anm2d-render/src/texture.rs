//! Atlas texture loading.

use crate::{Canvas, RenderError};
use std::path::Path;

/// Loads an atlas image file into a canvas. The image's pixel dimensions are
/// the authority for texture-coordinate resolution.
pub fn load_texture(path: &Path) -> Result<Canvas, RenderError> {
    let img = image::open(path).map_err(|e| {
        RenderError::Image(format!("failed to load image '{}': {e}", path.display()))
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Canvas::from_rgba8(width, height, rgba.into_raw())
}

/// Loads an atlas image from raw encoded bytes.
pub fn load_texture_from_bytes(data: &[u8]) -> Result<Canvas, RenderError> {
    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Image(format!("failed to decode image: {e}")))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Canvas::from_rgba8(width, height, rgba.into_raw())
}
