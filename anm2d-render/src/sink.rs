//! Raster blit sink for the core render walker.

use crate::Canvas;
use anm2d::{BlitSink, Shape, SpriteTransform, Transform2D};

/// Draws every walked shape onto a canvas by cropping the atlas texture.
///
/// The destination rect negates and offsets y so sprite space (y-up) lands on
/// the y-down canvas; the post-scale by `(1, -1)` flips the crop back upright
/// inside that rect.
pub struct CanvasSink<'a> {
    canvas: &'a mut Canvas,
    texture: &'a Canvas,
}

impl<'a> CanvasSink<'a> {
    pub fn new(canvas: &'a mut Canvas, texture: &'a Canvas) -> Self {
        Self { canvas, texture }
    }
}

impl BlitSink for CanvasSink<'_> {
    fn draw_shape(&mut self, shape: &Shape, transform: &SpriteTransform) {
        let tex_w = self.texture.width as f32;
        let tex_h = self.texture.height as f32;
        let src = [
            shape.left * tex_w,
            shape.top * tex_h,
            (shape.right - shape.left) * tex_w,
            (shape.bottom - shape.top) * tex_h,
        ];
        let width = f32::from(shape.width);
        let height = f32::from(shape.height);
        let dst = [shape.offset_x, -(shape.offset_y + height), width, height];

        let color = transform.color.to_color();
        let full = Transform2D::scale(1.0, -1.0).mult(&transform.position);

        self.canvas
            .draw_image_transformed(self.texture, src, dst, &full, color[3]);

        // Tint pass: only non-grayscale, non-transparent colors multiply the
        // destination rect.
        let grayscale = color[0] == color[1] && color[1] == color[2];
        if !grayscale && color[3] != 0.0 {
            self.canvas.fill_rect_multiply(dst, &full, color);
        }
    }
}
