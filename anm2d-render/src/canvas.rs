//! RGBA8 raster canvas with source-over compositing and affine blits.

use crate::RenderError;
use anm2d::{Box2D, Transform2D};
use std::io::Cursor;

/// A raster surface. Pixels are stored row-major as non-premultiplied RGBA8;
/// a fresh canvas is fully transparent.
#[derive(Clone, Debug)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RenderError> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(RenderError::Image(format!(
                "buffer of {} bytes does not hold a {width}x{height} RGBA image",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.data[offset..offset + 4].copy_from_slice(&rgba);
    }

    /// Alpha-composites `src` on top of `self` at `(dx, dy)`, source-over.
    pub fn composite_over(&mut self, src: &Canvas, dx: i32, dy: i32) {
        for sy in 0..src.height as i32 {
            let ty = dy + sy;
            if ty < 0 || ty >= self.height as i32 {
                continue;
            }
            for sx in 0..src.width as i32 {
                let tx = dx + sx;
                if tx < 0 || tx >= self.width as i32 {
                    continue;
                }
                let pixel = src.get_pixel(sx as u32, sy as u32).unwrap_or([0; 4]);
                let offset = (ty as usize * self.width as usize + tx as usize) * 4;
                blend_source_over(&mut self.data[offset..offset + 4], pixel);
            }
        }
    }

    /// Blits the `src_rect` crop of `src` into `dst_rect`, mapping `dst_rect`
    /// through `transform` into canvas space. Sampling is nearest-neighbour;
    /// source alpha is further scaled by `alpha`; blending is source-over.
    pub fn draw_image_transformed(
        &mut self,
        src: &Canvas,
        src_rect: [f32; 4],
        dst_rect: [f32; 4],
        transform: &Transform2D,
        alpha: f32,
    ) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha == 0.0
            || src_rect[2] <= 0.0
            || src_rect[3] <= 0.0
            || dst_rect[2] <= 0.0
            || dst_rect[3] <= 0.0
        {
            return;
        }

        // Source crop point -> destination rect point -> canvas point.
        let crop_to_dst = Transform2D::translate(-src_rect[0], -src_rect[1])
            .mult(&Transform2D::scale(
                dst_rect[2] / src_rect[2],
                dst_rect[3] / src_rect[3],
            ))
            .mult(&Transform2D::translate(dst_rect[0], dst_rect[1]));
        let full = crop_to_dst.mult(transform);
        let Some(inverse) = invert(&full) else {
            return;
        };

        let crop = Box2D::from_rect(src_rect[0], src_rect[1], src_rect[2], src_rect[3]);
        let (x0, y0, x1, y1) = self.clipped_span(&full.outer_transformed_box(&crop));

        for py in y0..y1 {
            for px in x0..x1 {
                let (sx, sy) = inverse.transform_point(px as f32 + 0.5, py as f32 + 0.5);
                if sx < src_rect[0]
                    || sx >= src_rect[0] + src_rect[2]
                    || sy < src_rect[1]
                    || sy >= src_rect[1] + src_rect[3]
                {
                    continue;
                }
                let Some(mut pixel) = src.get_pixel(sx as u32, sy as u32) else {
                    continue;
                };
                pixel[3] = (f32::from(pixel[3]) * alpha).round() as u8;
                let offset = (py as usize * self.width as usize + px as usize) * 4;
                blend_source_over(&mut self.data[offset..offset + 4], pixel);
            }
        }
    }

    /// Fills `dst_rect` (mapped through `transform`) with `color` using the
    /// multiply composite, then implicitly restores source-over (no state is
    /// kept between calls).
    pub fn fill_rect_multiply(
        &mut self,
        dst_rect: [f32; 4],
        transform: &Transform2D,
        color: [f32; 4],
    ) {
        if dst_rect[2] <= 0.0 || dst_rect[3] <= 0.0 {
            return;
        }
        let Some(inverse) = invert(transform) else {
            return;
        };

        let rect = Box2D::from_rect(dst_rect[0], dst_rect[1], dst_rect[2], dst_rect[3]);
        let (x0, y0, x1, y1) = self.clipped_span(&transform.outer_transformed_box(&rect));

        let sa = color[3].clamp(0.0, 1.0);
        let sc = [
            color[0].clamp(0.0, 1.0),
            color[1].clamp(0.0, 1.0),
            color[2].clamp(0.0, 1.0),
        ];

        for py in y0..y1 {
            for px in x0..x1 {
                let (dx, dy) = inverse.transform_point(px as f32 + 0.5, py as f32 + 0.5);
                if dx < dst_rect[0]
                    || dx >= dst_rect[0] + dst_rect[2]
                    || dy < dst_rect[1]
                    || dy >= dst_rect[1] + dst_rect[3]
                {
                    continue;
                }
                let offset = (py as usize * self.width as usize + px as usize) * 4;
                let pixel = &mut self.data[offset..offset + 4];
                let da = f32::from(pixel[3]) / 255.0;
                let out_a = sa + da * (1.0 - sa);
                if out_a <= 0.0 {
                    continue;
                }
                for channel in 0..3 {
                    let dc = f32::from(pixel[channel]) / 255.0;
                    let blended = sc[channel] * dc;
                    let out = (sa * (1.0 - da) * sc[channel]
                        + da * (1.0 - sa) * dc
                        + sa * da * blended)
                        / out_a;
                    pixel[channel] = (out * 255.0).round().clamp(0.0, 255.0) as u8;
                }
                pixel[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| RenderError::Image("canvas buffer size mismatch".to_string()))?;
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| RenderError::Image(format!("failed to encode PNG: {e}")))?;
        Ok(out.into_inner())
    }

    /// Integer pixel span of `bounds` clipped to the canvas.
    fn clipped_span(&self, bounds: &Box2D) -> (i64, i64, i64, i64) {
        let x0 = (bounds.min[0].floor() as i64).max(0);
        let y0 = (bounds.min[1].floor() as i64).max(0);
        let x1 = (bounds.max[0].ceil() as i64).min(i64::from(self.width));
        let y1 = (bounds.max[1].ceil() as i64).min(i64::from(self.height));
        (x0, y0, x1, y1)
    }
}

fn blend_source_over(dst: &mut [u8], src: [u8; 4]) {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return;
    }
    if sa == 255 {
        dst.copy_from_slice(&src);
        return;
    }

    let da = u32::from(dst[3]);
    let inv_sa = 255 - sa;
    let out_a = sa + da * inv_sa / 255;
    if out_a == 0 {
        dst.fill(0);
        return;
    }

    for channel in 0..3 {
        let s = u32::from(src[channel]);
        let d = u32::from(dst[channel]);
        dst[channel] = ((s * sa * 255 + d * da * inv_sa) / (out_a * 255)) as u8;
    }
    dst[3] = out_a as u8;
}

/// Inverse of a row-vector affine matrix, if it has one.
fn invert(m: &Transform2D) -> Option<Transform2D> {
    let det = m.m11 * m.m22 - m.m12 * m.m21;
    if det.abs() < 1.0e-12 {
        return None;
    }
    let inv = 1.0 / det;
    let m11 = m.m22 * inv;
    let m12 = -m.m12 * inv;
    let m21 = -m.m21 * inv;
    let m22 = m.m11 * inv;
    Some(Transform2D {
        m11,
        m12,
        m21,
        m22,
        m31: -(m.m31 * m11 + m.m32 * m21),
        m32: -(m.m31 * m12 + m.m32 * m22),
    })
}
