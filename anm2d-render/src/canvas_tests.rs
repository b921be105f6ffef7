use crate::{load_texture_from_bytes, Canvas};
use anm2d::Transform2D;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    for y in 0..height {
        for x in 0..width {
            canvas.set_pixel(x, y, rgba);
        }
    }
    canvas
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

#[test]
fn new_canvas_is_transparent() {
    let canvas = Canvas::new(4, 3);
    assert_eq!(canvas.data.len(), 4 * 3 * 4);
    assert_eq!(canvas.get_pixel(0, 0), Some(CLEAR));
    assert_eq!(canvas.get_pixel(3, 2), Some(CLEAR));
}

#[test]
fn get_set_pixel_and_bounds() {
    let mut canvas = Canvas::new(4, 4);
    canvas.set_pixel(2, 1, RED);
    assert_eq!(canvas.get_pixel(2, 1), Some(RED));
    assert_eq!(canvas.get_pixel(4, 0), None);
    assert_eq!(canvas.get_pixel(0, 4), None);
    // Out-of-bounds writes are ignored.
    canvas.set_pixel(9, 9, RED);
}

#[test]
fn from_rgba8_rejects_wrong_length() {
    assert!(Canvas::from_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(Canvas::from_rgba8(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn composite_over_opaque_replaces() {
    let mut dst = solid(4, 4, BLUE);
    let src = solid(2, 2, RED);
    dst.composite_over(&src, 1, 1);
    assert_eq!(dst.get_pixel(1, 1), Some(RED));
    assert_eq!(dst.get_pixel(2, 2), Some(RED));
    assert_eq!(dst.get_pixel(0, 0), Some(BLUE));
    assert_eq!(dst.get_pixel(3, 3), Some(BLUE));
}

#[test]
fn composite_over_transparent_keeps_destination() {
    let mut dst = solid(2, 2, WHITE);
    let src = Canvas::new(2, 2);
    dst.composite_over(&src, 0, 0);
    assert_eq!(dst.get_pixel(0, 0), Some(WHITE));
}

#[test]
fn composite_over_semi_transparent_blends() {
    let mut dst = solid(1, 1, WHITE);
    let mut src = Canvas::new(1, 1);
    src.set_pixel(0, 0, [255, 0, 0, 128]);
    dst.composite_over(&src, 0, 0);
    let pixel = dst.get_pixel(0, 0).unwrap();
    assert!(pixel[0] > 200);
    assert!(pixel[1] > 50 && pixel[1] < 200);
    assert!(pixel[2] > 50 && pixel[2] < 200);
    assert_eq!(pixel[3], 255);
}

#[test]
fn composite_over_clips_negative_offsets() {
    let mut dst = solid(2, 2, BLUE);
    let src = solid(2, 2, RED);
    dst.composite_over(&src, -1, -1);
    assert_eq!(dst.get_pixel(0, 0), Some(RED));
    assert_eq!(dst.get_pixel(1, 1), Some(BLUE));
}

#[test]
fn identity_blit_copies_the_crop() {
    let mut src = Canvas::new(2, 2);
    src.set_pixel(0, 0, RED);
    src.set_pixel(1, 0, BLUE);
    src.set_pixel(0, 1, WHITE);
    src.set_pixel(1, 1, [0, 255, 0, 255]);

    let mut dst = Canvas::new(4, 4);
    dst.draw_image_transformed(
        &src,
        [0.0, 0.0, 2.0, 2.0],
        [1.0, 1.0, 2.0, 2.0],
        &Transform2D::identity(),
        1.0,
    );
    assert_eq!(dst.get_pixel(0, 0), Some(CLEAR));
    assert_eq!(dst.get_pixel(1, 1), Some(RED));
    assert_eq!(dst.get_pixel(2, 1), Some(BLUE));
    assert_eq!(dst.get_pixel(1, 2), Some(WHITE));
    assert_eq!(dst.get_pixel(2, 2), Some([0, 255, 0, 255]));
    assert_eq!(dst.get_pixel(3, 3), Some(CLEAR));
}

#[test]
fn scaled_blit_covers_the_scaled_footprint() {
    let src = solid(2, 2, RED);
    let mut dst = Canvas::new(8, 8);
    dst.draw_image_transformed(
        &src,
        [0.0, 0.0, 2.0, 2.0],
        [0.0, 0.0, 2.0, 2.0],
        &Transform2D::scale(2.0, 2.0),
        1.0,
    );
    let mut painted = 0;
    for y in 0..8 {
        for x in 0..8 {
            if dst.get_pixel(x, y).unwrap()[3] != 0 {
                painted += 1;
                assert!(x < 4 && y < 4, "pixel ({x},{y}) outside scaled footprint");
            }
        }
    }
    assert_eq!(painted, 16);
}

#[test]
fn vertical_flip_mirrors_rows() {
    let mut src = Canvas::new(1, 2);
    src.set_pixel(0, 0, RED);
    src.set_pixel(0, 1, BLUE);

    // Destination rect sits at negative y; the flip maps it back onto the
    // canvas with rows mirrored.
    let mut dst = Canvas::new(1, 2);
    dst.draw_image_transformed(
        &src,
        [0.0, 0.0, 1.0, 2.0],
        [0.0, -2.0, 1.0, 2.0],
        &Transform2D::scale(1.0, -1.0),
        1.0,
    );
    assert_eq!(dst.get_pixel(0, 0), Some(BLUE));
    assert_eq!(dst.get_pixel(0, 1), Some(RED));
}

#[test]
fn blit_global_alpha_scales_source_alpha() {
    let src = solid(1, 1, RED);
    let mut dst = Canvas::new(1, 1);
    dst.draw_image_transformed(
        &src,
        [0.0, 0.0, 1.0, 1.0],
        [0.0, 0.0, 1.0, 1.0],
        &Transform2D::identity(),
        0.5,
    );
    let pixel = dst.get_pixel(0, 0).unwrap();
    assert_eq!(pixel[0], 255);
    assert!((i32::from(pixel[3]) - 128).abs() <= 1);
}

#[test]
fn zero_alpha_blit_is_a_no_op() {
    let src = solid(1, 1, RED);
    let mut dst = solid(1, 1, BLUE);
    dst.draw_image_transformed(
        &src,
        [0.0, 0.0, 1.0, 1.0],
        [0.0, 0.0, 1.0, 1.0],
        &Transform2D::identity(),
        0.0,
    );
    assert_eq!(dst.get_pixel(0, 0), Some(BLUE));
}

#[test]
fn multiply_fill_tints_opaque_pixels() {
    let mut dst = solid(2, 2, WHITE);
    dst.fill_rect_multiply(
        [0.0, 0.0, 1.0, 2.0],
        &Transform2D::identity(),
        [1.0, 0.0, 0.0, 1.0],
    );
    // White times red is red; the untouched column stays white.
    assert_eq!(dst.get_pixel(0, 0), Some(RED));
    assert_eq!(dst.get_pixel(0, 1), Some(RED));
    assert_eq!(dst.get_pixel(1, 0), Some(WHITE));
}

#[test]
fn multiply_fill_with_half_alpha_blends_halfway() {
    let mut dst = solid(1, 1, WHITE);
    dst.fill_rect_multiply(
        [0.0, 0.0, 1.0, 1.0],
        &Transform2D::identity(),
        [0.0, 0.0, 0.0, 0.5],
    );
    let pixel = dst.get_pixel(0, 0).unwrap();
    // Halfway between white and (white times black).
    assert!((i32::from(pixel[0]) - 128).abs() <= 1);
    assert_eq!(pixel[3], 255);
}

#[test]
fn png_round_trip_preserves_pixels() {
    let mut canvas = Canvas::new(3, 2);
    canvas.set_pixel(0, 0, RED);
    canvas.set_pixel(2, 1, [10, 20, 30, 40]);
    let png = canvas.to_png().expect("encode");
    let decoded = load_texture_from_bytes(&png).expect("decode");
    assert_eq!(decoded.width, 3);
    assert_eq!(decoded.height, 2);
    assert_eq!(decoded.get_pixel(0, 0), Some(RED));
    assert_eq!(decoded.get_pixel(2, 1), Some([10, 20, 30, 40]));
    assert_eq!(decoded.get_pixel(1, 0), Some(CLEAR));
}
