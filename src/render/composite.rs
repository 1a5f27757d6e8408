//! Straight-alpha compositing.

use image::{Rgba, RgbaImage};

/// Composites `src` onto `dest` with its top-left corner at (`x`, `y`).
///
/// Uses source-over blending on straight (non-premultiplied) alpha. Parts of
/// `src` that fall outside `dest` are clipped.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i64;
    let dest_height = dest.height() as i64;

    for sy in 0..src.height() {
        let dy = y as i64 + sy as i64;
        if dy < 0 || dy >= dest_height {
            continue;
        }
        for sx in 0..src.width() {
            let dx = x as i64 + sx as i64;
            if dx < 0 || dx >= dest_width {
                continue;
            }

            let src_pixel = *src.get_pixel(sx, sy);
            if src_pixel[3] == 0 {
                continue;
            }
            let dst_pixel = dest.get_pixel_mut(dx as u32, dy as u32);
            *dst_pixel = alpha_blend(src_pixel, *dst_pixel);
        }
    }
}

/// Alpha blends two RGBA pixels (source over destination).
pub fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 255 {
        return src;
    }

    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}
