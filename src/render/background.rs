//! Background pass: solid fills and linear gradients.

use image::{Rgba, RgbaImage};

use crate::config::Color;

/// Endpoints of a linear gradient in image coordinates (y grows downward).
///
/// For an angle `a` the direction is `(cos r, sin r)` with
/// `r = radians(a) − π/2`; both endpoints sit half of `max(width, height)`
/// away from the canvas center along that direction. 180° runs top to
/// bottom and 90° runs left to right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientLine {
    pub start: (f32, f32),
    pub end: (f32, f32),
}

impl GradientLine {
    pub fn for_angle(angle_degrees: f32, width: u32, height: u32) -> Self {
        let r = angle_degrees.to_radians() - std::f32::consts::FRAC_PI_2;
        let (dx, dy) = (r.cos(), r.sin());

        let center = (width as f32 / 2.0, height as f32 / 2.0);
        let half = width.max(height) as f32 / 2.0;

        Self {
            start: (center.0 - dx * half, center.1 - dy * half),
            end: (center.0 + dx * half, center.1 + dy * half),
        }
    }

    /// Position of `(x, y)` along the line, clamped to `[0, 1]` so colors
    /// extend flatly past both endpoints.
    pub fn parameter(&self, x: f32, y: f32) -> f32 {
        let (vx, vy) = (self.end.0 - self.start.0, self.end.1 - self.start.1);
        let len_sq = vx * vx + vy * vy;
        if len_sq == 0.0 {
            return 0.0;
        }
        let t = ((x - self.start.0) * vx + (y - self.start.1) * vy) / len_sq;
        t.clamp(0.0, 1.0)
    }
}

/// Fills the whole image with `color`.
pub fn fill_solid(img: &mut RgbaImage, color: Color) {
    let px = color.to_rgba();
    for pixel in img.pixels_mut() {
        *pixel = px;
    }
}

/// Fills the whole image with a linear gradient from `from` to `to`.
///
/// Each pixel is sampled at its center. Channels, alpha included, are
/// interpolated linearly in encoded sRGB.
pub fn fill_linear_gradient(img: &mut RgbaImage, from: Color, to: Color, angle_degrees: f32) {
    let line = GradientLine::for_angle(angle_degrees, img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let t = line.parameter(x as f32 + 0.5, y as f32 + 0.5);
        *pixel = lerp(from, to, t);
    }
}

fn lerp(from: Color, to: Color, t: f32) -> Rgba<u8> {
    let mix = |a: u8, b: u8| -> u8 {
        (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        mix(from.r, to.r),
        mix(from.g, to.g),
        mix(from.b, to.b),
        mix(from.a, to.a),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3
    }

    #[test]
    fn gradient_line_geometry() {
        let down = GradientLine::for_angle(180.0, 100, 100);
        assert!(close(down.start, (50.0, 0.0)), "{down:?}");
        assert!(close(down.end, (50.0, 100.0)), "{down:?}");

        let right = GradientLine::for_angle(90.0, 100, 100);
        assert!(close(right.start, (0.0, 50.0)), "{right:?}");
        assert!(close(right.end, (100.0, 50.0)), "{right:?}");

        let up = GradientLine::for_angle(0.0, 100, 100);
        assert!(close(up.start, (50.0, 100.0)), "{up:?}");
        assert!(close(up.end, (50.0, 0.0)), "{up:?}");
    }

    #[test]
    fn parameter_clamps_beyond_endpoints() {
        let line = GradientLine::for_angle(135.0, 100, 100);
        // Diagonal corners lie past both endpoints.
        assert_eq!(line.parameter(0.0, 0.0), 0.0);
        assert_eq!(line.parameter(100.0, 100.0), 1.0);
        let mid = line.parameter(50.0, 50.0);
        assert!((mid - 0.5).abs() < 1e-4);
    }

    #[test]
    fn solid_fill_covers_every_pixel() {
        let mut img = RgbaImage::new(7, 7);
        fill_solid(&mut img, Color::rgba(1, 2, 3, 4));
        assert!(img.pixels().all(|p| p.0 == [1, 2, 3, 4]));
    }

    #[test]
    fn diagonal_gradient_corners_are_flat() {
        let mut img = RgbaImage::new(64, 64);
        let (a, b) = (Color::rgb(255, 0, 0), Color::rgb(0, 0, 255));
        fill_linear_gradient(&mut img, a, b, 135.0);
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(63, 63).0, [0, 0, 255, 255]);
    }

    #[test]
    fn lerp_endpoints() {
        let (a, b) = (Color::rgba(0, 100, 200, 0), Color::rgba(255, 0, 100, 255));
        assert_eq!(lerp(a, b, 0.0).0, [0, 100, 200, 0]);
        assert_eq!(lerp(a, b, 1.0).0, [255, 0, 100, 255]);
        assert_eq!(lerp(a, b, 0.5).0, [128, 50, 150, 128]);
    }
}
