//! SVG rasterization using resvg/usvg.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

/// Parses SVG markup, returning `None` if it is not valid SVG.
pub fn parse_svg(svg_data: &str) -> Option<Tree> {
    Tree::from_str(svg_data, &Options::default()).ok()
}

/// Renders an SVG string with every user unit scaled by `scale`.
///
/// The output is `ceil(svg size × scale)` pixels in each dimension.
/// Returns `None` if the SVG cannot be parsed or the pixmap cannot be
/// allocated.
pub fn render_svg_scaled(svg_data: &str, scale: f32) -> Option<RgbaImage> {
    let tree = parse_svg(svg_data)?;
    render_tree(&tree, scale)
}

/// Renders an SVG string to fit within `size x size` pixels while
/// preserving aspect ratio (the larger dimension will be `size`).
pub fn render_svg(svg_data: &str, size: u32) -> Option<RgbaImage> {
    let tree = parse_svg(svg_data)?;
    let svg_size = tree.size();
    let scale = size as f32 / svg_size.width().max(svg_size.height());
    render_tree(&tree, scale)
}

/// Renders an SVG string to fit `size`, replacing all fill and stroke
/// colors with `fill_color` (a `#rrggbb` string) when one is given.
pub fn render_svg_with_color(svg_data: &str, size: u32, fill_color: Option<&str>) -> Option<RgbaImage> {
    match fill_color {
        Some(color) => render_svg(&replace_svg_colors(svg_data, color), size),
        None => render_svg(svg_data, size),
    }
}

fn render_tree(tree: &Tree, scale: f32) -> Option<RgbaImage> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let svg_size = tree.size();
    let width = (svg_size.width() * scale).ceil() as u32;
    let height = (svg_size.height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)?;
    resvg::render(tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Some(pixmap_to_rgba_image(&pixmap))
}

/// Replaces `fill="..."` and `stroke="..."` attribute values with `hex_color`.
///
/// This is a text-level replacement; `none` and `transparent` are kept.
pub fn replace_svg_colors(svg_data: &str, hex_color: &str) -> String {
    let result = replace_color_attr(svg_data, "fill", hex_color);
    replace_color_attr(&result, "stroke", hex_color)
}

/// Replaces a color attribute value, preserving "none" values.
fn replace_color_attr(svg: &str, attr: &str, new_color: &str) -> String {
    let mut result = String::with_capacity(svg.len());
    let pattern = format!(" {}=\"", attr);
    let mut remaining = svg;

    while let Some(start) = remaining.find(&pattern) {
        result.push_str(&remaining[..start + pattern.len()]);
        remaining = &remaining[start + pattern.len()..];

        if let Some(end) = remaining.find('"') {
            let value = &remaining[..end];
            if value == "none" || value == "transparent" {
                result.push_str(value);
            } else {
                result.push_str(new_color);
            }
            remaining = &remaining[end..];
        }
    }

    result.push_str(remaining);
    result
}

/// Converts a premultiplied tiny_skia pixmap to a straight-alpha image.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Multiplies every pixel's alpha by `opacity`.
pub fn apply_opacity(img: &mut RgbaImage, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity >= 1.0 {
        return;
    }
    for pixel in img.pixels_mut() {
        pixel[3] = (pixel[3] as f32 * opacity).round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><circle cx="50" cy="50" r="40" fill="#ff0000"/></svg>"##;

    #[test]
    fn render_simple_svg() {
        let img = render_svg(SIMPLE_SVG, 50).unwrap();
        assert_eq!(img.dimensions(), (50, 50));
    }

    #[test]
    fn render_scaled_rounds_up() {
        let img = render_svg_scaled(SIMPLE_SVG, 0.255).unwrap();
        assert_eq!(img.dimensions(), (26, 26));
        assert!(render_svg_scaled(SIMPLE_SVG, 0.0).is_none());
    }

    #[test]
    fn render_svg_with_color_replacement() {
        let img = render_svg_with_color(SIMPLE_SVG, 50, Some("#00ff00")).unwrap();
        let center = img.get_pixel(25, 25);
        assert!(center[1] > center[0], "Green should dominate after color replacement");
    }

    #[test]
    fn output_is_straight_alpha() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4" fill="#ff0000" fill-opacity="0.5"/></svg>"##;
        let img = render_svg(svg, 4).unwrap();
        let px = img.get_pixel(1, 1);
        assert_eq!(px[0], 255);
        assert!((px[3] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn invalid_svg_is_none() {
        assert!(render_svg("not svg", 10).is_none());
        assert!(parse_svg("<svg").is_none());
    }

    #[test]
    fn replace_color_preserves_none() {
        let svg = r##"<circle fill="none" stroke="#000000"/>"##;
        let result = replace_svg_colors(svg, "#ff0000");
        assert!(result.contains(r#"fill="none""#));
        assert!(result.contains(r##"stroke="#ff0000""##));
    }

    #[test]
    fn replace_color_skips_similar_attribute_names() {
        let svg = r##"<path fill-rule="evenodd" fill="#123456"/>"##;
        let result = replace_svg_colors(svg, "#ffffff");
        assert!(result.contains(r#"fill-rule="evenodd""#));
        assert!(result.contains(r##"fill="#ffffff""##));
    }

    #[test]
    fn opacity_scales_alpha() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 200]));
        apply_opacity(&mut img, 0.5);
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 100]);
    }
}
