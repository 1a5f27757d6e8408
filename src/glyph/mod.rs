//! Glyph resolution.
//!
//! The renderer never knows where symbols come from. It asks a
//! [`GlyphResolver`] for a rasterized glyph at a point size, weight and
//! coloring, and gets back either an image or `None` for an identifier the
//! resolver does not know.
//!
//! Two resolvers ship with the crate:
//! - [`SymbolLibrary`]: the built-in symbol set plus user SVG symbols,
//!   rasterized with resvg.
//! - [`BoxGlyphResolver`]: a deterministic stand-in that draws filled
//!   squares, for tests and tooling that must not depend on artwork.

pub mod library;
pub mod svg;

pub use library::{Hierarchy, SymbolLibrary};

use std::sync::Arc;

use image::RgbaImage;

use crate::config::{Color, RenderingMode, SymbolWeight};
use crate::icon::SizePx;

// ============================================================================
// Style
// ============================================================================

/// Color configuration applied to a glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlyphColoring {
    /// Every layer drawn in one color.
    Flat(Color),
    /// Layers drawn in one color with opacity decreasing by hierarchy level.
    Hierarchical(Color),
    /// The glyph's own palette; the configured glyph color is ignored.
    Intrinsic,
}

impl GlyphColoring {
    /// Selects the coloring for a rendering mode.
    pub fn for_mode(mode: RenderingMode, color: Color) -> Self {
        match mode {
            RenderingMode::Monochrome | RenderingMode::Palette => Self::Flat(color),
            RenderingMode::Hierarchical => Self::Hierarchical(color),
            RenderingMode::Multicolor => Self::Intrinsic,
        }
    }
}

/// Everything a resolver needs to rasterize a glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    /// Nominal glyph size in pixels.
    pub point_size: f32,
    pub weight: SymbolWeight,
    pub coloring: GlyphColoring,
}

impl GlyphStyle {
    pub fn new(point_size: f32, weight: SymbolWeight, coloring: GlyphColoring) -> Self {
        Self {
            point_size,
            weight,
            coloring,
        }
    }

    /// Pixel side of a square covering `point_size`, at least 1.
    pub fn pixel_extent(&self) -> u32 {
        // Snap float noise such as 100 × 0.3 = 30.000002 before rounding up.
        let nearest = self.point_size.round();
        let side = if (self.point_size - nearest).abs() < 1e-3 {
            nearest
        } else {
            self.point_size.ceil()
        };
        (side as u32).max(1)
    }
}

/// A rasterized glyph. Its image dimensions are the glyph's bounding size.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGlyph {
    /// Straight-alpha RGBA8 pixels.
    pub image: RgbaImage,
}

impl RenderedGlyph {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.image.width(), self.image.height())
    }
}

// ============================================================================
// GlyphResolver
// ============================================================================

/// Looks up and rasterizes symbols by identifier.
pub trait GlyphResolver {
    /// Rasterizes `id` in `style`, or returns `None` if `id` is unknown or
    /// cannot be drawn.
    fn resolve(&self, id: &str, style: &GlyphStyle) -> Option<RenderedGlyph>;

    /// Returns true if `id` names a known symbol. Used to validate picker input.
    fn contains(&self, id: &str) -> bool;
}

impl<R: GlyphResolver + ?Sized> GlyphResolver for &R {
    fn resolve(&self, id: &str, style: &GlyphStyle) -> Option<RenderedGlyph> {
        (**self).resolve(id, style)
    }

    fn contains(&self, id: &str) -> bool {
        (**self).contains(id)
    }
}

impl<R: GlyphResolver + ?Sized> GlyphResolver for Arc<R> {
    fn resolve(&self, id: &str, style: &GlyphStyle) -> Option<RenderedGlyph> {
        (**self).resolve(id, style)
    }

    fn contains(&self, id: &str) -> bool {
        (**self).contains(id)
    }
}

// ============================================================================
// BoxGlyphResolver
// ============================================================================

/// Deterministic resolver that renders every known id as a filled square of
/// side `ceil(point_size)`.
///
/// Flat and hierarchical colorings use the configured color; the intrinsic
/// palette is [`BoxGlyphResolver::INTRINSIC`].
#[derive(Debug, Clone, Default)]
pub struct BoxGlyphResolver {
    known: Vec<String>,
}

impl BoxGlyphResolver {
    pub const INTRINSIC: Color = Color::rgb(255, 59, 48);

    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl GlyphResolver for BoxGlyphResolver {
    fn resolve(&self, id: &str, style: &GlyphStyle) -> Option<RenderedGlyph> {
        if !self.contains(id) || style.point_size.is_nan() || style.point_size <= 0.0 {
            return None;
        }
        let color = match style.coloring {
            GlyphColoring::Flat(c) | GlyphColoring::Hierarchical(c) => c,
            GlyphColoring::Intrinsic => Self::INTRINSIC,
        };
        let side = style.pixel_extent();
        Some(RenderedGlyph::new(RgbaImage::from_pixel(
            side,
            side,
            color.to_rgba(),
        )))
    }

    fn contains(&self, id: &str) -> bool {
        self.known.iter().any(|k| k == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coloring_follows_rendering_mode() {
        let c = Color::rgb(1, 2, 3);
        assert_eq!(
            GlyphColoring::for_mode(RenderingMode::Monochrome, c),
            GlyphColoring::Flat(c)
        );
        assert_eq!(
            GlyphColoring::for_mode(RenderingMode::Palette, c),
            GlyphColoring::Flat(c)
        );
        assert_eq!(
            GlyphColoring::for_mode(RenderingMode::Hierarchical, c),
            GlyphColoring::Hierarchical(c)
        );
        assert_eq!(
            GlyphColoring::for_mode(RenderingMode::Multicolor, c),
            GlyphColoring::Intrinsic
        );
    }

    #[test]
    fn box_resolver_known_and_unknown() {
        let resolver = BoxGlyphResolver::new(["star.fill"]);
        let style = GlyphStyle::new(
            9.6,
            SymbolWeight::Regular,
            GlyphColoring::Flat(Color::WHITE),
        );

        let glyph = resolver.resolve("star.fill", &style).unwrap();
        assert_eq!(glyph.size(), SizePx::square(10));
        assert_eq!(glyph.image.get_pixel(0, 0).0, [255, 255, 255, 255]);

        assert!(resolver.resolve("nope", &style).is_none());
        assert!(!resolver.contains("nope"));
    }

    #[test]
    fn box_resolver_intrinsic_ignores_color() {
        let resolver = BoxGlyphResolver::new(["a"]);
        let style = GlyphStyle::new(2.0, SymbolWeight::Bold, GlyphColoring::Intrinsic);
        let glyph = resolver.resolve("a", &style).unwrap();
        assert_eq!(Color::from(*glyph.image.get_pixel(1, 1)), BoxGlyphResolver::INTRINSIC);
    }

    #[test]
    fn resolver_through_arc_and_ref() {
        let resolver = Arc::new(BoxGlyphResolver::new(["a"]));
        assert!(resolver.contains("a"));
        assert!((&*resolver).contains("a"));
    }
}
