//! Previews: rendered icons clipped to the platform's corner shape.
//!
//! Clipping happens here and only here; exported files are always
//! full-bleed squares. Rendered previews are cached per pixel size and
//! reused until the configuration version changes.

use std::collections::HashMap;

use image::RgbaImage;

use crate::config::{CornerRadiusStyle, IconConfiguration};
use crate::glyph::GlyphResolver;
use crate::icon::{IconImage, IconSet};
use crate::render::{RenderError, Renderer};
use crate::session::IconSession;

/// Pixel sizes shown by the editor: the large canvas and a home-screen tile.
pub const PREVIEW_SIZES: [u32; 2] = [1024, 60];

/// Corner radius of the iOS app-icon mask as a fraction of the icon side.
pub const CONTINUOUS_RADIUS_FRACTION: f32 = 0.2237;

/// Shape a preview is clipped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewClip {
    Square,
    RoundedContinuous { radius_fraction: f32 },
}

impl PreviewClip {
    pub fn for_style(style: CornerRadiusStyle) -> Self {
        match style {
            CornerRadiusStyle::Square => Self::Square,
            CornerRadiusStyle::Continuous => Self::RoundedContinuous {
                radius_fraction: CONTINUOUS_RADIUS_FRACTION,
            },
        }
    }

    /// Multiplies each pixel's alpha by its coverage of the clip shape.
    pub fn apply(&self, img: &mut RgbaImage) {
        let Self::RoundedContinuous { radius_fraction } = *self else {
            return;
        };

        let (w, h) = (img.width() as f32, img.height() as f32);
        let radius = (w.min(h) * radius_fraction.clamp(0.0, 0.5)).max(0.0);
        let half = (w / 2.0, h / 2.0);

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let coverage = rounded_rect_coverage(x as f32 + 0.5, y as f32 + 0.5, half, radius);
            if coverage < 1.0 {
                pixel[3] = (pixel[3] as f32 * coverage).round() as u8;
            }
        }
    }
}

/// Fraction of a pixel centered at (`px`, `py`) that lies inside a rounded
/// rectangle spanning `[0, 2 × half]`, using the signed distance to its edge.
fn rounded_rect_coverage(px: f32, py: f32, half: (f32, f32), radius: f32) -> f32 {
    let qx = (px - half.0).abs() - (half.0 - radius);
    let qy = (py - half.1).abs() - (half.1 - radius);
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    let distance = outside + inside - radius;
    (0.5 - distance).clamp(0.0, 1.0)
}

// ============================================================================
// Previewer
// ============================================================================

/// Renders clipped previews and caches them per pixel size.
///
/// Cache entries are tagged with the configuration version they were
/// rendered from; callers must pass a new version whenever the
/// configuration changes, as [`IconSession::version`] does.
#[derive(Debug)]
pub struct Previewer<R> {
    renderer: Renderer<R>,
    cache: HashMap<u32, (IconImage, u64)>,
}

impl<R: GlyphResolver> Previewer<R> {
    pub fn new(resolver: R) -> Self {
        Self::from_renderer(Renderer::new(resolver))
    }

    pub fn from_renderer(renderer: Renderer<R>) -> Self {
        Self {
            renderer,
            cache: HashMap::new(),
        }
    }

    /// Renders (or reuses) the preview of `config` at `pixel_size`.
    pub fn preview(
        &mut self,
        config: &IconConfiguration,
        version: u64,
        pixel_size: u32,
    ) -> Result<IconImage, RenderError> {
        if let Some((image, stored)) = self.cache.get(&pixel_size) {
            if *stored == version {
                return Ok(image.clone());
            }
        }

        let mut data = self.renderer.render(config, pixel_size)?;
        PreviewClip::for_style(config.corner_radius_style).apply(&mut data);
        let image = IconImage::new(data, 1);

        self.cache.insert(pixel_size, (image.clone(), version));
        Ok(image)
    }

    /// Previews `config` at each of `sizes`, in order.
    pub fn preview_set(
        &mut self,
        config: &IconConfiguration,
        version: u64,
        sizes: &[u32],
    ) -> Result<IconSet, RenderError> {
        let images = sizes
            .iter()
            .map(|size| self.preview(config, version, *size))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IconSet::from_images(images))
    }

    /// Previews a session's current configuration at [`PREVIEW_SIZES`].
    pub fn preview_session<S: GlyphResolver>(
        &mut self,
        session: &IconSession<S>,
    ) -> Result<IconSet, RenderError> {
        self.preview_set(session.config(), session.version(), &PREVIEW_SIZES)
    }

    /// Drops every cached preview.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
