//! Offscreen icon rendering.
//!
//! A render is two passes over a freshly allocated square canvas: the
//! background (solid or linear gradient), then the glyph resolved through a
//! [`GlyphResolver`], centered and composited with straight-alpha
//! source-over. Output depends only on the configuration and the pixel size.

pub mod background;
pub mod composite;

use image::RgbaImage;
use thiserror::Error;
use tracing::debug;

use crate::config::{BackgroundKind, IconConfiguration};
use crate::glyph::{GlyphColoring, GlyphResolver, GlyphStyle};

use background::{fill_linear_gradient, fill_solid};
use composite::composite_over;

/// Errors produced while rendering or encoding an icon.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not allocate a {size}x{size} canvas")]
    AllocationFailed { size: u32 },

    #[error("failed to encode image")]
    Encode(#[from] image::ImageError),
}

/// Renders icon configurations to RGBA buffers.
#[derive(Debug, Clone, Default)]
pub struct Renderer<R> {
    resolver: R,
}

impl<R: GlyphResolver> Renderer<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Renders `config` onto a `pixel_size × pixel_size` canvas.
    ///
    /// The result is full-bleed and unclipped; corner styles only affect
    /// previews. A glyph the resolver cannot draw is skipped and the
    /// background alone is returned.
    pub fn render(
        &self,
        config: &IconConfiguration,
        pixel_size: u32,
    ) -> Result<RgbaImage, RenderError> {
        let mut canvas = allocate_canvas(pixel_size)?;

        match config.background_kind {
            BackgroundKind::Solid => fill_solid(&mut canvas, config.primary_color),
            BackgroundKind::Gradient => fill_linear_gradient(
                &mut canvas,
                config.primary_color,
                config.secondary_color,
                config.effective_gradient_angle(),
            ),
        }

        self.draw_glyph(&mut canvas, config, pixel_size);
        Ok(canvas)
    }

    fn draw_glyph(&self, canvas: &mut RgbaImage, config: &IconConfiguration, pixel_size: u32) {
        let size = pixel_size as f32;
        let style = GlyphStyle::new(
            size * config.effective_glyph_scale(),
            config.glyph_weight,
            GlyphColoring::for_mode(config.rendering_mode, config.glyph_color),
        );

        let Some(glyph) = self.resolver.resolve(&config.glyph_id, &style) else {
            debug!(glyph = %config.glyph_id, pixel_size, "glyph not resolved, rendering background only");
            return;
        };

        let (x, y) = glyph_origin(
            glyph.image.width(),
            glyph.image.height(),
            pixel_size,
            config.effective_vertical_offset(),
        );
        composite_over(canvas, &glyph.image, x, y);
    }
}

/// Top-left corner of a `width × height` glyph centered on the canvas and
/// shifted down by `offset × canvas size`.
fn glyph_origin(width: u32, height: u32, canvas: u32, offset: f32) -> (i32, i32) {
    let canvas = canvas as f32;
    let x = (canvas - width as f32) / 2.0;
    let y = (canvas - height as f32) / 2.0 + offset * canvas;
    (x.round() as i32, y.round() as i32)
}

/// Allocates a transparent `size × size` canvas without aborting on
/// allocation failure.
fn allocate_canvas(size: u32) -> Result<RgbaImage, RenderError> {
    let failed = || RenderError::AllocationFailed { size };
    if size == 0 {
        return Err(failed());
    }

    let len = (size as usize)
        .checked_mul(size as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(failed)?;

    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| failed())?;
    buf.resize(len, 0);

    RgbaImage::from_raw(size, size, buf).ok_or_else(failed)
}
