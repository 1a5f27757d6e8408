//! sigil-renderer: offscreen app-icon rendering and asset-catalog export
//!
//! An icon is a square background (solid color or linear gradient) with a
//! centered glyph drawn from a symbol set. This crate renders icon
//! configurations to exact pixel sizes, writes them as PNG files together
//! with an Xcode `Contents.json` manifest, and renders clipped previews for
//! an editor.
//!
//! # Example
//!
//! ```
//! use sigil_renderer::{BackgroundKind, Color, IconConfiguration, Renderer, SymbolLibrary};
//!
//! let config = IconConfiguration::new()
//!     .with_glyph("bolt.fill")
//!     .with_background(BackgroundKind::Solid)
//!     .with_primary_color("#007aff".parse::<Color>().unwrap());
//!
//! let renderer = Renderer::new(SymbolLibrary::builtin());
//! let image = renderer.render(&config, 180).unwrap();
//! assert_eq!(image.dimensions(), (180, 180));
//! assert_eq!(image.get_pixel(0, 0).0, [0, 122, 255, 255]);
//! ```
//!
//! # Editing Sessions
//!
//! An [`IconSession`](session::IconSession) owns the live configuration.
//! Export jobs take a snapshot, so edits made while an export runs never
//! reach it:
//!
//! ```no_run
//! use sigil_renderer::catalog::{ExportMode, Platform};
//! use sigil_renderer::export::spawn_export;
//! use sigil_renderer::session::{ConfigUpdate, IconSession};
//! use sigil_renderer::SymbolLibrary;
//! use std::sync::Arc;
//!
//! let mut session = IconSession::new(Arc::new(SymbolLibrary::builtin()));
//! session.apply(ConfigUpdate::Preset("Purple".into())).unwrap();
//!
//! let job = session.export_job(ExportMode::AllSizes, &[Platform::Ios], "build");
//! let handle = spawn_export(job).unwrap();
//! session.apply(ConfigUpdate::GlyphScale(0.8)).unwrap();
//!
//! let report = handle.wait().unwrap();
//! println!("wrote {} images", report.images.len());
//! ```

pub mod catalog;
pub mod config;
pub mod export;
pub mod glyph;
pub mod manifest;
pub mod preview;
pub mod render;
pub mod session;

mod icon;

pub use config::{
    BackgroundKind, Color, ColorPreset, ConfigError, CornerRadiusStyle, IconConfiguration,
    RenderingMode, SymbolWeight,
};
pub use export::{CancelToken, ExportError, ExportReport, Exporter};
pub use glyph::{
    BoxGlyphResolver, GlyphColoring, GlyphResolver, GlyphStyle, RenderedGlyph, SymbolLibrary,
};
pub use icon::{IconImage, IconSet, SizePx};
pub use preview::{PreviewClip, Previewer};
pub use render::{RenderError, Renderer};
