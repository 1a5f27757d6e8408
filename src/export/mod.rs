//! Writing icon sets and single PNG files to disk.
//!
//! An icon-set export creates `{destination}/AppIcon.appiconset`, renders
//! every catalog slot in order, writes each as an 8-bit RGBA PNG and finally
//! writes `Contents.json`. The first failure aborts the export; files already
//! written stay on disk and no manifest is written.
//!
//! # Example
//!
//! ```no_run
//! use sigil_renderer::catalog::{ExportMode, Platform};
//! use sigil_renderer::{Exporter, IconConfiguration, SymbolLibrary};
//!
//! let exporter = Exporter::new(SymbolLibrary::builtin());
//! let config = IconConfiguration::default();
//! let report = exporter
//!     .export_icon_set(&config, ExportMode::AllSizes, &[Platform::Ios], "build/icons")
//!     .unwrap();
//! assert_eq!(report.images.len(), 9);
//! ```

pub mod job;

pub use job::{spawn_export, ExportEvent, ExportHandle, ExportJob};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{assets_for, AssetDescriptor, ExportMode, Platform, SINGLE_ICON};
use crate::config::IconConfiguration;
use crate::glyph::GlyphResolver;
use crate::manifest;
use crate::render::{RenderError, Renderer};

/// Name of the asset-catalog directory created inside the destination.
pub const APPICONSET_DIR: &str = "AppIcon.appiconset";

/// Name of the manifest written into the asset-catalog directory.
pub const MANIFEST_FILENAME: &str = "Contents.json";

/// Errors produced by an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to render {filename}")]
    RenderingFailed {
        filename: String,
        #[source]
        source: RenderError,
    },

    #[error("failed to write {0}")]
    FileWriteFailed(String),

    #[error("failed to create directory {}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize manifest")]
    Manifest(#[from] serde_json::Error),

    #[error("no platforms selected for an all-sizes export")]
    NoPlatforms,

    #[error("export cancelled")]
    Cancelled,

    #[error("export worker stopped without a result")]
    WorkerFailed,
}

/// Shared flag used to stop an export between assets.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Files written by a successful icon-set export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// The `AppIcon.appiconset` directory.
    pub directory: PathBuf,
    /// PNG files in catalog order.
    pub images: Vec<PathBuf>,
    /// The `Contents.json` file.
    pub manifest: PathBuf,
}

impl ExportReport {
    /// Every written path, images first.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.images
            .iter()
            .chain(std::iter::once(&self.manifest))
            .map(PathBuf::as_path)
    }
}

/// Renders and writes icon sets.
#[derive(Debug, Clone, Default)]
pub struct Exporter<R> {
    renderer: Renderer<R>,
}

impl<R: GlyphResolver> Exporter<R> {
    pub fn new(resolver: R) -> Self {
        Self::from_renderer(Renderer::new(resolver))
    }

    pub fn from_renderer(renderer: Renderer<R>) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &Renderer<R> {
        &self.renderer
    }

    /// Exports an asset catalog for `mode` and `platforms` into
    /// `{destination}/AppIcon.appiconset`.
    pub fn export_icon_set(
        &self,
        config: &IconConfiguration,
        mode: ExportMode,
        platforms: &[Platform],
        destination: impl AsRef<Path>,
    ) -> Result<ExportReport, ExportError> {
        self.export_icon_set_with_cancel(config, mode, platforms, destination, &CancelToken::new())
    }

    /// Like [`export_icon_set`](Self::export_icon_set), checking `cancel`
    /// before each asset. A cancelled export returns
    /// [`ExportError::Cancelled`] and writes no manifest.
    pub fn export_icon_set_with_cancel(
        &self,
        config: &IconConfiguration,
        mode: ExportMode,
        platforms: &[Platform],
        destination: impl AsRef<Path>,
        cancel: &CancelToken,
    ) -> Result<ExportReport, ExportError> {
        self.run(config, mode, platforms, destination.as_ref(), cancel, &mut |_, _| {})
    }

    pub(crate) fn run(
        &self,
        config: &IconConfiguration,
        mode: ExportMode,
        platforms: &[Platform],
        destination: &Path,
        cancel: &CancelToken,
        on_written: &mut dyn FnMut(&AssetDescriptor, &Path),
    ) -> Result<ExportReport, ExportError> {
        if mode == ExportMode::AllSizes && platforms.is_empty() {
            return Err(ExportError::NoPlatforms);
        }
        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }

        let directory = destination.join(APPICONSET_DIR);
        fs::create_dir_all(&directory).map_err(|source| ExportError::DirectoryCreationFailed {
            path: directory.clone(),
            source,
        })?;

        let assets = assets_for(mode, platforms);
        let mut images = Vec::with_capacity(assets.len());

        for asset in &assets {
            if cancel.is_cancelled() {
                info!(written = images.len(), "export cancelled");
                return Err(ExportError::Cancelled);
            }

            let path = directory.join(asset.filename.as_ref());
            let png = self
                .render_png(config, asset.size.width)
                .map_err(|source| ExportError::RenderingFailed {
                    filename: asset.filename.to_string(),
                    source,
                })?;
            write_file(&path, &png, &asset.filename)?;

            debug!(file = %asset.filename, pixels = asset.size.width, "wrote icon");
            on_written(asset, &path);
            images.push(path);
        }

        let manifest_text = manifest::generate(mode, &assets)?;
        let manifest = directory.join(MANIFEST_FILENAME);
        write_file(&manifest, manifest_text.as_bytes(), MANIFEST_FILENAME)?;
        debug!(path = %manifest.display(), "wrote manifest");

        info!(
            directory = %directory.display(),
            images = images.len(),
            glyph = %config.glyph_id,
            "exported icon set"
        );

        Ok(ExportReport {
            directory,
            images,
            manifest,
        })
    }

    /// Renders the 1024×1024 icon and writes it as a PNG at `path`.
    pub fn export_single_file(
        &self,
        config: &IconConfiguration,
        path: impl AsRef<Path>,
    ) -> Result<(), ExportError> {
        let path = path.as_ref();
        let name = path.display().to_string();

        let png = self
            .render_png(config, SINGLE_ICON.size.width)
            .map_err(|source| ExportError::RenderingFailed {
                filename: name.clone(),
                source,
            })?;
        write_file(path, &png, &name)?;

        info!(path = %name, "exported single icon");
        Ok(())
    }

    /// Renders `config` at `pixel_size` and encodes it as an 8-bit RGBA PNG.
    pub fn render_png(
        &self,
        config: &IconConfiguration,
        pixel_size: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let image = self.renderer.render(config, pixel_size)?;
        encode_png(&image)
    }
}

/// Encodes an image as an 8-bit RGBA PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

fn write_file(path: &Path, bytes: &[u8], name: &str) -> Result<(), ExportError> {
    fs::write(path, bytes).map_err(|err| {
        warn!(path = %path.display(), error = %err, "write failed");
        ExportError::FileWriteFailed(name.to_string())
    })
}
