//! Single-owner editing session.
//!
//! [`IconSession`] owns the live [`IconConfiguration`]. Callers change it by
//! sending [`ConfigUpdate`] messages and hand immutable snapshots to the
//! renderer, previewer and exporter. Every applied change bumps a version
//! counter that downstream caches key on.

use std::collections::VecDeque;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::catalog::{ExportMode, Platform};
use crate::config::{
    find_preset, BackgroundKind, Color, CornerRadiusStyle, IconConfiguration, RenderingMode,
    SymbolWeight,
};
use crate::export::ExportJob;
use crate::glyph::GlyphResolver;

/// Maximum number of entries in the recent-glyph list.
pub const RECENT_CAPACITY: usize = 20;

/// Glyphs shown as recent before the user has picked any.
pub const SEED_RECENT: [&str; 4] = ["star.fill", "heart.fill", "bolt.fill", "cloud.fill"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown glyph {0:?}")]
    UnknownGlyph(String),

    #[error("unknown color preset {0:?}")]
    UnknownPreset(String),
}

/// A change to the live configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigUpdate {
    /// Select a glyph; rejected if the resolver does not know it.
    Glyph(String),
    GlyphColor(Color),
    GlyphScale(f32),
    GlyphWeight(SymbolWeight),
    VerticalOffset(f32),
    RenderingMode(RenderingMode),
    Background(BackgroundKind),
    PrimaryColor(Color),
    SecondaryColor(Color),
    GradientAngle(f32),
    CornerStyle(CornerRadiusStyle),
    /// Apply a named color preset.
    Preset(String),
    /// Replace everything, e.g. after loading a profile.
    Replace(IconConfiguration),
}

// ============================================================================
// RecentGlyphs
// ============================================================================

/// Most-recently-used glyph ids, newest first, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentGlyphs {
    items: VecDeque<String>,
    capacity: usize,
}

impl Default for RecentGlyphs {
    fn default() -> Self {
        Self::seeded()
    }
}

impl RecentGlyphs {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// A list of [`RECENT_CAPACITY`] holding [`SEED_RECENT`].
    pub fn seeded() -> Self {
        let mut recent = Self::with_capacity(RECENT_CAPACITY);
        for id in SEED_RECENT.iter().rev() {
            recent.push(*id);
        }
        recent
    }

    /// Moves `id` to the front, evicting the oldest entry when full.
    pub fn push(&mut self, id: impl Into<String>) {
        let id = id.into();
        if let Some(pos) = self.items.iter().position(|item| *item == id) {
            self.items.remove(pos);
        }
        self.items.push_front(id);
        self.items.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ============================================================================
// IconSession
// ============================================================================

/// The editing session.
///
/// # Example
///
/// ```
/// use sigil_renderer::session::{ConfigUpdate, IconSession};
/// use sigil_renderer::SymbolLibrary;
///
/// let mut session = IconSession::new(SymbolLibrary::builtin());
/// session.apply(ConfigUpdate::Glyph("bolt.fill".into())).unwrap();
/// session.apply(ConfigUpdate::GlyphScale(2.0)).unwrap();
///
/// let snapshot = session.snapshot();
/// assert_eq!(snapshot.glyph_id, "bolt.fill");
/// assert_eq!(snapshot.glyph_scale, 0.9);
/// assert!(session.apply(ConfigUpdate::Glyph("nope".into())).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct IconSession<R> {
    resolver: R,
    config: IconConfiguration,
    recent: RecentGlyphs,
    version: u64,
}

impl<R: GlyphResolver> IconSession<R> {
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, IconConfiguration::default())
    }

    pub fn with_config(resolver: R, config: IconConfiguration) -> Self {
        Self {
            resolver,
            config,
            recent: RecentGlyphs::seeded(),
            version: 0,
        }
    }

    pub fn config(&self) -> &IconConfiguration {
        &self.config
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn recent(&self) -> &RecentGlyphs {
        &self.recent
    }

    /// Incremented on every change to the configuration.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// An owned copy of the current configuration.
    pub fn snapshot(&self) -> IconConfiguration {
        self.config.clone()
    }

    /// Applies `update`. Values are clamped into range; a rejected update
    /// leaves the session unchanged.
    pub fn apply(&mut self, update: ConfigUpdate) -> Result<(), SessionError> {
        let before = self.config.clone();
        let config = std::mem::take(&mut self.config);

        self.config = match update {
            ConfigUpdate::Glyph(id) => {
                if !self.resolver.contains(&id) {
                    self.config = config;
                    return Err(SessionError::UnknownGlyph(id));
                }
                self.recent.push(id.as_str());
                config.with_glyph(id)
            }
            ConfigUpdate::GlyphColor(c) => config.with_glyph_color(c),
            ConfigUpdate::GlyphScale(s) => config.with_glyph_scale(s),
            ConfigUpdate::GlyphWeight(w) => config.with_weight(w),
            ConfigUpdate::VerticalOffset(o) => config.with_vertical_offset(o),
            ConfigUpdate::RenderingMode(m) => config.with_rendering_mode(m),
            ConfigUpdate::Background(k) => config.with_background(k),
            ConfigUpdate::PrimaryColor(c) => config.with_primary_color(c),
            ConfigUpdate::SecondaryColor(c) => config.with_secondary_color(c),
            ConfigUpdate::GradientAngle(a) => config.with_gradient_angle(a),
            ConfigUpdate::CornerStyle(s) => config.with_corner_style(s),
            ConfigUpdate::Preset(name) => {
                let Some(preset) = find_preset(&name) else {
                    self.config = config;
                    return Err(SessionError::UnknownPreset(name));
                };
                let mut config = config;
                config.apply_preset(preset);
                config
            }
            ConfigUpdate::Replace(next) => next,
        };

        if self.config != before {
            self.version += 1;
            debug!(version = self.version, "configuration updated");
        }
        Ok(())
    }

    /// Shorthand for [`ConfigUpdate::Glyph`].
    pub fn select_glyph(&mut self, id: impl Into<String>) -> Result<(), SessionError> {
        self.apply(ConfigUpdate::Glyph(id.into()))
    }

    /// Creates an export job that owns a snapshot of the current
    /// configuration. Later updates do not affect it.
    pub fn export_job(
        &self,
        mode: ExportMode,
        platforms: &[Platform],
        destination: impl Into<PathBuf>,
    ) -> ExportJob<R>
    where
        R: Clone,
    {
        ExportJob::new(
            self.resolver.clone(),
            &self.config,
            mode,
            platforms,
            destination,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::spawn_export;
    use crate::glyph::BoxGlyphResolver;
    use crate::render::Renderer;

    fn session() -> IconSession<BoxGlyphResolver> {
        IconSession::new(BoxGlyphResolver::new(["star.fill", "heart.fill", "bolt.fill"]))
    }

    #[test]
    fn recent_list_is_seeded() {
        let recent = RecentGlyphs::seeded();
        let ids: Vec<&str> = recent.iter().collect();
        assert_eq!(ids, SEED_RECENT);
        assert_eq!(recent.capacity(), RECENT_CAPACITY);
    }

    #[test]
    fn recent_list_deduplicates_and_moves_to_front() {
        let mut recent = RecentGlyphs::seeded();
        recent.push("bolt.fill");
        let ids: Vec<&str> = recent.iter().collect();
        assert_eq!(ids, ["bolt.fill", "star.fill", "heart.fill", "cloud.fill"]);
    }

    #[test]
    fn recent_list_is_capped() {
        let mut recent = RecentGlyphs::seeded();
        for i in 0..30 {
            recent.push(format!("glyph.{i}"));
        }
        assert_eq!(recent.len(), RECENT_CAPACITY);
        assert_eq!(recent.iter().next(), Some("glyph.29"));
        assert_eq!(recent.iter().last(), Some("glyph.10"));
    }

    #[test]
    fn selecting_a_known_glyph_updates_config_and_recent() {
        let mut s = session();
        s.select_glyph("heart.fill").unwrap();
        assert_eq!(s.config().glyph_id, "heart.fill");
        assert_eq!(s.recent().iter().next(), Some("heart.fill"));
        assert_eq!(s.version(), 1);
    }

    #[test]
    fn selecting_an_unknown_glyph_is_rejected() {
        let mut s = session();
        let err = s.select_glyph("cloud.fill").unwrap_err();
        assert_eq!(err, SessionError::UnknownGlyph("cloud.fill".into()));
        assert_eq!(s.config().glyph_id, "star.fill");
        assert_eq!(s.version(), 0);
    }

    #[test]
    fn updates_are_clamped() {
        let mut s = session();
        s.apply(ConfigUpdate::GlyphScale(0.1)).unwrap();
        s.apply(ConfigUpdate::VerticalOffset(1.0)).unwrap();
        s.apply(ConfigUpdate::GradientAngle(-90.0)).unwrap();
        assert_eq!(s.config().glyph_scale, 0.3);
        assert_eq!(s.config().glyph_vertical_offset, 0.2);
        assert_eq!(s.config().gradient_angle_degrees, 270.0);
        assert_eq!(s.version(), 3);
    }

    #[test]
    fn unchanged_values_keep_version() {
        let mut s = session();
        s.apply(ConfigUpdate::GlyphWeight(SymbolWeight::Regular)).unwrap();
        assert_eq!(s.version(), 0);
    }

    #[test]
    fn presets_apply_by_name() {
        let mut s = session();
        s.apply(ConfigUpdate::Preset("red".into())).unwrap();
        assert_eq!(s.config().background_kind, BackgroundKind::Solid);
        assert_eq!(s.config().primary_color, Color::rgb(255, 59, 48));

        let err = s.apply(ConfigUpdate::Preset("Mauve".into())).unwrap_err();
        assert_eq!(err, SessionError::UnknownPreset("Mauve".into()));
        assert_eq!(s.config().primary_color, Color::rgb(255, 59, 48));
    }

    #[test]
    fn snapshot_is_isolated_from_later_updates() {
        let mut s = session();
        let snapshot = s.snapshot();
        s.apply(ConfigUpdate::PrimaryColor(Color::BLACK)).unwrap();
        assert_eq!(snapshot, IconConfiguration::default());
        assert_ne!(s.config(), &snapshot);
    }

    #[test]
    fn export_job_keeps_its_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = session();
        s.apply(ConfigUpdate::Background(BackgroundKind::Solid)).unwrap();
        s.apply(ConfigUpdate::PrimaryColor(Color::rgb(0, 200, 0))).unwrap();
        let expected = s.snapshot();

        let job = s.export_job(ExportMode::SingleIcon, &[], tmp.path());
        s.apply(ConfigUpdate::PrimaryColor(Color::rgb(200, 0, 0))).unwrap();
        let report = spawn_export(job).unwrap().wait().unwrap();

        let written = image::open(&report.images[0]).unwrap().to_rgba8();
        let renderer = Renderer::new(s.resolver().clone());
        assert_eq!(written, renderer.render(&expected, 1024).unwrap());
        assert_eq!(written.get_pixel(0, 0).0, [0, 200, 0, 255]);
    }
}
