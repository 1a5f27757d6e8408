//! Icon configuration: the value object every render and export reads.
//!
//! An [`IconConfiguration`] captures all visual parameters in a format that
//! serializes to JSON, so a design can be saved as a profile and loaded
//! back into a session or handed to the command-line exporter.
//!
//! # Example
//!
//! ```
//! use sigil_renderer::{BackgroundKind, Color, IconConfiguration};
//!
//! let config = IconConfiguration::default()
//!     .with_glyph("heart.fill")
//!     .with_background(BackgroundKind::Solid)
//!     .with_primary_color(Color::rgb(0, 122, 255));
//!
//! let json = config.to_json().unwrap();
//! let restored = IconConfiguration::from_json(&json).unwrap();
//! assert_eq!(restored.glyph_id, "heart.fill");
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed range of [`IconConfiguration::glyph_scale`].
pub const GLYPH_SCALE_RANGE: (f32, f32) = (0.3, 0.9);

/// Allowed range of [`IconConfiguration::glyph_vertical_offset`].
pub const GLYPH_OFFSET_RANGE: (f32, f32) = (-0.2, 0.2);

/// Errors raised while reading or parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write profile {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid profile JSON")]
    Json(#[from] serde_json::Error),

    #[error("invalid color {0:?}: expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),
}

// ============================================================================
// Color
// ============================================================================

/// A straight-alpha RGBA8 color.
///
/// Serializes as `"#rrggbb"` when opaque and `"#rrggbbaa"` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with its alpha multiplied by `factor`.
    pub fn with_opacity(self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Hex form without alpha, as used in SVG paint attributes.
    pub fn hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0.0-1.0 opacity.
    pub fn opacity(&self) -> f32 {
        self.a as f32 / 255.0
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(px: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = px.0;
        Self { r, g, b, a }
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let digits = s.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let (rgb, alpha) = match digits.len() {
            3 | 6 => (digits, 255),
            8 => {
                let alpha = u8::from_str_radix(&digits[6..], 16).map_err(|_| invalid())?;
                (&digits[..6], alpha)
            }
            _ => return Err(invalid()),
        };

        let parsed: Srgb<u8> = rgb.parse().map_err(|_| invalid())?;
        Ok(Self::rgba(parsed.red, parsed.green, parsed.blue, alpha))
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "{}", self.hex_rgb())
        } else {
            write!(f, "{}{:02x}", self.hex_rgb(), self.a)
        }
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for Color {
    fn schema_name() -> String {
        "Color".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as schemars::JsonSchema>::json_schema(generator)
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Stroke weight of the glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum SymbolWeight {
    Ultralight,
    Thin,
    Light,
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
    Heavy,
    Black,
}

impl SymbolWeight {
    pub const ALL: [SymbolWeight; 9] = [
        Self::Ultralight,
        Self::Thin,
        Self::Light,
        Self::Regular,
        Self::Medium,
        Self::Semibold,
        Self::Bold,
        Self::Heavy,
        Self::Black,
    ];

    /// Position from lightest (0) to heaviest (8).
    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

/// How the glyph is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum RenderingMode {
    #[default]
    Monochrome,
    Hierarchical,
    Palette,
    Multicolor,
}

/// Background fill kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Solid,
    #[default]
    Gradient,
}

/// Corner treatment used by previews. Exported files are never clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum CornerRadiusStyle {
    Square,
    #[default]
    Continuous,
}

// ============================================================================
// IconConfiguration
// ============================================================================

/// All visual parameters of an icon design.
///
/// # JSON Format
///
/// ```json
/// {
///   "glyphId": "star.fill",
///   "glyphColor": "#ffffff",
///   "glyphScale": 0.6,
///   "glyphWeight": "regular",
///   "glyphVerticalOffset": 0.0,
///   "renderingMode": "monochrome",
///   "backgroundKind": "gradient",
///   "primaryColor": "#ff9500",
///   "secondaryColor": "#ffc800",
///   "gradientAngleDegrees": 180.0,
///   "cornerRadiusStyle": "continuous"
/// }
/// ```
///
/// Missing keys take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct IconConfiguration {
    /// Symbol identifier, resolved by a [`GlyphResolver`](crate::GlyphResolver).
    pub glyph_id: String,
    pub glyph_color: Color,
    /// Fraction of the canvas width used as the glyph point size (0.3-0.9).
    pub glyph_scale: f32,
    pub glyph_weight: SymbolWeight,
    /// Fraction of the canvas height, positive moves down (-0.2-0.2).
    pub glyph_vertical_offset: f32,
    pub rendering_mode: RenderingMode,
    pub background_kind: BackgroundKind,
    /// Solid fill, or the gradient start color.
    pub primary_color: Color,
    /// Gradient end color.
    pub secondary_color: Color,
    /// Gradient angle in degrees (0-360).
    pub gradient_angle_degrees: f32,
    pub corner_radius_style: CornerRadiusStyle,
}

impl Default for IconConfiguration {
    fn default() -> Self {
        Self {
            glyph_id: "star.fill".to_string(),
            glyph_color: Color::WHITE,
            glyph_scale: 0.6,
            glyph_weight: SymbolWeight::Regular,
            glyph_vertical_offset: 0.0,
            rendering_mode: RenderingMode::Monochrome,
            background_kind: BackgroundKind::Gradient,
            primary_color: Color::rgb(255, 149, 0),
            secondary_color: Color::rgb(255, 200, 0),
            gradient_angle_degrees: 180.0,
            corner_radius_style: CornerRadiusStyle::Continuous,
        }
    }
}

impl IconConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_glyph(mut self, id: impl Into<String>) -> Self {
        self.glyph_id = id.into();
        self
    }

    pub fn with_glyph_color(mut self, color: Color) -> Self {
        self.glyph_color = color;
        self
    }

    /// Sets the glyph scale, clamped to 0.3-0.9.
    pub fn with_glyph_scale(mut self, scale: f32) -> Self {
        self.glyph_scale = clamp_scale(scale);
        self
    }

    pub fn with_weight(mut self, weight: SymbolWeight) -> Self {
        self.glyph_weight = weight;
        self
    }

    /// Sets the vertical offset, clamped to -0.2-0.2.
    pub fn with_vertical_offset(mut self, offset: f32) -> Self {
        self.glyph_vertical_offset = clamp_offset(offset);
        self
    }

    pub fn with_rendering_mode(mut self, mode: RenderingMode) -> Self {
        self.rendering_mode = mode;
        self
    }

    pub fn with_background(mut self, kind: BackgroundKind) -> Self {
        self.background_kind = kind;
        self
    }

    pub fn with_primary_color(mut self, color: Color) -> Self {
        self.primary_color = color;
        self
    }

    pub fn with_secondary_color(mut self, color: Color) -> Self {
        self.secondary_color = color;
        self
    }

    /// Sets the gradient angle, normalized to 0-360.
    pub fn with_gradient_angle(mut self, degrees: f32) -> Self {
        self.gradient_angle_degrees = normalize_angle(degrees);
        self
    }

    pub fn with_corner_style(mut self, style: CornerRadiusStyle) -> Self {
        self.corner_radius_style = style;
        self
    }

    /// Applies a color preset: glyph color, primary color, and either a
    /// top-to-bottom gradient or a solid background.
    pub fn apply_preset(&mut self, preset: &ColorPreset) {
        self.glyph_color = preset.glyph;
        self.primary_color = preset.primary;
        match preset.gradient_end {
            Some(end) => {
                self.background_kind = BackgroundKind::Gradient;
                self.secondary_color = end;
                self.gradient_angle_degrees = 180.0;
            }
            None => self.background_kind = BackgroundKind::Solid,
        }
    }

    /// Glyph scale clamped into its allowed range.
    pub fn effective_glyph_scale(&self) -> f32 {
        clamp_scale(self.glyph_scale)
    }

    /// Vertical offset clamped into its allowed range.
    pub fn effective_vertical_offset(&self) -> f32 {
        clamp_offset(self.glyph_vertical_offset)
    }

    /// Gradient angle normalized to 0-360.
    pub fn effective_gradient_angle(&self) -> f32 {
        normalize_angle(self.gradient_angle_degrees)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads a profile from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_json(&contents)?)
    }

    /// Saves the profile as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        return GLYPH_SCALE_RANGE.0;
    }
    scale.clamp(GLYPH_SCALE_RANGE.0, GLYPH_SCALE_RANGE.1)
}

fn clamp_offset(offset: f32) -> f32 {
    if offset.is_nan() {
        return 0.0;
    }
    offset.clamp(GLYPH_OFFSET_RANGE.0, GLYPH_OFFSET_RANGE.1)
}

fn normalize_angle(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

// ============================================================================
// Presets
// ============================================================================

/// A named color scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPreset {
    pub name: &'static str,
    pub primary: Color,
    pub glyph: Color,
    /// Bottom color of a top-to-bottom gradient; `None` for solid presets.
    pub gradient_end: Option<Color>,
}

const DARK_GLYPH: Color = Color::rgb(51, 51, 51);

const fn gradient(name: &'static str, top: Color, bottom: Color) -> ColorPreset {
    ColorPreset {
        name,
        primary: top,
        glyph: Color::WHITE,
        gradient_end: Some(bottom),
    }
}

const fn solid(name: &'static str, fill: Color, glyph: Color) -> ColorPreset {
    ColorPreset {
        name,
        primary: fill,
        glyph,
        gradient_end: None,
    }
}

pub static PRESETS: [ColorPreset; 12] = [
    gradient("Orange", Color::rgb(255, 149, 0), Color::rgb(255, 200, 0)),
    gradient("Blue", Color::rgb(0, 122, 255), Color::rgb(100, 200, 255)),
    gradient("Purple", Color::rgb(175, 82, 222), Color::rgb(236, 95, 251)),
    gradient("Pink", Color::rgb(255, 45, 85), Color::rgb(255, 149, 0)),
    gradient("Green", Color::rgb(52, 199, 89), Color::rgb(48, 209, 88)),
    gradient("Teal", Color::rgb(90, 200, 250), Color::rgb(100, 210, 255)),
    solid("Red", Color::rgb(255, 59, 48), Color::WHITE),
    solid("Indigo", Color::rgb(88, 86, 214), Color::WHITE),
    solid("Yellow", Color::rgb(255, 204, 0), DARK_GLYPH),
    solid("Gray", Color::rgb(142, 142, 147), Color::WHITE),
    solid("Black", Color::rgb(28, 28, 30), Color::WHITE),
    solid("White", Color::WHITE, DARK_GLYPH),
];

/// Looks up a preset by name, ignoring case.
pub fn find_preset(name: &str) -> Option<&'static ColorPreset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = IconConfiguration::default();
        assert_eq!(config.glyph_id, "star.fill");
        assert_eq!(config.glyph_color, Color::WHITE);
        assert_eq!(config.glyph_scale, 0.6);
        assert_eq!(config.glyph_weight, SymbolWeight::Regular);
        assert_eq!(config.glyph_vertical_offset, 0.0);
        assert_eq!(config.rendering_mode, RenderingMode::Monochrome);
        assert_eq!(config.background_kind, BackgroundKind::Gradient);
        assert_eq!(config.primary_color, Color::rgb(255, 149, 0));
        assert_eq!(config.secondary_color, Color::rgb(255, 200, 0));
        assert_eq!(config.gradient_angle_degrees, 180.0);
    }

    #[test]
    fn builders_clamp_ranges() {
        let config = IconConfiguration::default()
            .with_glyph_scale(1.5)
            .with_vertical_offset(-0.9)
            .with_gradient_angle(450.0);
        assert_eq!(config.glyph_scale, 0.9);
        assert_eq!(config.glyph_vertical_offset, -0.2);
        assert_eq!(config.gradient_angle_degrees, 90.0);

        let config = IconConfiguration::default().with_glyph_scale(0.1);
        assert_eq!(config.glyph_scale, 0.3);
    }

    #[test]
    fn effective_values_clamp_hand_edited_profiles() {
        let config = IconConfiguration {
            glyph_scale: 4.0,
            glyph_vertical_offset: f32::NAN,
            gradient_angle_degrees: -90.0,
            ..IconConfiguration::default()
        };
        assert_eq!(config.effective_glyph_scale(), 0.9);
        assert_eq!(config.effective_vertical_offset(), 0.0);
        assert_eq!(config.effective_gradient_angle(), 270.0);
    }

    #[test]
    fn color_hex_parsing() {
        assert_eq!("#ff9500".parse::<Color>().unwrap(), Color::rgb(255, 149, 0));
        assert_eq!("ffc800".parse::<Color>().unwrap(), Color::rgb(255, 200, 0));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(
            "#11223380".parse::<Color>().unwrap(),
            Color::rgba(0x11, 0x22, 0x33, 0x80)
        );
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn color_display_round_trips() {
        for color in [Color::rgb(1, 2, 3), Color::rgba(10, 20, 30, 40)] {
            let text = color.to_string();
            assert_eq!(text.parse::<Color>().unwrap(), color);
        }
        assert_eq!(Color::rgba(0, 0, 0, 0x7f).to_string(), "#0000007f");
    }

    #[test]
    fn profile_json_format() {
        let json = IconConfiguration::default().to_json_pretty().unwrap();
        assert!(json.contains("\"glyphId\": \"star.fill\""));
        assert!(json.contains("\"primaryColor\": \"#ff9500\""));
        assert!(json.contains("\"glyphWeight\": \"regular\""));
        assert!(json.contains("\"cornerRadiusStyle\": \"continuous\""));
    }

    #[test]
    fn partial_profile_uses_defaults() {
        let config =
            IconConfiguration::from_json(r##"{"glyphId":"bolt.fill","backgroundKind":"solid"}"##)
                .unwrap();
        assert_eq!(config.glyph_id, "bolt.fill");
        assert_eq!(config.background_kind, BackgroundKind::Solid);
        assert_eq!(config.primary_color, Color::rgb(255, 149, 0));
    }

    #[test]
    fn empty_profile_deserializes() {
        let config = IconConfiguration::from_json("{}").unwrap();
        assert_eq!(config, IconConfiguration::default());
    }

    #[test]
    fn invalid_color_is_rejected() {
        assert!(IconConfiguration::from_json(r#"{"glyphColor":"blue"}"#).is_err());
    }

    #[test]
    fn profile_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.json");
        let config = IconConfiguration::default()
            .with_glyph("cloud.fill")
            .with_weight(SymbolWeight::Heavy);

        config.save(&path).unwrap();
        let loaded = IconConfiguration::load(&path).unwrap();
        assert_eq!(loaded, config);

        let missing = IconConfiguration::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn presets_apply_background() {
        let mut config = IconConfiguration::default().with_gradient_angle(45.0);

        config.apply_preset(find_preset("yellow").unwrap());
        assert_eq!(config.background_kind, BackgroundKind::Solid);
        assert_eq!(config.primary_color, Color::rgb(255, 204, 0));
        assert_eq!(config.glyph_color, Color::rgb(51, 51, 51));

        config.apply_preset(find_preset("Blue").unwrap());
        assert_eq!(config.background_kind, BackgroundKind::Gradient);
        assert_eq!(config.secondary_color, Color::rgb(100, 200, 255));
        assert_eq!(config.gradient_angle_degrees, 180.0);
    }

    #[test]
    fn weights_are_ordered() {
        let ranks: Vec<u8> = SymbolWeight::ALL.iter().map(|w| w.rank()).collect();
        assert_eq!(ranks, (0..9).collect::<Vec<u8>>());
    }
}
