//! The symbol library: built-in symbols plus user-supplied SVG files.
//!
//! Built-in symbols are drawn on a 24-unit grid as one or more layers. Each
//! layer carries a hierarchy level (used by hierarchical tinting) and an
//! intrinsic color (used by multicolor rendering). Weight is expressed as an
//! outline stroke in the layer's paint, so heavier weights grow every shape
//! outward; the view box is padded by half the stroke so nothing is clipped.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use super::svg::{apply_opacity, parse_svg, render_svg_scaled, render_svg_with_color};
use super::{GlyphColoring, GlyphResolver, GlyphStyle, RenderedGlyph};
use crate::config::{Color, SymbolWeight};

/// Side of the grid built-in symbols are drawn on.
const GRID: f32 = 24.0;

/// Stroke added per weight step, in grid units.
const STROKE_PER_WEIGHT: f32 = 0.2;

/// Importance of a symbol layer under hierarchical tinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hierarchy {
    Primary,
    Secondary,
    Tertiary,
}

impl Hierarchy {
    pub fn opacity(&self) -> f32 {
        match self {
            Self::Primary => 1.0,
            Self::Secondary => 0.5,
            Self::Tertiary => 0.25,
        }
    }
}

/// One shape of a built-in symbol.
#[derive(Debug)]
struct SymbolLayer {
    /// SVG shape element(s) without paint attributes.
    markup: &'static str,
    level: Hierarchy,
    tint: Color,
    /// Drawn only with the intrinsic palette (fills a knockout).
    multicolor_only: bool,
}

const fn layer(markup: &'static str, level: Hierarchy, tint: Color) -> SymbolLayer {
    SymbolLayer {
        markup,
        level,
        tint,
        multicolor_only: false,
    }
}

const fn knockout_fill(markup: &'static str, tint: Color) -> SymbolLayer {
    SymbolLayer {
        markup,
        level: Hierarchy::Primary,
        tint,
        multicolor_only: true,
    }
}

const YELLOW: Color = Color::rgb(255, 204, 0);
const ORANGE: Color = Color::rgb(255, 149, 0);
const PINK: Color = Color::rgb(255, 45, 85);
const BLUE: Color = Color::rgb(0, 122, 255);
const CYAN: Color = Color::rgb(50, 173, 230);

static STAR_FILL: [SymbolLayer; 1] = [layer(
    r#"<path d="M12 2 L14.47 8.6 L21.51 8.91 L15.99 13.3 L17.88 20.09 L12 16.2 L6.12 20.09 L8.01 13.3 L2.49 8.91 L9.53 8.6 Z"/>"#,
    Hierarchy::Primary,
    YELLOW,
)];

static HEART_FILL: [SymbolLayer; 1] = [layer(
    concat!(
        r#"<path d=""#,
        "M12 21.35 L10.55 20.03 C5.4 15.36 2 12.28 2 8.5 C2 5.42 4.42 3 7.5 3 ",
        "C9.24 3 10.91 3.81 12 5.09 C13.09 3.81 14.76 3 16.5 3 C19.58 3 22 5.42 22 8.5 ",
        "C22 12.28 18.6 15.36 13.45 20.04 Z",
        r#""/>"#
    ),
    Hierarchy::Primary,
    PINK,
)];

static BOLT_FILL: [SymbolLayer; 1] = [layer(
    r#"<path d="M7 2 V13 H10 V22 L17 10 H13 L17 2 Z"/>"#,
    Hierarchy::Primary,
    YELLOW,
)];

static CIRCLE_FILL: [SymbolLayer; 1] = [layer(
    r#"<circle cx="12" cy="12" r="10"/>"#,
    Hierarchy::Primary,
    BLUE,
)];

static SQUARE_FILL: [SymbolLayer; 1] = [layer(
    r#"<rect x="3" y="3" width="18" height="18" rx="3"/>"#,
    Hierarchy::Primary,
    BLUE,
)];

static CLOUD_FILL: [SymbolLayer; 1] = [layer(
    r#"<path d="M19.35 10.04 C18.67 6.59 15.64 4 12 4 C9.11 4 6.6 5.64 5.35 8.04 C2.34 8.36 0 10.91 0 14 C0 17.31 2.69 20 6 20 H19 C21.76 20 24 17.76 24 15 C24 12.36 21.95 10.22 19.35 10.04 Z"/>"#,
    Hierarchy::Primary,
    Color::WHITE,
)];

static DROP_FILL: [SymbolLayer; 1] = [layer(
    r#"<path d="M12 2 C12 2 5 10 5 14.5 A7 7 0 0 0 19 14.5 C19 10 12 2 12 2 Z"/>"#,
    Hierarchy::Primary,
    CYAN,
)];

static SUN_MAX_FILL: [SymbolLayer; 2] = [
    layer(r#"<circle cx="12" cy="12" r="5"/>"#, Hierarchy::Primary, YELLOW),
    layer(
        r#"<path d="M11 1 h2 v3 h-2 Z M11 20 h2 v3 h-2 Z M1 11 h3 v2 H1 Z M20 11 h3 v2 h-3 Z M4.22 5.64 l1.42 -1.42 l2.12 2.12 l-1.42 1.42 Z M16.24 17.66 l1.42 -1.42 l2.12 2.12 l-1.42 1.42 Z M4.22 18.36 l2.12 -2.12 l1.42 1.42 l-2.12 2.12 Z M16.24 6.34 l2.12 -2.12 l1.42 1.42 l-2.12 2.12 Z"/>"#,
        Hierarchy::Secondary,
        ORANGE,
    ),
];

static HEART_CIRCLE_FILL: [SymbolLayer; 2] = [
    layer(
        concat!(
            r#"<path fill-rule="evenodd" d=""#,
            "M2 12a10 10 0 1 0 20 0a10 10 0 1 0 -20 0Z ",
            "M12 17.175 L11.275 16.515 C8.7 14.18 7 12.64 7 10.75 C7 9.21 8.21 8 9.75 8 ",
            "C10.62 8 11.455 8.405 12 9.045 C12.545 8.405 13.38 8 14.25 8 C15.79 8 17 9.21 17 10.75 ",
            "C17 12.64 15.3 14.18 12.725 16.52 Z",
            r#""/>"#
        ),
        Hierarchy::Secondary,
        PINK,
    ),
    knockout_fill(
        concat!(
            r#"<path d=""#,
            "M12 17.175 L11.275 16.515 C8.7 14.18 7 12.64 7 10.75 C7 9.21 8.21 8 9.75 8 ",
            "C10.62 8 11.455 8.405 12 9.045 C12.545 8.405 13.38 8 14.25 8 C15.79 8 17 9.21 17 10.75 ",
            "C17 12.64 15.3 14.18 12.725 16.52 Z",
            r#""/>"#
        ),
        Color::WHITE,
    ),
];

static BUILTIN: [(&str, &[SymbolLayer]); 9] = [
    ("star.fill", &STAR_FILL),
    ("heart.fill", &HEART_FILL),
    ("bolt.fill", &BOLT_FILL),
    ("cloud.fill", &CLOUD_FILL),
    ("circle.fill", &CIRCLE_FILL),
    ("square.fill", &SQUARE_FILL),
    ("drop.fill", &DROP_FILL),
    ("sun.max.fill", &SUN_MAX_FILL),
    ("heart.circle.fill", &HEART_CIRCLE_FILL),
];

#[derive(Debug, Clone)]
enum SymbolSource {
    Layered(&'static [SymbolLayer]),
    Svg(String),
}

// ============================================================================
// SymbolLibrary
// ============================================================================

/// A named collection of symbols that implements [`GlyphResolver`].
///
/// # Example
///
/// ```
/// use sigil_renderer::{GlyphResolver, SymbolLibrary};
///
/// let mut library = SymbolLibrary::builtin();
/// library.register_svg(
///     "dot",
///     r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><circle cx="5" cy="5" r="4"/></svg>"#,
/// );
/// assert!(library.contains("star.fill"));
/// assert!(library.contains("dot"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymbolLibrary {
    symbols: BTreeMap<String, SymbolSource>,
    featured: Vec<&'static str>,
}

impl SymbolLibrary {
    /// Creates a library with no symbols.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a library containing the built-in symbol set.
    pub fn builtin() -> Self {
        let mut library = Self::empty();
        for (id, layers) in BUILTIN.iter() {
            library
                .symbols
                .insert((*id).to_string(), SymbolSource::Layered(*layers));
            library.featured.push(*id);
        }
        library
    }

    /// Built-in ids in display order, for pickers.
    pub fn common_symbols(&self) -> &[&'static str] {
        &self.featured
    }

    /// All known ids in lexicographic order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Adds or replaces a symbol defined by raw SVG markup.
    ///
    /// Returns false (and leaves the library unchanged) if the markup is not
    /// valid SVG.
    pub fn register_svg(&mut self, id: impl Into<String>, svg: impl Into<String>) -> bool {
        let svg = svg.into();
        if parse_svg(&svg).is_none() {
            return false;
        }
        self.symbols.insert(id.into(), SymbolSource::Svg(svg));
        true
    }

    /// Registers every `*.svg` file in `dir`, keyed by file stem.
    ///
    /// Unreadable or invalid files are skipped with a warning. Returns the
    /// number of symbols registered.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> std::io::Result<usize> {
        let dir = dir.as_ref();
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("svg")))
            .collect();
        entries.sort();

        let mut loaded = 0;
        for path in entries {
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "skipping symbol with non UTF-8 name");
                continue;
            };
            let svg = match std::fs::read_to_string(&path) {
                Ok(svg) => svg,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable symbol");
                    continue;
                }
            };
            if self.register_svg(id, svg) {
                loaded += 1;
            } else {
                warn!(path = %path.display(), "skipping invalid SVG symbol");
            }
        }

        debug!(dir = %dir.display(), loaded, "loaded symbol directory");
        Ok(loaded)
    }
}

impl GlyphResolver for SymbolLibrary {
    fn resolve(&self, id: &str, style: &GlyphStyle) -> Option<RenderedGlyph> {
        if !style.point_size.is_finite() || style.point_size <= 0.0 {
            return None;
        }
        let image = match self.symbols.get(id)? {
            SymbolSource::Layered(layers) => {
                let svg = layered_svg(layers, style);
                render_svg_scaled(&svg, style.point_size / GRID)?
            }
            SymbolSource::Svg(svg) => render_raw_symbol(svg, style)?,
        };
        Some(RenderedGlyph::new(image))
    }

    fn contains(&self, id: &str) -> bool {
        self.symbols.contains_key(id)
    }
}

/// Stroke width for a weight, in grid units.
fn stroke_width(weight: SymbolWeight) -> f32 {
    weight.rank() as f32 * STROKE_PER_WEIGHT
}

/// Builds a standalone SVG document for a layered symbol in `style`.
fn layered_svg(layers: &[SymbolLayer], style: &GlyphStyle) -> String {
    let stroke = stroke_width(style.weight);
    let pad = stroke / 2.0;
    let extent = GRID + stroke;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{min} {min} {extent} {extent}" width="{extent}" height="{extent}">"#,
        min = 0.0 - pad,
    );

    for layer in layers {
        let (paint, opacity) = match style.coloring {
            GlyphColoring::Intrinsic => (layer.tint, 1.0),
            _ if layer.multicolor_only => continue,
            GlyphColoring::Flat(color) => (color, 1.0),
            GlyphColoring::Hierarchical(color) => (color, layer.level.opacity()),
        };
        let hex = paint.hex_rgb();
        let stroke_paint = if stroke > 0.0 { hex.as_str() } else { "none" };
        svg.push_str(&format!(
            r#"<g fill="{hex}" stroke="{stroke_paint}" stroke-width="{stroke}" stroke-linejoin="round" opacity="{opacity}">{markup}</g>"#,
            opacity = paint.opacity() * opacity,
            markup = layer.markup,
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn render_raw_symbol(svg: &str, style: &GlyphStyle) -> Option<image::RgbaImage> {
    let size = style.pixel_extent();
    match style.coloring {
        GlyphColoring::Intrinsic => render_svg_with_color(svg, size, None),
        GlyphColoring::Flat(color) | GlyphColoring::Hierarchical(color) => {
            let mut img = render_svg_with_color(svg, size, Some(&color.hex_rgb()))?;
            apply_opacity(&mut img, color.opacity());
            Some(img)
        }
    }
}
