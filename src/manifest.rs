//! Asset-catalog manifest (`Contents.json`) generation and parsing.
//!
//! Output matches what Xcode itself writes: two-space indentation, `" : "`
//! between keys and values, keys in lexicographic order and a trailing
//! newline.
//!
//! # Example
//!
//! ```
//! use sigil_renderer::catalog::{assets_for, ExportMode};
//! use sigil_renderer::manifest;
//!
//! let assets = assets_for(ExportMode::SingleIcon, &[]);
//! let json = manifest::generate(ExportMode::SingleIcon, &assets).unwrap();
//! assert!(json.contains(r#""filename" : "AppIcon-1024.png""#));
//!
//! let parsed = manifest::parse(&json).unwrap();
//! assert_eq!(parsed.descriptors().unwrap(), assets);
//! ```

use std::borrow::Cow;
use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use thiserror::Error;

use crate::catalog::{derive_filename, AssetDescriptor, ExportMode, Idiom, Platform};
use crate::icon::SizePx;

/// Errors produced while reading a manifest back.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid manifest JSON")]
    Json(#[from] serde_json::Error),

    #[error("invalid size {0:?}, expected \"{{w}}x{{h}}\"")]
    InvalidSize(String),

    #[error("invalid scale {0:?}, expected \"{{n}}x\"")]
    InvalidScale(String),

    #[error("filename {recorded:?} does not match slot, expected {derived:?}")]
    FilenameMismatch { recorded: String, derived: String },
}

// ============================================================================
// Schema
// ============================================================================

/// A parsed or to-be-written `Contents.json`.
///
/// Fields are declared in key order so serialization is already sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub images: Vec<ManifestImage>,
    pub info: ManifestInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestImage {
    pub filename: String,
    pub idiom: Idiom,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestInfo {
    pub author: String,
    pub version: u32,
}

impl Default for ManifestInfo {
    fn default() -> Self {
        Self {
            author: "xcode".to_string(),
            version: 1,
        }
    }
}

impl ManifestImage {
    fn from_descriptor(mode: ExportMode, asset: &AssetDescriptor) -> Self {
        let with_scale = mode == ExportMode::AllSizes && asset.idiom.has_scale();
        Self {
            filename: asset.filename.to_string(),
            idiom: asset.idiom,
            platform: asset.platform,
            scale: with_scale.then(|| asset.scale_string()),
            size: asset.size_string(),
        }
    }

    /// Rebuilds the asset descriptor this entry was written from.
    pub fn descriptor(&self) -> Result<AssetDescriptor, ManifestError> {
        let logical = parse_size(&self.size)?;
        let scale = match &self.scale {
            Some(s) => parse_scale(s)?,
            None => 1,
        };

        let derived = derive_filename(self.idiom, logical, scale);
        if derived != self.filename {
            return Err(ManifestError::FilenameMismatch {
                recorded: self.filename.clone(),
                derived,
            });
        }

        let size = logical
            .width
            .checked_mul(scale)
            .zip(logical.height.checked_mul(scale))
            .map(|(w, h)| SizePx::new(w, h))
            .ok_or_else(|| ManifestError::InvalidSize(self.size.clone()))?;

        Ok(AssetDescriptor {
            size,
            scale,
            idiom: self.idiom,
            platform: self.platform,
            filename: Cow::Owned(derived),
        })
    }
}

impl Manifest {
    pub fn new(mode: ExportMode, assets: &[AssetDescriptor]) -> Self {
        Self {
            images: assets
                .iter()
                .map(|asset| ManifestImage::from_descriptor(mode, asset))
                .collect(),
            info: ManifestInfo::default(),
        }
    }

    /// Serializes in Xcode's formatting, with a trailing newline.
    pub fn to_xcode_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::with_capacity(256 + self.images.len() * 160);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, XcodeFormatter::new());
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        // serde_json only emits UTF-8.
        String::from_utf8(buf).map_err(|e| serde::ser::Error::custom(e.to_string()))
    }

    /// Converts every entry back into an [`AssetDescriptor`].
    pub fn descriptors(&self) -> Result<Vec<AssetDescriptor>, ManifestError> {
        self.images.iter().map(ManifestImage::descriptor).collect()
    }
}

/// Generates the manifest text for `assets` in `mode`.
///
/// In single-icon mode entries carry no `scale` key; in all-sizes mode every
/// entry except marketing slots does.
pub fn generate(mode: ExportMode, assets: &[AssetDescriptor]) -> Result<String, serde_json::Error> {
    Manifest::new(mode, assets).to_xcode_json()
}

/// Parses manifest text.
pub fn parse(text: &str) -> Result<Manifest, ManifestError> {
    Ok(serde_json::from_str(text)?)
}

fn parse_size(text: &str) -> Result<SizePx, ManifestError> {
    let invalid = || ManifestError::InvalidSize(text.to_string());
    let (w, h) = text.split_once('x').ok_or_else(invalid)?;
    let width = w.parse().map_err(|_| invalid())?;
    let height = h.parse().map_err(|_| invalid())?;
    Ok(SizePx::new(width, height))
}

fn parse_scale(text: &str) -> Result<u32, ManifestError> {
    text.strip_suffix('x')
        .and_then(|n| n.parse().ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| ManifestError::InvalidScale(text.to_string()))
}

// ============================================================================
// Formatter
// ============================================================================

/// Pretty printer that separates keys from values with `" : "`.
struct XcodeFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl XcodeFormatter<'_> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for XcodeFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b" : ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{assets_for, sizes_for, SINGLE_ICON};

    const SINGLE_ICON_JSON: &str = r#"{
  "images" : [
    {
      "filename" : "AppIcon-1024.png",
      "idiom" : "universal",
      "platform" : "ios",
      "size" : "1024x1024"
    }
  ],
  "info" : {
    "author" : "xcode",
    "version" : 1
  }
}
"#;

    #[test]
    fn single_icon_manifest_is_exact() {
        let json = generate(ExportMode::SingleIcon, &[SINGLE_ICON.clone()]).unwrap();
        assert_eq!(json, SINGLE_ICON_JSON);
    }

    #[test]
    fn ios_manifest_entries() {
        let assets = sizes_for(Platform::Ios);
        let manifest = Manifest::new(ExportMode::AllSizes, assets);
        assert_eq!(manifest.images.len(), 9);

        let marketing = &manifest.images[0];
        assert_eq!(marketing.idiom, Idiom::IosMarketing);
        assert_eq!(marketing.scale, None);
        assert_eq!(marketing.size, "1024x1024");

        let phone = &manifest.images[1];
        assert_eq!(phone.filename, "icon-60@3x.png");
        assert_eq!(phone.scale.as_deref(), Some("3x"));
        assert_eq!(phone.size, "60x60");

        let json = manifest.to_xcode_json().unwrap();
        assert!(json.contains(r#""scale" : "2x","#));
        assert!(json.contains(r#""idiom" : "ios-marketing","#));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn marketing_entry_has_no_scale_key() {
        let json = generate(ExportMode::AllSizes, &sizes_for(Platform::Ios)[..1]).unwrap();
        assert!(!json.contains("scale"));
    }

    #[test]
    fn keys_are_sorted() {
        let json = generate(ExportMode::AllSizes, sizes_for(Platform::MacOs)).unwrap();
        let keys = ["\"filename\"", "\"idiom\"", "\"platform\"", "\"scale\"", "\"size\""];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert!(json.find("\"images\"").unwrap() < json.find("\"info\"").unwrap());
    }

    #[test]
    fn parse_restores_descriptors() {
        let assets = assets_for(ExportMode::AllSizes, &[Platform::Ios, Platform::MacOs]);
        let json = generate(ExportMode::AllSizes, &assets).unwrap();
        let restored = parse(&json).unwrap().descriptors().unwrap();
        assert_eq!(restored, assets);
    }

    #[test]
    fn parse_single_icon_without_scale() {
        let restored = parse(SINGLE_ICON_JSON).unwrap().descriptors().unwrap();
        assert_eq!(restored, vec![SINGLE_ICON.clone()]);
    }

    #[test]
    fn parse_rejects_mismatched_filename() {
        let text = SINGLE_ICON_JSON.replace("AppIcon-1024.png", "AppIcon.png");
        let err = parse(&text).unwrap().descriptors().unwrap_err();
        assert!(matches!(err, ManifestError::FilenameMismatch { .. }));
    }

    #[test]
    fn parse_rejects_bad_size_and_scale() {
        let image = ManifestImage {
            filename: "icon-20@2x.png".into(),
            idiom: Idiom::Iphone,
            platform: Some(Platform::Ios),
            scale: Some("two".into()),
            size: "20x20".into(),
        };
        assert!(matches!(image.descriptor(), Err(ManifestError::InvalidScale(_))));

        let image = ManifestImage {
            size: "twenty".into(),
            scale: Some("2x".into()),
            ..image
        };
        assert!(matches!(image.descriptor(), Err(ManifestError::InvalidSize(_))));
    }

    #[test]
    fn parse_rejects_size_overflowing_pixels() {
        let image = ManifestImage {
            filename: "icon-2147483648@2x.png".into(),
            idiom: Idiom::Iphone,
            platform: Some(Platform::Ios),
            scale: Some("2x".into()),
            size: "2147483648x1".into(),
        };
        let err = image.descriptor().unwrap_err();
        assert!(matches!(err, ManifestError::InvalidSize(ref s) if s == "2147483648x1"));
    }

    #[test]
    fn parse_rejects_invalid_json() {
        assert!(matches!(parse("{"), Err(ManifestError::Json(_))));
    }
}
