//! Static size tables for app icon asset catalogs.
//!
//! Every entry is declared with its logical point size and scale; the pixel
//! size is always `points × scale`. Tables are emitted in declaration order.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::icon::SizePx;

// ============================================================================
// Platform / Idiom
// ============================================================================

/// Target platform of an icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    #[serde(rename = "macos")]
    MacOs,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::MacOs];

    /// The value written to the `platform` key of the manifest.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::MacOs => "macos",
        }
    }

    /// Returns the size table for this platform.
    pub fn sizes(&self) -> &'static [AssetDescriptor] {
        sizes_for(*self)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset-catalog classification tag of an image slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Idiom {
    Iphone,
    IosMarketing,
    Mac,
    Universal,
}

impl Idiom {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iphone => "iphone",
            Self::IosMarketing => "ios-marketing",
            Self::Mac => "mac",
            Self::Universal => "universal",
        }
    }

    /// Marketing slots carry no `scale` key in the manifest.
    pub fn has_scale(&self) -> bool {
        !matches!(self, Self::IosMarketing)
    }
}

impl fmt::Display for Idiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// AssetDescriptor
// ============================================================================

/// Describes one produced image file: its pixel size, scale, idiom,
/// platform and filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetDescriptor {
    /// Pixel dimensions of the rendered file.
    pub size: SizePx,
    /// Display scale (1, 2 or 3).
    pub scale: u32,
    pub idiom: Idiom,
    pub platform: Option<Platform>,
    pub filename: Cow<'static, str>,
}

impl AssetDescriptor {
    /// Creates a square catalog slot of `points` logical points at `scale`.
    pub const fn slot(
        points: u32,
        scale: u32,
        idiom: Idiom,
        platform: Platform,
        filename: &'static str,
    ) -> Self {
        Self {
            size: SizePx::square(points * scale),
            scale,
            idiom,
            platform: Some(platform),
            filename: Cow::Borrowed(filename),
        }
    }

    /// Logical size in points (pixel size / scale).
    pub fn logical_size(&self) -> SizePx {
        let scale = self.scale.max(1);
        SizePx::new(self.size.width / scale, self.size.height / scale)
    }

    /// Logical size formatted as `"{w}x{h}"`.
    pub fn size_string(&self) -> String {
        let logical = self.logical_size();
        format!("{}x{}", logical.width, logical.height)
    }

    /// Scale formatted as `"{n}x"`.
    pub fn scale_string(&self) -> String {
        format!("{}x", self.scale)
    }
}

/// Reproduces the catalog's naming rule for a slot.
pub fn derive_filename(idiom: Idiom, logical: SizePx, scale: u32) -> String {
    match (idiom, scale) {
        (Idiom::Universal, _) => format!("AppIcon-{}.png", logical.width),
        (_, 1) => format!("icon-{}.png", logical.width),
        (_, n) => format!("icon-{}@{}x.png", logical.width, n),
    }
}

// ============================================================================
// Tables
// ============================================================================

use Idiom::{IosMarketing, Iphone, Mac};
use Platform::{Ios, MacOs};

pub static IOS_SIZES: [AssetDescriptor; 9] = [
    // App Store
    AssetDescriptor::slot(1024, 1, IosMarketing, Ios, "icon-1024.png"),
    // Home screen
    AssetDescriptor::slot(60, 3, Iphone, Ios, "icon-60@3x.png"),
    AssetDescriptor::slot(60, 2, Iphone, Ios, "icon-60@2x.png"),
    // Spotlight
    AssetDescriptor::slot(40, 3, Iphone, Ios, "icon-40@3x.png"),
    AssetDescriptor::slot(40, 2, Iphone, Ios, "icon-40@2x.png"),
    // Settings
    AssetDescriptor::slot(29, 3, Iphone, Ios, "icon-29@3x.png"),
    AssetDescriptor::slot(29, 2, Iphone, Ios, "icon-29@2x.png"),
    // Notifications
    AssetDescriptor::slot(20, 3, Iphone, Ios, "icon-20@3x.png"),
    AssetDescriptor::slot(20, 2, Iphone, Ios, "icon-20@2x.png"),
];

pub static MACOS_SIZES: [AssetDescriptor; 12] = [
    AssetDescriptor::slot(1024, 1, Mac, MacOs, "icon-1024.png"),
    AssetDescriptor::slot(512, 2, Mac, MacOs, "icon-512@2x.png"),
    AssetDescriptor::slot(512, 1, Mac, MacOs, "icon-512.png"),
    AssetDescriptor::slot(256, 2, Mac, MacOs, "icon-256@2x.png"),
    AssetDescriptor::slot(256, 1, Mac, MacOs, "icon-256.png"),
    AssetDescriptor::slot(128, 2, Mac, MacOs, "icon-128@2x.png"),
    AssetDescriptor::slot(128, 1, Mac, MacOs, "icon-128.png"),
    AssetDescriptor::slot(64, 1, Mac, MacOs, "icon-64.png"),
    AssetDescriptor::slot(32, 2, Mac, MacOs, "icon-32@2x.png"),
    AssetDescriptor::slot(32, 1, Mac, MacOs, "icon-32.png"),
    AssetDescriptor::slot(16, 2, Mac, MacOs, "icon-16@2x.png"),
    AssetDescriptor::slot(16, 1, Mac, MacOs, "icon-16.png"),
];

/// The lone asset of single-icon mode.
pub static SINGLE_ICON: AssetDescriptor =
    AssetDescriptor::slot(1024, 1, Idiom::Universal, Ios, "AppIcon-1024.png");

/// Returns the size table for `platform`, in declaration order.
pub fn sizes_for(platform: Platform) -> &'static [AssetDescriptor] {
    match platform {
        Platform::Ios => &IOS_SIZES,
        Platform::MacOs => &MACOS_SIZES,
    }
}

// ============================================================================
// Export mode
// ============================================================================

/// Which asset list an icon-set export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    /// One 1024×1024 universal image.
    #[default]
    SingleIcon,
    /// Every slot of every selected platform.
    AllSizes,
}

/// Selects the assets for an export.
///
/// In [`ExportMode::AllSizes`] the platform tables are concatenated in the
/// caller's order; repeated platforms are ignored.
pub fn assets_for(mode: ExportMode, platforms: &[Platform]) -> Vec<AssetDescriptor> {
    match mode {
        ExportMode::SingleIcon => vec![SINGLE_ICON.clone()],
        ExportMode::AllSizes => {
            let mut seen: Vec<Platform> = Vec::with_capacity(platforms.len());
            let mut assets = Vec::new();
            for platform in platforms {
                if seen.contains(platform) {
                    continue;
                }
                seen.push(*platform);
                assets.extend_from_slice(sizes_for(*platform));
            }
            assets
        }
    }
}
