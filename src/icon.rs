//! Pixel-level value types shared by the renderer, exporter and previews.

use image::RgbaImage;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a square size.
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Total number of pixels, or `None` on overflow.
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }
}

/// A rendered icon image together with the display scale it was rendered for.
///
/// The pixel buffer is always exactly the requested size. `scale` only
/// records which catalog slot the pixels belong to (@1x, @2x, @3x); it never
/// multiplies the buffer dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct IconImage {
    /// Straight-alpha RGBA8 pixels.
    pub data: RgbaImage,

    /// The display scale factor of the slot this image fills.
    pub scale: u32,
}

impl IconImage {
    pub fn new(data: RgbaImage, scale: u32) -> Self {
        Self {
            data,
            scale: scale.max(1),
        }
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns the logical size of the icon (dimensions / scale).
    ///
    /// For a 180x180 @3x icon, the logical size is 60x60.
    pub fn logical_size(&self) -> SizePx {
        SizePx::new(self.data.width() / self.scale, self.data.height() / self.scale)
    }
}

/// A collection of rendered images of one icon at several sizes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IconSet {
    pub images: Vec<IconImage>,
}

impl IconSet {
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    pub fn from_images(images: Vec<IconImage>) -> Self {
        Self { images }
    }

    pub fn add_image(&mut self, image: IconImage) {
        self.images.push(image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Finds the image whose logical width is closest to `target_size`.
    pub fn find_by_logical_size(&self, target_size: u32) -> Option<&IconImage> {
        self.images
            .iter()
            .min_by_key(|img| img.logical_size().width.abs_diff(target_size))
    }

    /// Finds the image with exactly the given pixel width.
    pub fn find_by_pixel_size(&self, pixels: u32) -> Option<&IconImage> {
        self.images.iter().find(|img| img.data.width() == pixels)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IconImage> {
        self.images.iter()
    }
}

impl IntoIterator for IconSet {
    type Item = IconImage;
    type IntoIter = std::vec::IntoIter<IconImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.into_iter()
    }
}

impl<'a> IntoIterator for &'a IconSet {
    type Item = &'a IconImage;
    type IntoIter = std::slice::Iter<'a, IconImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_px_is_square() {
        assert!(SizePx::square(100).is_square());
        assert!(!SizePx::new(100, 200).is_square());
        assert_eq!(SizePx::new(3, 4).pixel_count(), Some(12));
    }

    #[test]
    fn icon_image_logical_size() {
        let img = IconImage::new(RgbaImage::new(180, 180), 3);
        assert_eq!(img.logical_size(), SizePx::square(60));
        assert_eq!(img.dimensions(), SizePx::square(180));
    }

    #[test]
    fn zero_scale_is_treated_as_one() {
        let img = IconImage::new(RgbaImage::new(16, 16), 0);
        assert_eq!(img.scale, 1);
    }

    #[test]
    fn icon_set_operations() {
        let mut set = IconSet::new();
        assert!(set.is_empty());

        set.add_image(IconImage::new(RgbaImage::new(16, 16), 1));
        set.add_image(IconImage::new(RgbaImage::new(64, 64), 2));

        assert_eq!(set.len(), 2);

        // |16-20| < |32-20|
        let found = set.find_by_logical_size(20).unwrap();
        assert_eq!(found.dimensions().width, 16);

        assert_eq!(set.find_by_pixel_size(64).unwrap().scale, 2);
        assert!(set.find_by_pixel_size(32).is_none());
    }
}
