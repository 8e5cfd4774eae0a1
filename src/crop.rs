use image::RgbImage;
use image::imageops;

/// Axis-aligned rectangle in image coordinates, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    #[inline]
    #[must_use]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[must_use]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

/// Size window a region must fall in to count as a receipt.
///
/// Width is bounded on both sides, height only from below. A region spanning
/// nearly the full image height is still accepted; whether that asymmetry is
/// intended (tall narrow receipts) or an oversight is unresolved, so it is
/// kept as is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeFilter {
    /// Lower bound for both width and height, as a fraction of the image size.
    pub min_fraction: f64,
    /// Upper bound for the width, as a fraction of the image width.
    pub max_width_fraction: f64,
}

impl Default for SizeFilter {
    fn default() -> Self {
        Self {
            min_fraction: 0.1,
            max_width_fraction: 0.9,
        }
    }
}

impl SizeFilter {
    /// All comparisons are strict.
    pub fn accepts(&self, bbox: &BoundingBox, image_width: u32, image_height: u32) -> bool {
        let (w, h) = (bbox.width as f64, bbox.height as f64);
        let (img_w, img_h) = (image_width as f64, image_height as f64);

        w > img_w * self.min_fraction
            && h > img_h * self.min_fraction
            && w < img_w * self.max_width_fraction
    }
}

/// Exact `[y..y+h, x..x+w]` slice of `image` when `bbox` passes `filter`.
pub fn filter_and_crop(
    image: &RgbImage,
    bbox: &BoundingBox,
    filter: &SizeFilter,
) -> Option<RgbImage> {
    let (width, height) = image.dimensions();
    if !bbox.fits_within(width, height) || !filter.accepts(bbox, width, height) {
        return None;
    }
    Some(imageops::crop_imm(image, bbox.x, bbox.y, bbox.width, bbox.height).to_image())
}
