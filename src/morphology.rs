use image::{GrayImage, Luma};
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode};

use crate::error::{Error, Result};

/// Square structuring element of `size × size` pixels anchored at `size / 2`,
/// together with its point reflection.
pub struct SquareElement {
    size: u8,
    forward: Mask,
    reflected: Mask,
}

impl SquareElement {
    pub fn new(size: u32) -> Result<Self> {
        let size = u8::try_from(size)
            .ok()
            .filter(|&s| s > 0)
            .ok_or_else(|| Error::InvalidParameter(format!("kernel size must be in 1..=255, got {}", size)))?;

        let footprint = GrayImage::from_pixel(size as u32, size as u32, Luma([255]));
        let anchor = size / 2;
        Ok(Self {
            size,
            forward: Mask::from_image(&footprint, anchor, anchor),
            reflected: Mask::from_image(&footprint, size - 1 - anchor, size - 1 - anchor),
        })
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }
}

/// Morphological closing: `iterations` dilations, then `iterations` erosions.
///
/// The erosion pass uses the reflected element so that a shape already closed
/// under the square (an axis-aligned rectangle) comes back with the same bounds
/// even when the side length is even.
///
/// Pixels outside the image are ignored by the erosion, so a region whose
/// dilation reaches the border stays attached to it: a receipt within
/// `iterations * size / 2` pixels of an edge comes back stretched to that edge.
pub fn close(mask: &GrayImage, element: &SquareElement, iterations: u32) -> GrayImage {
    let mut closed = mask.clone();
    if iterations == 0 {
        return closed;
    }

    for _ in 0..iterations {
        closed = grayscale_dilate(&closed, &element.forward);
    }
    for _ in 0..iterations {
        closed = grayscale_erode(&closed, &element.reflected);
    }

    log::debug!(
        "Closed mask with {}x{} square, {} iteration(s)",
        element.size,
        element.size,
        iterations
    );
    closed
}
