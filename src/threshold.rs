use image::{GrayImage, Luma, RgbImage};
use imageproc::filter::separable_filter_equal;

use crate::error::{Error, Result};

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Luminance of the color image.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    image::imageops::grayscale(image)
}

/// Sigma used for a Gaussian window of `block_size` taps when none is given.
pub fn window_sigma(block_size: u32) -> f32 {
    0.3 * ((block_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalised 1D Gaussian kernel with `block_size` taps.
pub fn gaussian_kernel(block_size: u32) -> Vec<f32> {
    let sigma = window_sigma(block_size);
    let center = (block_size as f32 - 1.0) * 0.5;
    let scale = -0.5 / (sigma * sigma);

    let mut kernel: Vec<f32> = (0..block_size)
        .map(|i| {
            let x = i as f32 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    kernel
}

/// Inverted local threshold: a pixel becomes foreground when it is at least
/// `c` darker than the Gaussian-weighted mean of its `block_size` window.
///
/// Borders are replicated, so a uniform image never produces foreground.
pub fn adaptive_binarize(gray: &GrayImage, block_size: u32, c: f32) -> Result<GrayImage> {
    if block_size < 3 || block_size % 2 == 0 {
        return Err(Error::InvalidParameter(format!(
            "block size must be odd and at least 3, got {}",
            block_size
        )));
    }

    let kernel = gaussian_kernel(block_size);
    let local_mean = separable_filter_equal(gray, &kernel);

    let mut mask = GrayImage::new(gray.width(), gray.height());
    for (x, y, pixel) in gray.enumerate_pixels() {
        let mean = local_mean.get_pixel(x, y).0[0] as f32;
        let value = if pixel.0[0] as f32 <= mean - c {
            FOREGROUND
        } else {
            BACKGROUND
        };
        mask.put_pixel(x, y, Luma([value]));
    }

    log::debug!(
        "Adaptive threshold (block {}, c {}): {} foreground pixels",
        block_size,
        c,
        mask.pixels().filter(|p| p.0[0] == FOREGROUND).count()
    );

    Ok(mask)
}
