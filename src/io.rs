use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage};

use crate::error::{Error, Result};

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Decode the image at `path` into 8-bit RGB.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    if !path.is_file() {
        return Err(Error::InputNotFound {
            path: path.to_path_buf(),
            reason: "no such file".to_string(),
        });
    }

    let image = image::open(path).map_err(|e| Error::InputNotFound {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    log::debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image.to_rgb8())
}

fn get_extended_color_type(image: &DynamicImage) -> Option<ExtendedColorType> {
    match image {
        DynamicImage::ImageLuma8(_) => Some(ExtendedColorType::L8),
        DynamicImage::ImageRgb8(_) => Some(ExtendedColorType::Rgb8),
        _ => None,
    }
}

/// JPEG-encode `image` into `path`, replacing any existing file.
pub fn write_image(path: &Path, image: &DynamicImage, quality: u8) -> Result<()> {
    let color_type = get_extended_color_type(image).ok_or_else(|| {
        Error::InvalidParameter(format!("cannot write {:?} pixels as JPEG", image.color()))
    })?;

    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
    encoder
        .write_image(image.as_bytes(), image.width(), image.height(), color_type)
        .map_err(|source| match source {
            image::ImageError::IoError(e) => Error::io(path, e),
            source => Error::Encode {
                path: path.to_path_buf(),
                source,
            },
        })
}

/// Create `path` and its parents if missing.
pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}
