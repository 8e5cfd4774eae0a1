use std::path::Path;

use image::{Rgb, RgbImage};

pub const TABLE: Rgb<u8> = Rgb([225, 222, 218]);
pub const RECEIPT: Rgb<u8> = Rgb([45, 40, 38]);

pub const DARK_TABLE: Rgb<u8> = Rgb([60, 55, 50]);
pub const WHITE_PAPER: Rgb<u8> = Rgb([240, 238, 232]);

/// Uniform "table" with solid rectangles `(x, y, width, height)` painted on it.
pub fn receipts_on_table(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> RgbImage {
    paint(width, height, rects, TABLE, RECEIPT)
}

/// Same layout with light paper on a darker surface.
pub fn paper_on_dark_table(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> RgbImage {
    paint(width, height, rects, DARK_TABLE, WHITE_PAPER)
}

fn paint(
    width: u32,
    height: u32,
    rects: &[(u32, u32, u32, u32)],
    table: Rgb<u8>,
    receipt: Rgb<u8>,
) -> RgbImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");

    let mut image = RgbImage::from_pixel(width, height, table);
    for &(x, y, w, h) in rects {
        assert!(x + w <= width && y + h <= height, "rectangle outside image");
        for yy in y..y + h {
            for xx in x..x + w {
                image.put_pixel(xx, yy, receipt);
            }
        }
    }
    image
}

/// Saves losslessly so the pipeline sees exactly the painted pixels.
pub fn save_png(image: &RgbImage, path: &Path) {
    image.save(path).expect("failed to write synthetic input");
}
