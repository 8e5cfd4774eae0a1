use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::crop::BoundingBox;

const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const OUTLINE_THICKNESS: u32 = 3;

/// Copy of `image` with every box outlined, for eyeballing what was kept.
pub fn draw_detections(image: &RgbImage, boxes: &[BoundingBox]) -> RgbImage {
    let mut canvas = image.clone();

    for bbox in boxes {
        // Thicken by drawing nested outlines inwards.
        for inset in 0..OUTLINE_THICKNESS {
            if bbox.width <= 2 * inset || bbox.height <= 2 * inset {
                break;
            }
            let rect = Rect::at((bbox.x + inset) as i32, (bbox.y + inset) as i32)
                .of_size(bbox.width - 2 * inset, bbox.height - 2 * inset);
            draw_hollow_rect_mut(&mut canvas, rect, OUTLINE_COLOR);
        }
    }

    canvas
}
