use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::pipeline::BoundingBox;

/// Draw each box as a hollow rectangle `thickness` pixels wide onto a copy of `img`
pub fn draw_regions(img: &DynamicImage, boxes: &[BoundingBox], color: Rgb<u8>, thickness: u32) -> RgbImage {
    let mut canvas = img.to_rgb8();

    for bbox in boxes {
        // Nested outlines grow inward so the stroke never leaves the box
        for inset in 0..thickness {
            let width = bbox.width.saturating_sub(2 * inset);
            let height = bbox.height.saturating_sub(2 * inset);
            if width == 0 || height == 0 {
                break;
            }
            let rect = Rect::at((bbox.x + inset) as i32, (bbox.y + inset) as i32).of_size(width, height);
            draw_hollow_rect_mut(&mut canvas, rect, color);
        }
    }

    canvas
}
