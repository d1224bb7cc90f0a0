#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage};

pub const BACKDROP: Rgb<u8> = Rgb([225, 225, 225]);
pub const FRAME: Rgb<u8> = Rgb([25, 25, 25]);
pub const SPECIMEN: Rgb<u8> = Rgb([235, 120, 25]);

/// Classifier for the dark frames drawn by these fixtures.
pub fn is_frame(pixel: &Rgb<u8>) -> bool {
    pixel.0[0] < 128
}

/// Creates a blank backdrop of the given size.
pub fn blank(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, BACKDROP)
}

/// Fills the inclusive rectangle `(x0, y0)..=(x1, y1)`.
pub fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Creates a specimen sheet with one dark frame per entry, side by side, each
/// 140x160 with an orange specimen inside when `with_specimen` says so.
pub fn specimen_sheet(with_specimen: &[bool]) -> DynamicImage {
    let width = 40 + 180 * with_specimen.len() as u32;
    let mut img = blank(width, 240);
    for (i, &specimen) in with_specimen.iter().enumerate() {
        let x0 = 40 + 180 * i as u32;
        fill_rect(&mut img, x0, 30, x0 + 139, 189, FRAME);
        if specimen {
            fill_rect(&mut img, x0 + 30, 50, x0 + 89, 149, SPECIMEN);
        }
    }
    DynamicImage::ImageRgb8(img)
}
