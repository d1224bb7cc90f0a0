use std::fmt;

use image::{GenericImageView, SubImage};

use crate::pipeline::BoundingBox;

/// Axis-aligned rectangle found inside a raster.
///
/// Bounds are half-open for cropping (`x0 <= x < x1`, `y0 <= y < y1`) but
/// `contains` treats them as inclusive, so a pixel on the far edge of an
/// accepted region is never re-used as a seed.
pub struct Region<'a, I> {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    source: &'a I,
}

impl<'a, I: GenericImageView> Region<'a, I> {
    /// Build a region over `source`, silently clamping both corners into the
    /// raster. Trace arithmetic can overshoot by a pixel, so this never fails.
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32, source: &'a I) -> Self {
        let (width, height) = source.dimensions();
        let x1 = x1.min(width);
        let y1 = y1.min(height);
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1,
            y1,
            source,
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Read-only view over the backing raster, restricted to this region.
    /// Scan it again with `&*region.crop()`.
    pub fn crop(&self) -> SubImage<&'a I> {
        image::imageops::crop_imm(self.source, self.x0, self.y0, self.width(), self.height())
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    /// `(x0, y0, x1, y1)`
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (self.x0, self.y0, self.x1, self.y1)
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox {
            x: self.x0,
            y: self.y0,
            width: self.width(),
            height: self.height(),
        }
    }
}

impl<I> Clone for Region<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for Region<'_, I> {}

impl<I> fmt::Debug for Region<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("x0", &self.x0)
            .field("y0", &self.y0)
            .field("x1", &self.x1)
            .field("y1", &self.y1)
            .finish()
    }
}
