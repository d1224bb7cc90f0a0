use image::GenericImageView;

use crate::detection::classifier::Classifier;
use crate::models::Region;

/// Rows (or columns) probed past a break in the edge before giving up.
pub const DEFAULT_GAP_WIDTH: u32 = 20;
/// Pixels scanned inward from the traced right edge during verification.
pub const DEFAULT_VERIFY_WINDOW: u32 = 50;
/// Fraction of rows that must show the right edge for a candidate to pass.
pub const DEFAULT_VERIFY_RATIO: f64 = 0.8;

/// Outcome of testing one lattice point along a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Found,
    /// The edge moved one pixel towards larger drift coordinates.
    ExpandPositive,
    /// The edge moved one pixel towards smaller drift coordinates.
    ExpandNegative,
    NotFound,
}

/// Direction a trace walks in. The perpendicular coordinate drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// Walk down the left edge (growing y, drifting x).
    Vertical,
    /// Walk along the top edge (growing x, drifting y).
    Horizontal,
}

impl Axis {
    fn point(self, drift: u32, along: u32) -> (u32, u32) {
        match self {
            Axis::Vertical => (drift, along),
            Axis::Horizontal => (along, drift),
        }
    }

    /// `(along_len, drift_len)` for a raster of the given size.
    fn lengths(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Axis::Vertical => (height, width),
            Axis::Horizontal => (width, height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Trace {
    /// First along-coordinate past the traced edge.
    end: u32,
    /// Number of steps the edge moved towards smaller drift coordinates.
    widened: u32,
}

/// Grows seed pixels into verified rectangular regions by following their
/// left and top edges.
///
/// The tracer holds no scan state; every call to [`find_regions`] starts from
/// an empty result list.
///
/// [`find_regions`]: BoundaryTracer::find_regions
pub struct BoundaryTracer<'a, I, C> {
    image: &'a I,
    classifier: C,
    min_size: u32,
    gap_width: u32,
    verify_window: u32,
    verify_ratio: f64,
}

impl<'a, I, C> BoundaryTracer<'a, I, C>
where
    I: GenericImageView,
    C: Classifier<I::Pixel>,
{
    /// `min_size` applies to both width and height; traces must exceed it.
    pub fn new(image: &'a I, classifier: C, min_size: u32) -> Self {
        Self {
            image,
            classifier,
            min_size,
            gap_width: DEFAULT_GAP_WIDTH,
            verify_window: DEFAULT_VERIFY_WINDOW,
            verify_ratio: DEFAULT_VERIFY_RATIO,
        }
    }

    pub fn with_gap_width(mut self, gap_width: u32) -> Self {
        self.gap_width = gap_width;
        self
    }

    pub fn with_verify_window(mut self, verify_window: u32) -> Self {
        self.verify_window = verify_window;
        self
    }

    pub fn with_verify_ratio(mut self, verify_ratio: f64) -> Self {
        self.verify_ratio = verify_ratio;
        self
    }

    /// Scan the whole raster column by column and return every verified
    /// region, in discovery order. Regions never overlap: seeds inside an
    /// accepted region are skipped.
    ///
    /// With `stop_at_first` the scan returns as soon as one region passes.
    pub fn find_regions(&self, stop_at_first: bool) -> Vec<Region<'a, I>> {
        let (width, height) = self.image.dimensions();
        let mut found = Vec::new();

        for x in 1..width.saturating_sub(self.min_size) {
            for y in 1..height.saturating_sub(self.min_size) {
                if !self.is_seed(&found, x, y) {
                    continue;
                }
                if let Some(region) = self.trace_candidate(&found, x, y) {
                    found.push(region);
                    if stop_at_first {
                        return found;
                    }
                }
            }
        }

        found
    }

    fn trace_candidate(&self, found: &[Region<'a, I>], x: u32, y: u32) -> Option<Region<'a, I>> {
        let (width, height) = self.image.dimensions();

        let vertical = self.trace(found, Axis::Vertical, x, y);
        if vertical.end - y <= self.min_size {
            return None;
        }

        let horizontal = self.trace(found, Axis::Horizontal, y, x);
        if horizontal.end - x <= self.min_size {
            return None;
        }

        let x0 = x.saturating_sub(vertical.widened);
        let y0 = y.saturating_sub(horizontal.widened);
        let x1 = horizontal.end.min(width);
        let y1 = vertical.end.min(height);

        if !self.verify_sides(found, y0, x1, y1) {
            log::debug!("Rejecting candidate ({}, {})-({}, {}): right edge not confirmed", x0, y0, x1, y1);
            return None;
        }

        log::debug!("Accepted region ({}, {})-({}, {}) from seed ({}, {})", x0, y0, x1, y1, x, y);
        Some(Region::new(x0, y0, x1, y1, self.image))
    }

    /// Follow an edge from `(drift, along)` until it ends or the raster does.
    fn trace(&self, found: &[Region<'a, I>], axis: Axis, drift: u32, along: u32) -> Trace {
        let (width, height) = self.image.dimensions();
        let (along_len, _) = axis.lengths(width, height);
        let last = along_len.saturating_sub(1);

        let mut drift = drift;
        let mut along = along;
        let mut widened = 0;

        while along < last {
            match self.probe(found, axis, drift, along) {
                Probe::Found => {}
                Probe::ExpandPositive => drift += 1,
                Probe::ExpandNegative => {
                    // Keep the pixels already seen to the right: widen the box
                    // rather than shifting it.
                    drift -= 1;
                    widened += 1;
                }
                Probe::NotFound => {
                    if !self.bridge_gap(found, axis, drift, along, last) {
                        break;
                    }
                }
            }
            along += 1;
        }

        Trace { end: along, widened }
    }

    /// Look up to `gap_width` steps ahead at the current drift for the edge
    /// to resume. The drift is left untouched while probing.
    fn bridge_gap(&self, found: &[Region<'a, I>], axis: Axis, drift: u32, along: u32, last: u32) -> bool {
        let bridged = (0..self.gap_width)
            .map(|i| along + i)
            .take_while(|&t| t < last)
            .any(|t| self.probe(found, axis, drift, t) != Probe::NotFound);
        if bridged {
            log::trace!("Bridged gap at {:?} drift={} along={}", axis, drift, along);
        }
        bridged
    }

    /// Count rows whose right edge shows up within `verify_window` pixels of
    /// `x1`. Guards against a right edge that only came from gap-jumping.
    fn verify_sides(&self, found: &[Region<'a, I>], y0: u32, x1: u32, y1: u32) -> bool {
        let lower = x1.saturating_sub(self.verify_window) + 1;
        let matched = (y0..y1)
            .filter(|&y| {
                (lower..x1)
                    .rev()
                    .any(|x| self.probe(found, Axis::Vertical, x, y) != Probe::NotFound)
            })
            .count();
        let rows = y1.saturating_sub(y0);

        matched as f64 >= rows as f64 * self.verify_ratio
    }

    fn probe(&self, found: &[Region<'a, I>], axis: Axis, drift: u32, along: u32) -> Probe {
        let (x, y) = axis.point(drift, along);
        if is_covered(found, x, y) {
            return Probe::NotFound;
        }
        if self.matches(x, y) {
            return Probe::Found;
        }

        let (width, height) = self.image.dimensions();
        let (_, drift_len) = axis.lengths(width, height);
        let neighbour_is_seed = |d: u32| {
            let (nx, ny) = axis.point(d, along);
            self.is_seed(found, nx, ny)
        };

        if drift + 1 < drift_len && neighbour_is_seed(drift + 1) {
            Probe::ExpandPositive
        } else if drift > 0 && neighbour_is_seed(drift - 1) {
            Probe::ExpandNegative
        } else {
            Probe::NotFound
        }
    }

    fn is_seed(&self, found: &[Region<'a, I>], x: u32, y: u32) -> bool {
        !is_covered(found, x, y) && self.matches(x, y)
    }

    fn matches(&self, x: u32, y: u32) -> bool {
        self.image.in_bounds(x, y) && self.classifier.matches(&self.image.get_pixel(x, y))
    }
}

fn is_covered<I: GenericImageView>(found: &[Region<'_, I>], x: u32, y: u32) -> bool {
    found.iter().any(|region| region.contains(x, y))
}

/// Convenience wrapper around [`BoundaryTracer`] with default tuning.
pub fn find_regions<'a, I, C>(image: &'a I, classifier: C, min_size: u32, stop_at_first: bool) -> Vec<Region<'a, I>>
where
    I: GenericImageView,
    C: Classifier<I::Pixel>,
{
    BoundaryTracer::new(image, classifier, min_size).find_regions(stop_at_first)
}
