use image::{Rgb, RgbImage};

/// Decides whether a single pixel belongs to a region of interest.
///
/// Implementations must be pure: the tracer probes the same pixel many times
/// and assumes the answer never changes.
pub trait Classifier<P> {
    fn matches(&self, pixel: &P) -> bool;
}

impl<P, F> Classifier<P> for F
where
    F: Fn(&P) -> bool,
{
    fn matches(&self, pixel: &P) -> bool {
        self(pixel)
    }
}

/// Red-channel cutoff separating dark frames from a light backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessCutoff {
    pub threshold: u8,
    /// Match bright pixels instead of dark ones (light frames on dark backdrop).
    pub inverted: bool,
}

impl BrightnessCutoff {
    pub fn new(threshold: u8, inverted: bool) -> Self {
        Self { threshold, inverted }
    }

    /// Derive the cutoff from image statistics.
    ///
    /// Only near-neutral pixels (`red - blue < 15`) are sampled. The threshold
    /// sits halfway between the mean red of the dark group (`red < 60`) and the
    /// light group (`red > 110`).
    pub fn from_image(img: &RgbImage, inverted: bool) -> Self {
        let mut dark_sum: u64 = 0;
        let mut dark_count: u64 = 0;
        let mut light_sum: u64 = 0;
        let mut light_count: u64 = 0;

        for pixel in img.pixels() {
            let [red, _, blue] = pixel.0;
            if (red as i16) - (blue as i16) >= 15 {
                continue;
            }
            if red < 60 {
                dark_sum += red as u64;
                dark_count += 1;
            } else if red > 110 {
                light_sum += red as u64;
                light_count += 1;
            }
        }

        let dark_avg = dark_sum / dark_count.max(1);
        let light_avg = light_sum / light_count.max(1);
        let threshold = ((dark_avg + light_avg) / 2) as u8;

        log::debug!(
            "Brightness cutoff: dark={} ({} px), light={} ({} px) -> threshold {}",
            dark_avg,
            dark_count,
            light_avg,
            light_count,
            threshold
        );

        Self::new(threshold, inverted)
    }
}

impl Classifier<Rgb<u8>> for BrightnessCutoff {
    fn matches(&self, pixel: &Rgb<u8>) -> bool {
        let red = pixel.0[0];
        if self.inverted {
            red > self.threshold
        } else {
            red < self.threshold
        }
    }
}

/// Orange/red hue test used to spot the specimen inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmColor {
    pub min_red: u8,
    pub max_blue: u8,
    pub min_red_blue_gap: i16,
}

impl Default for WarmColor {
    fn default() -> Self {
        Self {
            min_red: 50,
            max_blue: 50,
            min_red_blue_gap: 30,
        }
    }
}

impl Classifier<Rgb<u8>> for WarmColor {
    fn matches(&self, pixel: &Rgb<u8>) -> bool {
        let [red, _, blue] = pixel.0;
        (red > self.min_red && blue < self.max_blue)
            || (red as i16) - (blue as i16) > self.min_red_blue_gap
    }
}
