use image::RgbImage;
use rqrr::PreparedImage;

/// Reads the machine-readable label printed on a frame.
///
/// Decoding is decode-or-nothing: an unreadable code yields `None`, never an
/// error.
pub trait CodeReader: Send + Sync {
    fn decode(&self, image: &RgbImage) -> Option<String>;
}

/// QR code reader backed by `rqrr`. Returns the first grid that decodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrCodeReader;

impl CodeReader for QrCodeReader {
    fn decode(&self, image: &RgbImage) -> Option<String> {
        let gray = image::imageops::grayscale(image);
        let (width, height) = gray.dimensions();

        let mut prepared = PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            gray.get_pixel(x as u32, y as u32)[0]
        });

        prepared
            .detect_grids()
            .iter()
            .find_map(|grid| match grid.decode() {
                Ok((_, content)) => Some(content),
                Err(e) => {
                    log::debug!("QR grid found but failed to decode: {:?}", e);
                    None
                }
            })
    }
}

/// Gives every frame the same label, bypassing decoding.
#[derive(Debug, Clone)]
pub struct StaticCodeReader(pub Option<String>);

impl CodeReader for StaticCodeReader {
    fn decode(&self, _image: &RgbImage) -> Option<String> {
        self.0.clone()
    }
}
