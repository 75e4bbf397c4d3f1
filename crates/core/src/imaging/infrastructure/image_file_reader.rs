use std::path::Path;

use crate::imaging::domain::image_reader::ImageReader;
use crate::shared::frame::Frame;

/// Decodes photos with the `image` crate.
///
/// The format is sniffed from the file contents rather than trusted from the
/// extension, since uploads are often stored without one.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?
            .to_rgb8();
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err("image has zero dimensions".into());
        }
        Ok(Frame::new(img.into_raw(), width, height, 3))
    }
}
