use std::path::Path;

use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::frame::Frame;

/// Writes frames to disk with the `image` crate.
///
/// Accepts grayscale and RGB frames. The parent directory must already exist.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let data = frame.data().to_vec();
        match frame.channels() {
            1 => image::GrayImage::from_raw(frame.width(), frame.height(), data)
                .ok_or("Failed to create image from frame data")?
                .save(path)?,
            3 => image::RgbImage::from_raw(frame.width(), frame.height(), data)
                .ok_or("Failed to create image from frame data")?
                .save(path)?,
            n => return Err(format!("unsupported channel count: {n}").into()),
        }
        Ok(())
    }
}
