use std::path::Path;

use crate::shared::frame::Frame;

/// Writes a single frame to an image file, replacing any existing file.
pub trait ImageWriter {
    /// The encoding is chosen from the path's extension.
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
