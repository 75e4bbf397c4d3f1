use crate::shared::frame::Frame;

/// Domain interface for edge extraction.
///
/// Takes a single-channel raster and returns a single-channel raster of the
/// same size where edge pixels are 255 and everything else is 0.
pub trait EdgeDetector {
    fn detect_edges(
        &self,
        gray: &Frame,
        low_threshold: f32,
        high_threshold: f32,
    ) -> Result<Frame, Box<dyn std::error::Error>>;
}
