use image::GrayImage;
use imageproc::edges::canny;

use crate::edges::domain::edge_detector::EdgeDetector;
use crate::shared::frame::Frame;

/// Canny edge detection via `imageproc`.
pub struct CannyEdgeDetector;

impl CannyEdgeDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CannyEdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeDetector for CannyEdgeDetector {
    fn detect_edges(
        &self,
        gray: &Frame,
        low_threshold: f32,
        high_threshold: f32,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        if low_threshold > high_threshold {
            return Err(format!(
                "low threshold {low_threshold} exceeds high threshold {high_threshold}"
            )
            .into());
        }
        let gray = gray.to_grayscale();
        let img = GrayImage::from_raw(gray.width(), gray.height(), gray.into_data())
            .ok_or("Failed to create grayscale image from frame data")?;

        let edges = canny(&img, low_threshold, high_threshold);
        let (width, height) = edges.dimensions();
        Ok(Frame::new(edges.into_raw(), width, height, 1))
    }
}
