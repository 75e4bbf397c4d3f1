use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// `gray` is a single-channel raster. `scale_factor` is the step between
/// search scales (must be > 1.0) and `min_neighbors` is how many overlapping
/// raw hits a face needs before it is reported. Implementations may hold
/// inference sessions, hence `&mut self`.
pub trait FaceDetector {
    fn detect(
        &mut self,
        gray: &Frame,
        scale_factor: f64,
        min_neighbors: u32,
    ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>>;
}
