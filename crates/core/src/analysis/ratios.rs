use crate::shared::bounding_box::BoundingBox;

/// Proportions derived from a face box and the photo it was found in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceRatios {
    /// `width / height` of the face box.
    pub face_ratio: f64,
    /// Horizontal distance of the face center from the photo center, as a
    /// fraction of the photo width.
    pub symmetry_offset: f64,
    /// Face width as a fraction of the photo width.
    pub face_width_ratio: f64,
}

impl FaceRatios {
    pub fn from_box(face: &BoundingBox, image_width: u32) -> Self {
        let image_width = image_width as f64;
        Self {
            face_ratio: face.width as f64 / face.height as f64,
            symmetry_offset: (0.5 - face.center_x() / image_width).abs(),
            face_width_ratio: face.width as f64 / image_width,
        }
    }
}
