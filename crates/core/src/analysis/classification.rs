//! Threshold tables that turn face ratios into qualitative labels.
//!
//! Every classifier is total: any finite ratio lands in exactly one category.

use crate::analysis::ratios::FaceRatios;
use crate::analysis::thirds::ThirdLines;
use crate::shared::bounding_box::BoundingBox;

/// Above this width/height ratio a face reads as round.
pub const ROUND_MIN_RATIO: f64 = 0.95;
/// Below this width/height ratio a face reads as oval.
pub const OVAL_MAX_RATIO: f64 = 0.85;
/// Center offsets below this are highly symmetric.
pub const SYMMETRY_MAX_OFFSET: f64 = 0.05;
/// Exclusive lower bound of the balanced width band.
pub const BALANCED_MIN_WIDTH: f64 = 0.3;
/// Exclusive upper bound of the balanced width band; wide from here on.
pub const WIDE_MIN_WIDTH: f64 = 0.45;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceShape {
    Round,
    Oval,
    Square,
}

impl FaceShape {
    /// `> 0.95` round, `< 0.85` oval, everything else (both bounds included)
    /// square.
    pub fn classify(face_ratio: f64) -> Self {
        if face_ratio > ROUND_MIN_RATIO {
            FaceShape::Round
        } else if face_ratio < OVAL_MAX_RATIO {
            FaceShape::Oval
        } else {
            FaceShape::Square
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symmetry {
    HighlySymmetric,
    SlightlyAsymmetric,
}

impl Symmetry {
    pub fn classify(symmetry_offset: f64) -> Self {
        if symmetry_offset < SYMMETRY_MAX_OFFSET {
            Symmetry::HighlySymmetric
        } else {
            Symmetry::SlightlyAsymmetric
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Proportion {
    Balanced,
    Wide,
    Narrow,
}

impl Proportion {
    pub fn classify(face_width_ratio: f64) -> Self {
        if face_width_ratio > BALANCED_MIN_WIDTH && face_width_ratio < WIDE_MIN_WIDTH {
            Proportion::Balanced
        } else if face_width_ratio >= WIDE_MIN_WIDTH {
            Proportion::Wide
        } else {
            Proportion::Narrow
        }
    }
}

/// Where the face box crosses the thirds guide lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThirdsAssessment {
    /// Face top sits above the first line.
    pub upper_prominent: bool,
    /// Face bottom reaches below the second line.
    pub lower_elongated: bool,
}

impl ThirdsAssessment {
    pub fn classify(face: &BoundingBox, lines: &ThirdLines) -> Self {
        Self {
            upper_prominent: face.y < lines.upper as i32,
            lower_elongated: face.bottom() > lines.lower as i32,
        }
    }
}

/// All labels for one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceProfile {
    pub shape: FaceShape,
    pub symmetry: Symmetry,
    pub proportion: Proportion,
    pub thirds: ThirdsAssessment,
}

impl FaceProfile {
    pub fn classify(face: &BoundingBox, image_width: u32, image_height: u32) -> Self {
        Self::from_ratios(&FaceRatios::from_box(face, image_width), face, image_height)
    }

    /// Labels for ratios the caller already derived from `face`.
    pub fn from_ratios(ratios: &FaceRatios, face: &BoundingBox, image_height: u32) -> Self {
        Self {
            shape: FaceShape::classify(ratios.face_ratio),
            symmetry: Symmetry::classify(ratios.symmetry_offset),
            proportion: Proportion::classify(ratios.face_width_ratio),
            thirds: ThirdsAssessment::classify(face, &ThirdLines::for_height(image_height)),
        }
    }
}
