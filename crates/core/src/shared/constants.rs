pub const BLAZEFACE_MODEL_NAME: &str = "blazeface_short_range.onnx";

/// Application directory name under the platform cache dir.
pub const APP_DIR_NAME: &str = "Visage";

/// Pyramid step between detection scales.
pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;

/// A candidate cluster must hold more than this many raw detections.
pub const DEFAULT_MIN_NEIGHBORS: u32 = 4;

pub const CANNY_LOW_THRESHOLD: f32 = 100.0;
pub const CANNY_HIGH_THRESHOLD: f32 = 200.0;

/// Thirds guide lines: white, 2 px.
pub const GUIDE_LINE_COLOR: [u8; 3] = [255, 255, 255];
pub const GUIDE_LINE_WIDTH: u32 = 2;

pub const ANALYZED_DIR_NAME: &str = "analyzed";
pub const ANALYZED_FILE_NAME: &str = "analyzed_face.jpg";
