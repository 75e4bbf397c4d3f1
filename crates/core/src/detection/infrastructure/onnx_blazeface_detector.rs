//! BlazeFace face detector using ONNX Runtime via `ort`.
//!
//! BlazeFace sees a fixed 128x128 input, so small faces are searched by
//! letterboxing the photo onto progressively larger square canvases. Raw
//! anchor hits from every level are pooled and grouped by neighbor count.

use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::infrastructure::candidate_grouper::{group_candidates, Candidate};
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// BlazeFace model input resolution.
const INPUT_SIZE: u32 = 128;

/// Default confidence threshold.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Number of BlazeFace anchors (short-range model).
const NUM_ANCHORS: usize = 896;

/// Largest canvas, relative to the photo's longer side.
const MAX_PYRAMID_EXTENT: f64 = 2.0;

/// Fill value for letterbox padding.
const PAD_VALUE: f32 = 0.0;

/// BlazeFace face detector backed by an ONNX Runtime session.
pub struct OnnxBlazefaceDetector {
    session: ort::session::Session,
    confidence: f64,
    anchors: Vec<[f32; 2]>,
}

impl OnnxBlazefaceDetector {
    /// Load a BlazeFace ONNX model.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_execution_providers(execution_providers())?
            .commit_from_file(model_path)?;
        Ok(Self {
            session,
            confidence,
            anchors: generate_anchors(),
        })
    }

    /// Runs one 128x128 inference and copies out `(regressors, scores)`.
    fn infer(
        &mut self,
        tensor: ndarray::Array4<f32>,
    ) -> Result<(Vec<f32>, Vec<f32>), Box<dyn std::error::Error>> {
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // BlazeFace outputs two tensors:
        // - regressors: [1, 896, 16] (box deltas + keypoints)
        // - classificators: [1, 896, 1] (confidence scores)
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }

        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;
        Ok((reg_data.to_vec(), score_data.to_vec()))
    }
}

impl FaceDetector for OnnxBlazefaceDetector {
    fn detect(
        &mut self,
        gray: &Frame,
        scale_factor: f64,
        min_neighbors: u32,
    ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        let levels = pyramid_levels(gray.width(), gray.height(), scale_factor)?;
        if levels.is_empty() {
            return Ok(Vec::new());
        }
        let gray = gray.to_grayscale();

        let mut candidates = Vec::new();
        for canvas in levels {
            let letterbox = Letterbox::new(gray.width(), gray.height(), canvas);
            let tensor = preprocess(&gray, &letterbox, INPUT_SIZE);
            let (reg_data, score_data) = self.infer(tensor)?;
            let hits = decode(
                &reg_data,
                &score_data,
                &self.anchors,
                self.confidence,
                &letterbox,
            );
            log::debug!("Pyramid canvas {canvas:.0}px: {} raw hits", hits.len());
            candidates.extend(hits);
        }

        let faces = group_candidates(&candidates, min_neighbors)
            .iter()
            .filter_map(|c| to_bounding_box(c, gray.width(), gray.height()))
            .collect();
        Ok(faces)
    }
}

/// Platform accelerator for the session; ONNX Runtime falls back to CPU when
/// the provider cannot be registered.
fn execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

// ---------------------------------------------------------------------------
// Pyramid / letterbox geometry
// ---------------------------------------------------------------------------

/// Canvas sides to search, from the photo's longer side up to
/// `MAX_PYRAMID_EXTENT` times it, one `scale_factor` step apart.
///
/// An empty frame has no levels. `scale_factor` must exceed 1.0.
fn pyramid_levels(width: u32, height: u32, scale_factor: f64) -> Result<Vec<f64>, String> {
    if scale_factor.is_nan() || scale_factor <= 1.0 {
        return Err(format!(
            "scale factor must be greater than 1.0, got {scale_factor}"
        ));
    }
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }
    let side = width.max(height) as f64;
    let limit = side * MAX_PYRAMID_EXTENT + 1e-6;
    let mut levels = Vec::new();
    let mut canvas = side;
    while canvas <= limit {
        levels.push(canvas);
        canvas *= scale_factor;
    }
    Ok(levels)
}

/// The photo centered on a square canvas of side `canvas`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Letterbox {
    canvas: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Letterbox {
    fn new(width: u32, height: u32, canvas: f64) -> Self {
        Self {
            canvas,
            offset_x: (canvas - width as f64) / 2.0,
            offset_y: (canvas - height as f64) / 2.0,
        }
    }

    /// Normalized canvas coordinate to image pixels.
    fn to_image(&self, nx: f64, ny: f64) -> (f64, f64) {
        (
            nx * self.canvas - self.offset_x,
            ny * self.canvas - self.offset_y,
        )
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Sample the letterboxed gray frame to `size × size`, replicate into three
/// channels and normalize to [0,1] NCHW float32.
fn preprocess(gray: &Frame, letterbox: &Letterbox, size: u32) -> ndarray::Array4<f32> {
    let src = gray.as_ndarray();
    let src_w = gray.width() as f64;
    let src_h = gray.height() as f64;
    let s = size as usize;
    let step = letterbox.canvas / s as f64;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));

    for y in 0..s {
        let src_y = (y as f64 + 0.5) * step - letterbox.offset_y;
        for x in 0..s {
            let src_x = (x as f64 + 0.5) * step - letterbox.offset_x;
            let value = if src_x >= 0.0 && src_x < src_w && src_y >= 0.0 && src_y < src_h {
                src[[src_y as usize, src_x as usize, 0]] as f32 / 255.0
            } else {
                PAD_VALUE
            };
            for c in 0..3 {
                tensor[[0, c, y, x]] = value;
            }
        }
    }

    tensor
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode anchor regressions above `confidence` into image-space candidates.
fn decode(
    reg_data: &[f32],
    score_data: &[f32],
    anchors: &[[f32; 2]],
    confidence: f64,
    letterbox: &Letterbox,
) -> Vec<Candidate> {
    let num_anchors = anchors.len().min(NUM_ANCHORS);
    let mut hits = Vec::new();

    for (i, &raw_score) in score_data.iter().enumerate().take(num_anchors) {
        let score = sigmoid(raw_score);
        if (score as f64) < confidence {
            continue;
        }

        let reg_offset = i * 16;
        if reg_offset + 4 > reg_data.len() {
            break;
        }

        // Decode box center + size relative to anchor
        let anchor = &anchors[i];
        let cx = (anchor[0] + reg_data[reg_offset] / INPUT_SIZE as f32) as f64;
        let cy = (anchor[1] + reg_data[reg_offset + 1] / INPUT_SIZE as f32) as f64;
        let w = (reg_data[reg_offset + 2] / INPUT_SIZE as f32) as f64;
        let h = (reg_data[reg_offset + 3] / INPUT_SIZE as f32) as f64;

        let (x1, y1) = letterbox.to_image(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.to_image(cx + w / 2.0, cy + h / 2.0);
        hits.push(Candidate {
            corners: [x1, y1, x2, y2],
            score: score as f64,
        });
    }

    hits
}

/// Clamp a grouped candidate into the frame; degenerate boxes are dropped.
///
/// Corners are rounded to whole pixels first so the size always spans them.
fn to_bounding_box(c: &Candidate, frame_w: u32, frame_h: u32) -> Option<BoundingBox> {
    let x1 = c.corners[0].max(0.0).round() as i32;
    let y1 = c.corners[1].max(0.0).round() as i32;
    let x2 = c.corners[2].min(frame_w as f64).round() as i32;
    let y2 = c.corners[3].min(frame_h as f64).round() as i32;
    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(BoundingBox::new(x1, y1, x2 - x1, y2 - y1))
}

// ---------------------------------------------------------------------------
// Anchor generation (BlazeFace short-range)
// ---------------------------------------------------------------------------

/// Generate BlazeFace anchors for the short-range model.
///
/// The short-range model uses two feature map sizes: 16×16 and 8×8,
/// with 2 and 6 anchors per cell respectively.
fn generate_anchors() -> Vec<[f32; 2]> {
    let strides = [(8, 2), (16, 6)]; // (stride, anchors_per_cell)
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);

    for &(stride, num) in &strides {
        let grid_size = INPUT_SIZE as usize / stride;
        for y in 0..grid_size {
            for x in 0..grid_size {
                let cx = (x as f32 + 0.5) / grid_size as f32;
                let cy = (y as f32 + 0.5) / grid_size as f32;
                for _ in 0..num {
                    anchors.push([cx, cy]);
                }
            }
        }
    }

    anchors
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
