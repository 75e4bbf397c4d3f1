use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::analysis::thirds::ThirdLines;
use crate::edges::domain::edge_detector::EdgeDetector;
use crate::error::AnalysisError;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::pipeline::analyzer_config::AnalyzerConfig;
use crate::shared::constants::{GUIDE_LINE_COLOR, GUIDE_LINE_WIDTH};
use crate::shared::frame::Frame;

/// Edge map with facial-thirds guides: read → gray → edges → draw → write.
pub struct AnnotateGeometryUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    edge_detector: Box<dyn EdgeDetector>,
    config: AnalyzerConfig,
}

impl AnnotateGeometryUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        edge_detector: Box<dyn EdgeDetector>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            reader,
            writer,
            edge_detector,
            config,
        }
    }

    /// Writes the annotated image next to `photo` and returns its path.
    ///
    /// The output location is fixed, so an earlier result is overwritten.
    pub fn execute(&self, photo: &Path) -> Result<PathBuf, AnalysisError> {
        let frame = self
            .reader
            .read(photo)
            .map_err(|e| AnalysisError::image_read(photo, e))?;
        log::info!("Image dimensions: {}x{}", frame.width(), frame.height());

        let annotated = self.annotate(&frame)?;

        let output = self.config.output_path_for(photo);
        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| AnalysisError::image_write(&output, Box::new(e)))?;
        }
        self.writer
            .write(&output, &annotated)
            .map_err(|e| AnalysisError::image_write(&output, e))?;

        log::info!("Saved analyzed image to: {}", output.display());
        Ok(output)
    }

    /// Three-channel edge raster with the two thirds lines drawn over it.
    pub fn annotate(&self, frame: &Frame) -> Result<Frame, AnalysisError> {
        let gray = frame.to_grayscale();
        let edges = self
            .edge_detector
            .detect_edges(&gray, self.config.canny_low, self.config.canny_high)
            .map_err(|e| AnalysisError::Unexpected(format!("edge detection failed: {e}")))?;

        let rgb = edges.to_rgb();
        let mut canvas = RgbImage::from_raw(rgb.width(), rgb.height(), rgb.into_data())
            .ok_or_else(|| AnalysisError::Unexpected("edge raster has wrong size".into()))?;
        let lines = ThirdLines::for_height(canvas.height());
        draw_thirds(&mut canvas, lines);

        let (width, height) = canvas.dimensions();
        Ok(Frame::new(canvas.into_raw(), width, height, 3))
    }
}

/// Full-width guide lines at both third boundaries, clipped to the image.
fn draw_thirds(canvas: &mut RgbImage, lines: ThirdLines) {
    let width = canvas.width();
    if width == 0 || canvas.height() == 0 {
        return;
    }
    for y in [lines.upper, lines.lower] {
        let rect = Rect::at(0, y as i32).of_size(width, GUIDE_LINE_WIDTH);
        draw_filled_rect_mut(canvas, rect, Rgb(GUIDE_LINE_COLOR));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::infrastructure::canny_edge_detector::CannyEdgeDetector;
    use crate::imaging::infrastructure::image_file_reader::ImageFileReader;
    use crate::imaging::infrastructure::image_file_writer::ImageFileWriter;
    use rstest::rstest;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubReader {
        frame: Option<Frame>,
    }

    impl ImageReader for StubReader {
        fn read(&self, _path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
            self.frame.clone().ok_or_else(|| "corrupt image".into())
        }
    }

    struct RecordingWriter {
        written: Arc<Mutex<Vec<(PathBuf, Frame)>>>,
        fail: bool,
    }

    impl ImageWriter for RecordingWriter {
        fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail {
                return Err("disk full".into());
            }
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), frame.clone()));
            Ok(())
        }
    }

    /// Edge detector that reports no edges at all.
    struct BlankEdges;

    impl EdgeDetector for BlankEdges {
        fn detect_edges(
            &self,
            gray: &Frame,
            _low: f32,
            _high: f32,
        ) -> Result<Frame, Box<dyn std::error::Error>> {
            Ok(Frame::new(
                vec![0; gray.data().len()],
                gray.width(),
                gray.height(),
                1,
            ))
        }
    }

    // --- Helpers ---

    fn gray_photo(w: u32, h: u32) -> Frame {
        Frame::new(vec![90; (w * h * 3) as usize], w, h, 3)
    }

    fn use_case(
        frame: Option<Frame>,
        fail_write: bool,
    ) -> (AnnotateGeometryUseCase, Arc<Mutex<Vec<(PathBuf, Frame)>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let uc = AnnotateGeometryUseCase::new(
            Box::new(StubReader { frame }),
            Box::new(RecordingWriter {
                written: written.clone(),
                fail: fail_write,
            }),
            Box::new(BlankEdges),
            AnalyzerConfig::default(),
        );
        (uc, written)
    }

    fn is_white_row(frame: &Frame, y: u32) -> bool {
        let start = (y * frame.width() * 3) as usize;
        let end = start + (frame.width() * 3) as usize;
        frame.data()[start..end].iter().all(|&v| v == 255)
    }

    // --- Tests ---

    #[test]
    fn test_lines_drawn_at_thirds_with_two_pixel_stroke() {
        let (uc, _) = use_case(None, false);
        let out = uc.annotate(&gray_photo(30, 300)).unwrap();
        assert_eq!(out.channels(), 3);
        for y in [100, 101, 200, 201] {
            assert!(is_white_row(&out, y), "row {y} should be a guide line");
        }
        for y in [0, 99, 102, 150, 199, 202, 299] {
            assert!(!is_white_row(&out, y), "row {y} should be background");
        }
    }

    #[test]
    fn test_lines_use_floor_of_height() {
        let (uc, _) = use_case(None, false);
        let out = uc.annotate(&gray_photo(10, 302)).unwrap();
        assert!(is_white_row(&out, 100));
        assert!(is_white_row(&out, 200));
    }

    #[test]
    fn test_lines_clip_on_tiny_images() {
        let (uc, _) = use_case(None, false);
        let out = uc.annotate(&gray_photo(4, 1)).unwrap();
        assert!(is_white_row(&out, 0));
    }

    #[test]
    fn test_execute_writes_to_fixed_location() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("upload.jpg");
        let (uc, written) = use_case(Some(gray_photo(20, 30)), false);

        let output = uc.execute(&photo).unwrap();

        assert_eq!(output, dir.path().join("analyzed").join("analyzed_face.jpg"));
        assert!(dir.path().join("analyzed").is_dir());
        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, output);
        assert_eq!((written[0].1.width(), written[0].1.height()), (20, 30));
    }

    #[test]
    fn test_unreadable_image_is_image_read_error() {
        let (uc, written) = use_case(None, false);
        let err = uc.execute(Path::new("/tmp/whatever.jpg")).unwrap_err();
        assert_eq!(err.kind(), "ImageReadError");
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_write_failure_is_image_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let (uc, _) = use_case(Some(gray_photo(5, 5)), true);
        let err = uc.execute(&dir.path().join("p.jpg")).unwrap_err();
        assert_eq!(err.kind(), "ImageWriteError");
    }

    #[test]
    fn test_real_files_are_byte_identical_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("face.png");
        let mut img = RgbImage::new(60, 90);
        for (x, _, px) in img.enumerate_pixels_mut() {
            *px = if x < 30 { Rgb([0, 0, 0]) } else { Rgb([250, 240, 230]) };
        }
        img.save(&photo).unwrap();

        let uc = AnnotateGeometryUseCase::new(
            Box::new(ImageFileReader::new()),
            Box::new(ImageFileWriter::new()),
            Box::new(CannyEdgeDetector::new()),
            AnalyzerConfig::default(),
        );
        let first_path = uc.execute(&photo).unwrap();
        let first = std::fs::read(&first_path).unwrap();
        let second_path = uc.execute(&photo).unwrap();
        let second = std::fs::read(&second_path).unwrap();

        assert_eq!(first_path, second_path);
        assert_eq!(first, second);
        let decoded = image::open(&first_path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (60, 90));
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(1, 5)]
    #[case(5, 1)]
    #[case(3, 3)]
    fn test_tiny_photos_are_annotated_on_disk(#[case] width: u32, #[case] height: u32) {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("tiny.png");
        RgbImage::from_pixel(width, height, Rgb([120, 60, 30]))
            .save(&photo)
            .unwrap();

        let uc = AnnotateGeometryUseCase::new(
            Box::new(ImageFileReader::new()),
            Box::new(ImageFileWriter::new()),
            Box::new(CannyEdgeDetector::new()),
            AnalyzerConfig::default(),
        );
        let output = uc.execute(&photo).unwrap();

        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (width, height));
    }
}
