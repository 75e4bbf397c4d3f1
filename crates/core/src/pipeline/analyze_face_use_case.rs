use std::path::Path;
use std::time::Instant;

use crate::analysis::classification::FaceProfile;
use crate::analysis::ratios::FaceRatios;
use crate::analysis::report::AnalysisReport;
use crate::detection::domain::face_detector::FaceDetector;
use crate::error::AnalysisError;
use crate::imaging::domain::image_reader::ImageReader;
use crate::pipeline::analyzer_config::AnalyzerConfig;
use crate::pipeline::annotate_geometry_use_case::AnnotateGeometryUseCase;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::bounding_box::BoundingBox;

/// Builds the face detector on first use.
///
/// Loading a model is the expensive, failure-prone step, so it is deferred
/// until the photo itself has been validated and decoded.
pub type DetectorFactory = Box<dyn FnMut() -> Result<Box<dyn FaceDetector>, AnalysisError>>;

/// Single-photo pipeline: validate → decode → detect → annotate → classify → report.
///
/// Any failure aborts the remaining steps.
pub struct AnalyzeFaceUseCase {
    reader: Box<dyn ImageReader>,
    detector_factory: DetectorFactory,
    annotator: AnnotateGeometryUseCase,
    config: AnalyzerConfig,
    logger: Box<dyn PipelineLogger>,
}

impl AnalyzeFaceUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        detector_factory: DetectorFactory,
        annotator: AnnotateGeometryUseCase,
        config: AnalyzerConfig,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            detector_factory,
            annotator,
            config,
            logger,
        }
    }

    pub fn execute(&mut self, photo: &Path) -> Result<AnalysisReport, AnalysisError> {
        self.logger
            .info(&format!("Starting analysis for photo: {}", photo.display()));
        if !photo.exists() {
            return Err(AnalysisError::FileNotFound(photo.to_path_buf()));
        }

        let started = Instant::now();
        let frame = self
            .reader
            .read(photo)
            .map_err(|e| AnalysisError::image_read(photo, e))?;
        let gray = frame.to_grayscale();
        self.stage("decode", started);

        let started = Instant::now();
        let mut detector = (self.detector_factory)()?;
        self.stage("load_model", started);

        let started = Instant::now();
        let faces = detector
            .detect(&gray, self.config.scale_factor, self.config.min_neighbors)
            .map_err(AnalysisError::detection)?;
        self.logger.info(&format!("Detected {} faces", faces.len()));
        self.stage("detect", started);

        let face = single_face(&faces)?;

        let started = Instant::now();
        let analyzed_path = self.annotator.execute(photo)?;
        self.stage("annotate", started);

        let ratios = FaceRatios::from_box(&face, frame.width());
        log::debug!(
            "Face {face:?}: ratio {:.3}, offset {:.3}, width {:.3}",
            ratios.face_ratio,
            ratios.symmetry_offset,
            ratios.face_width_ratio
        );
        let profile = FaceProfile::from_ratios(&ratios, &face, frame.height());
        let report = AnalysisReport::compose(
            &profile,
            self.config.locale,
            &analyzed_path.to_string_lossy(),
        );

        self.logger.info("Analysis completed successfully");
        self.logger.summary();
        Ok(report)
    }

    fn stage(&mut self, name: &str, started: Instant) {
        self.logger
            .timing(name, started.elapsed().as_secs_f64() * 1000.0);
    }
}

/// Enforces the exactly-one-face precondition.
fn single_face(faces: &[BoundingBox]) -> Result<BoundingBox, AnalysisError> {
    match faces {
        [] => Err(AnalysisError::NoFace),
        [face] => Ok(*face),
        many => Err(AnalysisError::MultipleFaces(many.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::locale::Locale;
    use crate::edges::domain::edge_detector::EdgeDetector;
    use crate::edges::infrastructure::canny_edge_detector::CannyEdgeDetector;
    use crate::imaging::domain::image_writer::ImageWriter;
    use crate::imaging::infrastructure::image_file_reader::ImageFileReader;
    use crate::imaging::infrastructure::image_file_writer::ImageFileWriter;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::frame::Frame;
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::rc::Rc;

    // --- Stubs ---

    struct StubDetector {
        faces: Vec<BoundingBox>,
        seen: Rc<Cell<Option<(u8, f64, u32)>>>,
    }

    impl FaceDetector for StubDetector {
        fn detect(
            &mut self,
            gray: &Frame,
            scale_factor: f64,
            min_neighbors: u32,
        ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
            self.seen
                .set(Some((gray.channels(), scale_factor, min_neighbors)));
            Ok(self.faces.clone())
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(
            &mut self,
            _gray: &Frame,
            _scale_factor: f64,
            _min_neighbors: u32,
        ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
            Err("inference session crashed".into())
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        photo: PathBuf,
        seen: Rc<Cell<Option<(u8, f64, u32)>>>,
        factory_calls: Rc<Cell<usize>>,
    }

    /// Writes a 300x300 PNG photo into a fresh temp dir.
    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("photo.png");
        let img = image::RgbImage::from_fn(300, 300, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        img.save(&photo).unwrap();
        Fixture {
            _dir: dir,
            photo,
            seen: Rc::new(Cell::new(None)),
            factory_calls: Rc::new(Cell::new(0)),
        }
    }

    fn annotator() -> AnnotateGeometryUseCase {
        let writer: Box<dyn ImageWriter> = Box::new(ImageFileWriter::new());
        let edges: Box<dyn EdgeDetector> = Box::new(CannyEdgeDetector::new());
        AnnotateGeometryUseCase::new(
            Box::new(ImageFileReader::new()),
            writer,
            edges,
            AnalyzerConfig::default(),
        )
    }

    fn use_case_with(fx: &Fixture, faces: Vec<BoundingBox>, locale: Locale) -> AnalyzeFaceUseCase {
        let seen = fx.seen.clone();
        let calls = fx.factory_calls.clone();
        let factory: DetectorFactory =
            Box::new(move || -> Result<Box<dyn FaceDetector>, AnalysisError> {
                calls.set(calls.get() + 1);
                Ok(Box::new(StubDetector {
                    faces: faces.clone(),
                    seen: seen.clone(),
                }))
            });
        AnalyzeFaceUseCase::new(
            Box::new(ImageFileReader::new()),
            factory,
            annotator(),
            AnalyzerConfig::default().with_locale(locale),
            Box::new(NullPipelineLogger),
        )
    }

    fn analyzed_image(fx: &Fixture) -> PathBuf {
        fx.photo
            .parent()
            .unwrap()
            .join("analyzed")
            .join("analyzed_face.jpg")
    }

    // --- Tests ---

    #[test]
    fn test_reference_face_report() {
        let fx = fixture();
        let mut uc = use_case_with(&fx, vec![BoundingBox::new(100, 80, 150, 130)], Locale::English);

        let report = uc.execute(&fx.photo).unwrap();

        assert_eq!(
            report.facial_features,
            vec![
                "Face Shape: Round - Soft curves, fuller cheeks",
                "Symmetry: Slightly asymmetric",
                "Proportions: Wide",
            ]
        );
        assert_eq!(report.facial_thirds[0], "Upper Third: Slightly prominent forehead");
        assert_eq!(report.facial_thirds[2], "Lower Third: Slightly elongated lower third");
        assert!(Path::new(&report.analyzed_image_path).is_file());
        assert_eq!(PathBuf::from(&report.analyzed_image_path), analyzed_image(&fx));
    }

    #[test]
    fn test_detector_receives_gray_raster_and_fixed_params() {
        let fx = fixture();
        let mut uc = use_case_with(&fx, vec![BoundingBox::new(100, 100, 100, 100)], Locale::English);
        uc.execute(&fx.photo).unwrap();
        assert_eq!(fx.seen.get(), Some((1, 1.1, 4)));
    }

    #[test]
    fn test_centered_face_defaults() {
        let fx = fixture();
        // ratio 0.93 → square; centered; width 0.31 → balanced; inside the middle band
        let mut uc = use_case_with(&fx, vec![BoundingBox::new(103, 100, 93, 100)], Locale::English);

        let report = uc.execute(&fx.photo).unwrap();

        assert_eq!(
            report.facial_features,
            vec![
                "Face Shape: Square - Strong jaw, defined angles",
                "Symmetry: Highly symmetric",
                "Proportions: Balanced",
            ]
        );
        assert_eq!(
            report.facial_thirds,
            vec![
                "Upper Third: Proportional forehead",
                "Middle Third: Balanced eyes and nose",
                "Lower Third: Balanced chin and mouth area",
            ]
        );
    }

    #[test]
    fn test_portuguese_report() {
        let fx = fixture();
        let mut uc = use_case_with(
            &fx,
            vec![BoundingBox::new(100, 80, 150, 130)],
            Locale::BrazilianPortuguese,
        );
        let report = uc.execute(&fx.photo).unwrap();
        assert_eq!(
            report.facial_features[0],
            "Formato do Rosto: Redondo - Curvas suaves, bochechas mais cheias"
        );
    }

    #[test]
    fn test_no_face_fails_without_writing_image() {
        let fx = fixture();
        let mut uc = use_case_with(&fx, vec![], Locale::English);
        let err = uc.execute(&fx.photo).unwrap_err();
        assert_eq!(err.kind(), "NoFaceError");
        assert!(!analyzed_image(&fx).exists());
    }

    #[test]
    fn test_multiple_faces_fails() {
        let fx = fixture();
        let faces = vec![BoundingBox::new(0, 0, 50, 50), BoundingBox::new(200, 200, 50, 50)];
        let mut uc = use_case_with(&fx, faces, Locale::English);
        let err = uc.execute(&fx.photo).unwrap_err();
        assert_eq!(err.kind(), "MultipleFacesError");
        assert!(!analyzed_image(&fx).exists());
    }

    #[test]
    fn test_missing_file_fails_before_loading_detector() {
        let fx = fixture();
        let mut uc = use_case_with(&fx, vec![], Locale::English);
        let err = uc.execute(&fx.photo.with_file_name("absent.jpg")).unwrap_err();
        assert_eq!(err.kind(), "FileNotFoundError");
        assert_eq!(fx.factory_calls.get(), 0);
    }

    #[test]
    fn test_undecodable_file_is_image_read_error() {
        let fx = fixture();
        let broken = fx.photo.with_file_name("broken.jpg");
        std::fs::write(&broken, b"not a jpeg").unwrap();
        let mut uc = use_case_with(&fx, vec![], Locale::English);
        let err = uc.execute(&broken).unwrap_err();
        assert_eq!(err.kind(), "ImageReadError");
        assert_eq!(fx.factory_calls.get(), 0);
    }

    #[test]
    fn test_detector_unavailable_propagates() {
        let fx = fixture();
        let factory: DetectorFactory = Box::new(|| -> Result<Box<dyn FaceDetector>, AnalysisError> {
            Err(AnalysisError::DetectorUnavailable {
                reason: "model blazeface_short_range.onnx is not installed".into(),
                source: None,
            })
        });
        let mut uc = AnalyzeFaceUseCase::new(
            Box::new(ImageFileReader::new()),
            factory,
            annotator(),
            AnalyzerConfig::default(),
            Box::new(NullPipelineLogger),
        );
        let err = uc.execute(&fx.photo).unwrap_err();
        assert_eq!(err.kind(), "DetectorUnavailableError");
    }

    #[test]
    fn test_detector_runtime_failure_is_detection_error() {
        let fx = fixture();
        let factory: DetectorFactory =
            Box::new(|| -> Result<Box<dyn FaceDetector>, AnalysisError> {
                Ok(Box::new(FailingDetector))
            });
        let mut uc = AnalyzeFaceUseCase::new(
            Box::new(ImageFileReader::new()),
            factory,
            annotator(),
            AnalyzerConfig::default(),
            Box::new(NullPipelineLogger),
        );
        let err = uc.execute(&fx.photo).unwrap_err();
        assert_eq!(err.kind(), "DetectionError");
        assert!(err.to_string().contains("inference session crashed"));
    }

    #[test]
    fn test_rerun_overwrites_with_identical_bytes() {
        let fx = fixture();
        let mut uc = use_case_with(&fx, vec![BoundingBox::new(100, 80, 150, 130)], Locale::English);
        let first = uc.execute(&fx.photo).unwrap();
        let first_bytes = std::fs::read(&first.analyzed_image_path).unwrap();
        let second = uc.execute(&fx.photo).unwrap();
        let second_bytes = std::fs::read(&second.analyzed_image_path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn test_single_face_precondition() {
        let face = BoundingBox::new(1, 2, 3, 4);
        assert_eq!(single_face(&[face]).unwrap(), face);
        assert!(matches!(single_face(&[]), Err(AnalysisError::NoFace)));
        assert!(matches!(
            single_face(&[face, face, face]),
            Err(AnalysisError::MultipleFaces(3))
        ));
    }
}
