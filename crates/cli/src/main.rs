use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::Serialize;

use visage_core::analysis::locale::Locale;
use visage_core::detection::domain::face_detector::FaceDetector;
use visage_core::detection::infrastructure::model_resolver::{self, ModelSource};
use visage_core::detection::infrastructure::onnx_blazeface_detector::{
    OnnxBlazefaceDetector, DEFAULT_CONFIDENCE,
};
use visage_core::edges::infrastructure::canny_edge_detector::CannyEdgeDetector;
use visage_core::error::{AnalysisError, ErrorReport};
use visage_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use visage_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use visage_core::pipeline::analyze_face_use_case::{AnalyzeFaceUseCase, DetectorFactory};
use visage_core::pipeline::analyzer_config::AnalyzerConfig;
use visage_core::pipeline::annotate_geometry_use_case::AnnotateGeometryUseCase;
use visage_core::pipeline::pipeline_logger::LogPipelineLogger;
use visage_core::shared::constants::BLAZEFACE_MODEL_NAME;

const MISSING_PHOTO_MESSAGE: &str = "Photo path is required";
const INVALID_ARGUMENT_KIND: &str = "InvalidArgumentError";

/// Face geometry analysis for a single photo.
#[derive(Parser)]
#[command(name = "visage", version)]
struct Cli {
    /// Photo to analyze.
    photo: Option<PathBuf>,

    /// Report language: en or pt-BR.
    #[arg(long, default_value = "en")]
    locale: String,

    /// BlazeFace ONNX model file (skips the cache lookup).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Where to download the model from when it is not installed.
    #[arg(long)]
    model_url: Option<String>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct MissingArgumentReport {
    error: &'static str,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct InvalidArgument(String);

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let message = e.to_string().trim().to_string();
            fail(&ErrorReport::new(
                INVALID_ARGUMENT_KIND,
                &InvalidArgument(message),
            ));
        }
    };

    let Some(photo) = cli.photo.clone() else {
        emit_stderr(&MissingArgumentReport {
            error: MISSING_PHOTO_MESSAGE,
        });
        process::exit(1);
    };

    let locale = match validate(&cli) {
        Ok(locale) => locale,
        Err(e) => fail(&ErrorReport::new(INVALID_ARGUMENT_KIND, &e)),
    };

    let mut use_case = build_use_case(&cli, locale);
    match use_case.execute(&photo) {
        Ok(report) => {
            let json = if cli.pretty {
                serde_json::to_string_pretty(&report)
            } else {
                serde_json::to_string(&report)
            };
            match json {
                Ok(text) => println!("{text}"),
                Err(e) => fail(&ErrorReport::from_error(&AnalysisError::Unexpected(
                    format!("failed to serialize report: {e}"),
                ))),
            }
        }
        Err(e) => fail(&ErrorReport::from_error(&e)),
    }
}

fn build_use_case(cli: &Cli, locale: Locale) -> AnalyzeFaceUseCase {
    let config = AnalyzerConfig::default().with_locale(locale);
    let annotator = AnnotateGeometryUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        Box::new(CannyEdgeDetector::new()),
        config.clone(),
    );
    AnalyzeFaceUseCase::new(
        Box::new(ImageFileReader::new()),
        detector_factory(cli),
        annotator,
        config,
        Box::new(LogPipelineLogger::new()),
    )
}

fn detector_factory(cli: &Cli) -> DetectorFactory {
    let source = ModelSource {
        explicit_path: cli.model.clone(),
        bundled_dir: model_resolver::default_bundled_dir(),
        download_url: cli.model_url.clone(),
    };
    let confidence = cli.confidence;
    Box::new(move || build_detector(&source, confidence))
}

fn build_detector(
    source: &ModelSource,
    confidence: f64,
) -> Result<Box<dyn FaceDetector>, AnalysisError> {
    log::info!("Resolving model: {BLAZEFACE_MODEL_NAME}");
    let model_path =
        model_resolver::resolve(BLAZEFACE_MODEL_NAME, source, Some(Box::new(download_progress)))
            .map_err(|e| {
                AnalysisError::detector_unavailable("face detection model not available", Box::new(e))
            })?;

    let detector = OnnxBlazefaceDetector::new(&model_path, confidence).map_err(|e| {
        AnalysisError::detector_unavailable(
            format!("failed to load model {}", model_path.display()),
            e,
        )
    })?;
    Ok(Box::new(detector))
}

fn validate(cli: &Cli) -> Result<Locale, InvalidArgument> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(InvalidArgument(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )));
    }
    cli.locale
        .parse::<Locale>()
        .map_err(|e| InvalidArgument(e.to_string()))
}

fn fail(report: &ErrorReport) -> ! {
    emit_stderr(report);
    process::exit(1);
}

fn emit_stderr<T: Serialize>(doc: &T) {
    match serde_json::to_string(doc) {
        Ok(text) => eprintln!("{text}"),
        Err(e) => eprintln!("{{\"error\":\"UnexpectedError\",\"details\":\"{e}\"}}"),
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        log::info!("Downloading face detection model... {pct}%");
    } else {
        log::info!("Downloading face detection model... {downloaded} bytes");
    }
}
