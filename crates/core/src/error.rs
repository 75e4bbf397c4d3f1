use std::error::Error as StdError;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Every way a single analysis run can fail.
///
/// The set is closed; anything the imaging or detector libraries raise that
/// does not map onto a named variant travels as [`AnalysisError::Detection`]
/// or [`AnalysisError::Unexpected`] with its original message.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Photo file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read image file: {}", .path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("Failed to save analyzed image to: {}", .path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("Face detector unavailable: {reason}")]
    DetectorUnavailable {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("No face detected in the image")]
    NoFace,

    #[error("Multiple faces detected ({0}). Please upload a photo with a single face")]
    MultipleFaces(usize),

    #[error("Face detection failed: {0}")]
    Detection(#[source] BoxError),

    #[error("{0}")]
    Unexpected(String),
}

impl AnalysisError {
    /// Stable kind name reported in the `error` field of an [`ErrorReport`].
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::FileNotFound(_) => "FileNotFoundError",
            AnalysisError::ImageRead { .. } => "ImageReadError",
            AnalysisError::ImageWrite { .. } => "ImageWriteError",
            AnalysisError::DetectorUnavailable { .. } => "DetectorUnavailableError",
            AnalysisError::NoFace => "NoFaceError",
            AnalysisError::MultipleFaces(_) => "MultipleFacesError",
            AnalysisError::Detection(_) => "DetectionError",
            AnalysisError::Unexpected(_) => "UnexpectedError",
        }
    }

    pub(crate) fn image_read(path: impl Into<PathBuf>, source: Box<dyn StdError>) -> Self {
        AnalysisError::ImageRead {
            path: path.into(),
            source: detach(source),
        }
    }

    pub(crate) fn image_write(path: impl Into<PathBuf>, source: Box<dyn StdError>) -> Self {
        AnalysisError::ImageWrite {
            path: path.into(),
            source: detach(source),
        }
    }

    pub(crate) fn detection(source: Box<dyn StdError>) -> Self {
        AnalysisError::Detection(detach(source))
    }

    /// The detector could not be built; `source` is kept as the first cause.
    pub fn detector_unavailable(reason: impl Into<String>, source: Box<dyn StdError>) -> Self {
        AnalysisError::DetectorUnavailable {
            reason: reason.into(),
            source: Some(detach(source)),
        }
    }
}

/// Flattens a non-`Send` boxed error into an owned message chain so it can be
/// stored in [`AnalysisError`].
fn detach(err: Box<dyn StdError>) -> BoxError {
    let mut messages = vec![err.to_string()];
    let mut current = err.source();
    while let Some(cause) = current {
        messages.push(cause.to_string());
        current = cause.source();
    }
    messages.join(": ").into()
}

/// Failure document written to stderr: `{"error", "details", "traceback"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub details: String,
    pub traceback: String,
}

impl ErrorReport {
    /// Builds a report from any error kind, using the error's `source()`
    /// chain as the traceback text.
    pub fn new(kind: impl Into<String>, err: &dyn StdError) -> Self {
        Self {
            error: kind.into(),
            details: err.to_string(),
            traceback: cause_chain(err),
        }
    }

    pub fn from_error(err: &AnalysisError) -> Self {
        Self::new(err.kind(), err)
    }
}

/// One line per error in the chain, outermost first.
fn cause_chain(err: &dyn StdError) -> String {
    let mut lines = vec![format!("Error: {err}")];
    let mut current = err.source();
    while let Some(cause) = current {
        lines.push(format!("Caused by: {cause}"));
        current = cause.source();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AnalysisError::FileNotFound(PathBuf::from("a.jpg")), "FileNotFoundError")]
    #[case(AnalysisError::NoFace, "NoFaceError")]
    #[case(AnalysisError::MultipleFaces(2), "MultipleFacesError")]
    #[case(AnalysisError::Unexpected("boom".into()), "UnexpectedError")]
    #[case(
        AnalysisError::DetectorUnavailable { reason: "missing".into(), source: None },
        "DetectorUnavailableError"
    )]
    fn test_kind_names(#[case] err: AnalysisError, #[case] expected: &str) {
        assert_eq!(err.kind(), expected);
    }

    #[test]
    fn test_report_carries_kind_message_and_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad header");
        let err = AnalysisError::image_read("/tmp/x.jpg", Box::new(io));
        let report = ErrorReport::from_error(&err);

        assert_eq!(report.error, "ImageReadError");
        assert_eq!(report.details, "Failed to read image file: /tmp/x.jpg");
        assert!(report.traceback.starts_with("Error: Failed to read image file"));
        assert!(report.traceback.contains("Caused by: bad header"));
    }

    #[test]
    fn test_report_serializes_with_traceback_field() {
        let report = ErrorReport::from_error(&AnalysisError::NoFace);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["error"], "NoFaceError");
        assert_eq!(json["details"], "No face detected in the image");
        assert_eq!(json["traceback"], "Error: No face detected in the image");
    }

    #[test]
    fn test_detach_keeps_nested_messages() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = AnalysisError::image_write("out.jpg", Box::new(inner));
        let report = ErrorReport::from_error(&err);
        assert!(report.traceback.contains("disk full"));
    }
}
