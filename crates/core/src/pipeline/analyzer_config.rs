use std::path::{Path, PathBuf};

use crate::analysis::locale::Locale;
use crate::shared::constants::{
    ANALYZED_DIR_NAME, ANALYZED_FILE_NAME, CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD,
    DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};

/// Tunables for one analysis run.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzerConfig {
    pub scale_factor: f64,
    pub min_neighbors: u32,
    pub canny_low: f32,
    pub canny_high: f32,
    /// Directory created next to the photo for the annotated image.
    pub output_dir_name: String,
    pub output_file_name: String,
    pub locale: Locale,
}

impl AnalyzerConfig {
    /// `<photo dir>/<output_dir_name>/<output_file_name>`.
    pub fn output_path_for(&self, photo: &Path) -> PathBuf {
        photo
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.output_dir_name)
            .join(&self.output_file_name)
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            canny_low: CANNY_LOW_THRESHOLD,
            canny_high: CANNY_HIGH_THRESHOLD,
            output_dir_name: ANALYZED_DIR_NAME.to_string(),
            output_file_name: ANALYZED_FILE_NAME.to_string(),
            locale: Locale::default(),
        }
    }
}
