use serde::{Deserialize, Serialize};

use crate::analysis::classification::FaceProfile;
use crate::analysis::locale::Locale;

/// The success document printed to stdout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub facial_features: Vec<String>,
    pub facial_thirds: Vec<String>,
    pub skin_conditions: Vec<String>,
    pub recommendations: Vec<String>,
    pub color_palette: Vec<String>,
    pub analyzed_image_path: String,
}

impl AnalysisReport {
    /// Renders the labels of `profile` through the `locale` templates.
    ///
    /// Only the shape feeds into the recommendations (the first one names
    /// it); skin notes and the palette are fixed text.
    pub fn compose(profile: &FaceProfile, locale: Locale, analyzed_image_path: &str) -> Self {
        let text = locale.text();
        let (shape_name, shape_features) = text.shape(profile.shape);

        let facial_features = vec![
            format!("{}: {shape_name} - {shape_features}", text.shape_label),
            format!("{}: {}", text.symmetry_label, text.symmetry(profile.symmetry)),
            format!(
                "{}: {}",
                text.proportion_label,
                text.proportion(profile.proportion)
            ),
        ];

        let upper = if profile.thirds.upper_prominent {
            text.upper_prominent
        } else {
            text.upper_default
        };
        let lower = if profile.thirds.lower_elongated {
            text.lower_elongated
        } else {
            text.lower_default
        };
        let facial_thirds = vec![
            format!("{}: {upper}", text.upper_third_label),
            format!("{}: {}", text.middle_third_label, text.middle_default),
            format!("{}: {lower}", text.lower_third_label),
        ];

        let shape_lower = shape_name.to_lowercase();
        let recommendations = text
            .recommendations
            .iter()
            .map(|line| line.replace("{shape}", &shape_lower))
            .collect();

        Self {
            facial_features,
            facial_thirds,
            skin_conditions: to_strings(text.skin_conditions),
            recommendations,
            color_palette: to_strings(text.color_palette),
            analyzed_image_path: analyzed_image_path.to_string(),
        }
    }
}

fn to_strings(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}
