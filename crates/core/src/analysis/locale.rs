use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::analysis::classification::{FaceShape, Proportion, Symmetry};

/// Language of the report text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    English,
    BrazilianPortuguese,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unsupported locale '{0}' (expected 'en' or 'pt-BR')")]
pub struct LocaleParseError(pub String);

impl FromStr for Locale {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "en-gb" => Ok(Locale::English),
            "pt" | "pt-br" => Ok(Locale::BrazilianPortuguese),
            _ => Err(LocaleParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::English => f.write_str("en"),
            Locale::BrazilianPortuguese => f.write_str("pt-BR"),
        }
    }
}

/// Every fixed string that goes into a report, for one language.
///
/// `{shape}` in [`ReportText::recommendations`] is replaced with the
/// lower-cased shape name.
pub struct ReportText {
    pub shape_label: &'static str,
    pub round: (&'static str, &'static str),
    pub oval: (&'static str, &'static str),
    pub square: (&'static str, &'static str),
    pub symmetry_label: &'static str,
    pub highly_symmetric: &'static str,
    pub slightly_asymmetric: &'static str,
    pub proportion_label: &'static str,
    pub balanced: &'static str,
    pub wide: &'static str,
    pub narrow: &'static str,
    pub upper_third_label: &'static str,
    pub middle_third_label: &'static str,
    pub lower_third_label: &'static str,
    pub upper_default: &'static str,
    pub upper_prominent: &'static str,
    pub middle_default: &'static str,
    pub lower_default: &'static str,
    pub lower_elongated: &'static str,
    pub skin_conditions: &'static [&'static str],
    pub recommendations: &'static [&'static str],
    pub color_palette: &'static [&'static str],
}

impl ReportText {
    /// `(name, features)` for a face shape.
    pub fn shape(&self, shape: FaceShape) -> (&'static str, &'static str) {
        match shape {
            FaceShape::Round => self.round,
            FaceShape::Oval => self.oval,
            FaceShape::Square => self.square,
        }
    }

    pub fn symmetry(&self, symmetry: Symmetry) -> &'static str {
        match symmetry {
            Symmetry::HighlySymmetric => self.highly_symmetric,
            Symmetry::SlightlyAsymmetric => self.slightly_asymmetric,
        }
    }

    pub fn proportion(&self, proportion: Proportion) -> &'static str {
        match proportion {
            Proportion::Balanced => self.balanced,
            Proportion::Wide => self.wide,
            Proportion::Narrow => self.narrow,
        }
    }
}

impl Locale {
    pub fn text(&self) -> &'static ReportText {
        match self {
            Locale::English => &ENGLISH,
            Locale::BrazilianPortuguese => &PORTUGUESE,
        }
    }
}

static ENGLISH: ReportText = ReportText {
    shape_label: "Face Shape",
    round: ("Round", "Soft curves, fuller cheeks"),
    oval: ("Oval", "Balanced proportions, defined cheekbones"),
    square: ("Square", "Strong jaw, defined angles"),
    symmetry_label: "Symmetry",
    highly_symmetric: "Highly symmetric",
    slightly_asymmetric: "Slightly asymmetric",
    proportion_label: "Proportions",
    balanced: "Balanced",
    wide: "Wide",
    narrow: "Narrow",
    upper_third_label: "Upper Third",
    middle_third_label: "Middle Third",
    lower_third_label: "Lower Third",
    upper_default: "Proportional forehead",
    upper_prominent: "Slightly prominent forehead",
    middle_default: "Balanced eyes and nose",
    lower_default: "Balanced chin and mouth area",
    lower_elongated: "Slightly elongated lower third",
    skin_conditions: &[
        "Note: Detailed skin analysis requires high-resolution images",
        "We recommend a professional consultation for specific skin concerns",
    ],
    recommendations: &[
        "Foundation: Choose a formula that complements your {shape} face shape, focusing on even coverage",
        "Contour: Apply along the cheekbones and jawline to enhance the natural structure",
        "Blush: Place on the apples of the cheeks, blending upward toward the temples",
        "Eyes: Use light shades on the lids and darker shades in the crease for depth",
        "Brows: Shape them to frame the face and enhance symmetry",
        "Lips: Define with liner and choose colors that complement your skin tone",
    ],
    color_palette: &[
        "Neutral Base: Beige, taupe and soft brown tones",
        "Accent Colors: Warm peach, coral and rose gold",
        "Definition: Deep brown and plum for contour and eyes",
    ],
};

static PORTUGUESE: ReportText = ReportText {
    shape_label: "Formato do Rosto",
    round: ("Redondo", "Curvas suaves, bochechas mais cheias"),
    oval: ("Oval", "Proporções balanceadas, maçãs do rosto definidas"),
    square: ("Quadrado", "Maxilar forte, ângulos definidos"),
    symmetry_label: "Simetria",
    highly_symmetric: "Altamente simétrico",
    slightly_asymmetric: "Levemente assimétrico",
    proportion_label: "Proporções",
    balanced: "Balanceadas",
    wide: "Largas",
    narrow: "Estreitas",
    upper_third_label: "Terço Superior",
    middle_third_label: "Terço Médio",
    lower_third_label: "Terço Inferior",
    upper_default: "Testa proporcional",
    upper_prominent: "Testa levemente proeminente",
    middle_default: "Olhos e nariz balanceados",
    lower_default: "Região do queixo e boca balanceada",
    lower_elongated: "Terço inferior levemente alongado",
    skin_conditions: &[
        "Observação: Análise detalhada da pele requer imagens em alta resolução",
        "Recomendamos consulta profissional para preocupações específicas da pele",
    ],
    recommendations: &[
        "Base: Escolha uma fórmula que complemente seu formato de rosto {shape}, focando em cobertura uniforme",
        "Contorno: Aplique ao longo das maçãs do rosto e linha do maxilar para realçar a estrutura natural",
        "Blush: Posicione nas maçãs do rosto, misturando para cima em direção às têmporas",
        "Olhos: Use tons claros nas pálpebras, tons mais escuros na dobra para profundidade",
        "Sobrancelhas: Modele para emoldurar o rosto e realçar a simetria",
        "Lábios: Defina com delineador, escolha cores que complementem seu tom de pele",
    ],
    color_palette: &[
        "Base Neutra: Tons de bege, taupe e marrom suave",
        "Cores de Destaque: Pêssego quente, coral e ouro rosado",
        "Definição: Marrom profundo e ameixa para contorno e olhos",
    ],
};
