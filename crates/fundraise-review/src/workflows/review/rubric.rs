use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// The four review categories an admin rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    BasicInfo,
    VisualContent,
    FinancialSetup,
    Documentation,
}

impl SectionKey {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::BasicInfo,
            Self::VisualContent,
            Self::FinancialSetup,
            Self::Documentation,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BasicInfo => "basic_info",
            Self::VisualContent => "visual_content",
            Self::FinancialSetup => "financial_setup",
            Self::Documentation => "documentation",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = RubricError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| RubricError::UnknownSection(raw.to_string()))
    }
}

/// A rated section: what it covers and the share of the total it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDefinition {
    pub key: SectionKey,
    pub title: String,
    pub description: String,
    pub max_score: f64,
}

impl SectionDefinition {
    fn new(key: SectionKey, title: &str, description: &str, max_score: f64) -> Self {
        Self {
            key,
            title: title.to_string(),
            description: description.to_string(),
            max_score,
        }
    }
}

/// Ordered section set with weights that sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRubric {
    sections: Vec<SectionDefinition>,
}

impl ReviewRubric {
    pub fn new(sections: Vec<SectionDefinition>) -> Result<Self, RubricError> {
        if sections.is_empty() {
            return Err(RubricError::Empty);
        }

        for (index, section) in sections.iter().enumerate() {
            if !section.max_score.is_finite() || section.max_score <= 0.0 {
                return Err(RubricError::InvalidWeight {
                    key: section.key,
                    weight: section.max_score,
                });
            }
            if sections[..index].iter().any(|seen| seen.key == section.key) {
                return Err(RubricError::DuplicateSection(section.key));
            }
        }

        let total: f64 = sections.iter().map(|section| section.max_score).sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(RubricError::WeightsDoNotSumToOne { total });
        }

        Ok(Self { sections })
    }

    pub fn standard() -> Self {
        Self {
            sections: vec![
                SectionDefinition::new(
                    SectionKey::BasicInfo,
                    "Basic Information",
                    "Title, description, and overall presentation quality",
                    0.3,
                ),
                SectionDefinition::new(
                    SectionKey::VisualContent,
                    "Visual Content",
                    "Image quality, appropriateness, and relevance",
                    0.2,
                ),
                SectionDefinition::new(
                    SectionKey::FinancialSetup,
                    "Financial Setup",
                    "Monobank jar configuration and goal appropriateness",
                    0.2,
                ),
                SectionDefinition::new(
                    SectionKey::Documentation,
                    "Documentation & Reports",
                    "Progress reports, transparency, and documentation quality",
                    0.3,
                ),
            ],
        }
    }

    pub fn sections(&self) -> &[SectionDefinition] {
        &self.sections
    }

    pub fn section(&self, key: SectionKey) -> Option<&SectionDefinition> {
        self.sections.iter().find(|section| section.key == key)
    }
}

impl Default for ReviewRubric {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'de> Deserialize<'de> for ReviewRubric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            sections: Vec<SectionDefinition>,
        }

        let raw = Raw::deserialize(deserializer)?;
        ReviewRubric::new(raw.sections).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RubricError {
    #[error("rubric needs at least one section")]
    Empty,
    #[error("section {0} appears more than once")]
    DuplicateSection(SectionKey),
    #[error("section {key} has invalid weight {weight}")]
    InvalidWeight { key: SectionKey, weight: f64 },
    #[error("section weights sum to {total}, expected 1.0")]
    WeightsDoNotSumToOne { total: f64 },
    #[error("section {key} score {score} is outside 0..={max_score}")]
    ScoreOutOfRange {
        key: SectionKey,
        score: f64,
        max_score: f64,
    },
    #[error("unknown review section '{0}'")]
    UnknownSection(String),
}
