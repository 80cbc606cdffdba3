use serde::{Deserialize, Serialize};

use super::rubric::{ReviewRubric, RubricError, SectionDefinition, SectionKey};
use crate::workflows::fundraising::domain::Severity;

/// Stars shown per section.
pub const MAX_STARS: u8 = 5;

/// Round half away from zero to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `round1(value)` rendered without a trailing `.0`.
pub fn format_number(value: f64) -> String {
    let rounded = round1(value);
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded:.1}")
    }
}

/// `part` as a percentage of `whole`, rounded to one decimal. An empty whole
/// yields 0.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 || !whole.is_finite() || !part.is_finite() {
        return 0.0;
    }
    round1(part / whole * 100.0)
}

fn raw_percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Five-bucket label shown on a single section card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionRating {
    Excellent,
    Good,
    Fair,
    Poor,
    NotRated,
}

impl SectionRating {
    pub fn from_percentage(percent: f64) -> Self {
        if percent >= 80.0 {
            Self::Excellent
        } else if percent >= 60.0 {
            Self::Good
        } else if percent >= 40.0 {
            Self::Fair
        } else if percent > 0.0 {
            Self::Poor
        } else {
            Self::NotRated
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::NotRated => "Not Rated",
        }
    }
}

/// Four-bucket label for the whole submission. Kept apart from
/// [`SectionRating`]: it has no "not rated" bucket and a different floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallRating {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl OverallRating {
    pub fn from_percentage(percent: f64) -> Self {
        if percent >= 80.0 {
            Self::Excellent
        } else if percent >= 60.0 {
            Self::Good
        } else if percent >= 40.0 {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            Self::Excellent => Severity::Success,
            Self::Good => Severity::Primary,
            Self::Fair => Severity::Warning,
            Self::NeedsImprovement => Severity::Error,
        }
    }
}

/// Current rating of one section. Only the scoring model changes it, so
/// `0 <= score <= max_score` always holds; deserializing checks the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SectionRecord")]
pub struct ReviewSection {
    pub(crate) key: SectionKey,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) score: f64,
    pub(crate) max_score: f64,
    pub(crate) comment: String,
}

#[derive(Deserialize)]
struct SectionRecord {
    key: SectionKey,
    title: String,
    description: String,
    score: f64,
    max_score: f64,
    #[serde(default)]
    comment: String,
}

impl TryFrom<SectionRecord> for ReviewSection {
    type Error = RubricError;

    fn try_from(record: SectionRecord) -> Result<Self, Self::Error> {
        if !record.max_score.is_finite() || record.max_score <= 0.0 {
            return Err(RubricError::InvalidWeight {
                key: record.key,
                weight: record.max_score,
            });
        }
        if !(0.0..=record.max_score).contains(&record.score) {
            return Err(RubricError::ScoreOutOfRange {
                key: record.key,
                score: record.score,
                max_score: record.max_score,
            });
        }

        Ok(Self {
            key: record.key,
            title: record.title,
            description: record.description,
            score: record.score,
            max_score: record.max_score,
            comment: record.comment,
        })
    }
}

impl ReviewSection {
    pub fn key(&self) -> SectionKey {
        self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    fn unrated(definition: &SectionDefinition) -> Self {
        Self {
            key: definition.key,
            title: definition.title.clone(),
            description: definition.description.clone(),
            score: 0.0,
            max_score: definition.max_score,
            comment: String::new(),
        }
    }

    fn clamp(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, self.max_score)
        }
    }

    pub fn percentage(&self) -> f64 {
        percentage(self.score, self.max_score)
    }

    pub fn rating(&self) -> SectionRating {
        SectionRating::from_percentage(raw_percentage(self.score, self.max_score))
    }

    /// Stars currently lit: `round(score / max_score * 5)`.
    pub fn star_rating(&self) -> u8 {
        if self.max_score <= 0.0 {
            return 0;
        }
        let stars = (self.score / self.max_score * f64::from(MAX_STARS)).round();
        stars.clamp(0.0, f64::from(MAX_STARS)) as u8
    }

    pub fn has_feedback(&self) -> bool {
        self.score > 0.0 || !self.comment.trim().is_empty()
    }
}

/// Every section rating plus the admin's closing remark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    pub(crate) sections: Vec<ReviewSection>,
    pub(crate) final_comment: String,
}

impl ReviewSnapshot {
    pub fn sections(&self) -> &[ReviewSection] {
        &self.sections
    }

    pub fn final_comment(&self) -> &str {
        &self.final_comment
    }

    pub fn section(&self, key: SectionKey) -> Option<&ReviewSection> {
        self.sections.iter().find(|section| section.key == key)
    }

    pub fn total_score(&self) -> f64 {
        self.sections.iter().map(|section| section.score).sum()
    }

    pub fn max_total_score(&self) -> f64 {
        self.sections.iter().map(|section| section.max_score).sum()
    }

    pub fn overall_percentage(&self) -> f64 {
        percentage(self.total_score(), self.max_total_score())
    }

    pub fn overall_rating(&self) -> OverallRating {
        OverallRating::from_percentage(raw_percentage(
            self.total_score(),
            self.max_total_score(),
        ))
    }

    pub fn is_rated(&self) -> bool {
        self.total_score() > 0.0
    }
}

/// Session-scoped rating state for one campaign under review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewScoringModel {
    snapshot: ReviewSnapshot,
}

impl ReviewScoringModel {
    /// Fresh model: every score 0, every comment empty.
    pub fn new(rubric: &ReviewRubric) -> Self {
        Self {
            snapshot: ReviewSnapshot {
                sections: rubric
                    .sections()
                    .iter()
                    .map(ReviewSection::unrated)
                    .collect(),
                final_comment: String::new(),
            },
        }
    }

    pub fn standard() -> Self {
        Self::new(&ReviewRubric::standard())
    }

    /// Set a section's score (clamped into `[0, max_score]`) and replace its
    /// comment. Returns `None` when the rubric has no such section.
    pub fn update_section(
        &mut self,
        key: SectionKey,
        raw_score: f64,
        comment: impl Into<String>,
    ) -> Option<&ReviewSection> {
        let section = self.section_mut(key)?;
        section.score = section.clamp(raw_score);
        section.comment = comment.into();
        Some(section)
    }

    /// Star widget adapter. Picking the star count already shown clears the
    /// score; any other count maps to `stars * max_score / 5`.
    pub fn select_stars(&mut self, key: SectionKey, stars: u8) -> Option<&ReviewSection> {
        let section = self.section_mut(key)?;
        let stars = stars.min(MAX_STARS);
        section.score = if stars == section.star_rating() {
            0.0
        } else {
            section.clamp(f64::from(stars) * section.max_score / f64::from(MAX_STARS))
        };
        Some(section)
    }

    pub fn set_comment(
        &mut self,
        key: SectionKey,
        comment: impl Into<String>,
    ) -> Option<&ReviewSection> {
        let section = self.section_mut(key)?;
        section.comment = comment.into();
        Some(section)
    }

    pub fn set_final_comment(&mut self, comment: impl Into<String>) {
        self.snapshot.final_comment = comment.into();
    }

    pub fn section(&self, key: SectionKey) -> Option<&ReviewSection> {
        self.snapshot.section(key)
    }

    pub fn sections(&self) -> &[ReviewSection] {
        &self.snapshot.sections
    }

    pub fn final_comment(&self) -> &str {
        &self.snapshot.final_comment
    }

    pub fn total_score(&self) -> f64 {
        self.snapshot.total_score()
    }

    pub fn max_total_score(&self) -> f64 {
        self.snapshot.max_total_score()
    }

    pub fn overall_percentage(&self) -> f64 {
        self.snapshot.overall_percentage()
    }

    pub fn overall_rating(&self) -> OverallRating {
        self.snapshot.overall_rating()
    }

    pub fn snapshot(&self) -> ReviewSnapshot {
        self.snapshot.clone()
    }

    fn section_mut(&mut self, key: SectionKey) -> Option<&mut ReviewSection> {
        self.snapshot
            .sections
            .iter_mut()
            .find(|section| section.key == key)
    }
}

impl Default for ReviewScoringModel {
    fn default() -> Self {
        Self::standard()
    }
}
