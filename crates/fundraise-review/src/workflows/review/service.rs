use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::queue::{PendingReview, ReviewQueue};
use super::rubric::{ReviewRubric, RubricError, SectionKey};
use super::scoring::{OverallRating, ReviewScoringModel, ReviewSnapshot, SectionRating};
use super::submission::{CreateReviewRequest, ReviewGateway, ReviewSubmission, SubmissionError};
use super::summary::ReviewSummaryGenerator;
use crate::config::ReviewConfig;
use crate::workflows::fundraising::{
    FundraisingGateway, FundraisingId, GatewayError, NotificationSink, Page, Severity,
};

/// Score for one section as entered by the admin. `stars` goes through the
/// star widget semantics and wins over `score` when both are present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SectionInput {
    pub key: SectionKey,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub stars: Option<u8>,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReviewDraft {
    #[serde(default)]
    pub sections: Vec<SectionInput>,
    #[serde(default)]
    pub final_comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionScore {
    pub key: SectionKey,
    pub title: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub stars: u8,
    pub rating: SectionRating,
    pub label: &'static str,
    pub comment: String,
}

/// Scores, labels and summary text for a draft review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewReport {
    pub fundraising_id: FundraisingId,
    pub title: String,
    pub total_score: f64,
    pub max_total_score: f64,
    pub overall_percentage: f64,
    pub overall_rating: OverallRating,
    pub overall_label: &'static str,
    pub overall_severity: Severity,
    pub sections: Vec<SectionScore>,
    pub summary: String,
}

impl ReviewReport {
    fn build(fundraising_id: FundraisingId, title: String, snapshot: &ReviewSnapshot) -> Self {
        let overall = snapshot.overall_rating();
        Self {
            summary: ReviewSummaryGenerator::generate(&title, snapshot),
            fundraising_id,
            title,
            total_score: snapshot.total_score(),
            max_total_score: snapshot.max_total_score(),
            overall_percentage: snapshot.overall_percentage(),
            overall_rating: overall,
            overall_label: overall.label(),
            overall_severity: overall.severity(),
            sections: snapshot
                .sections
                .iter()
                .map(|section| SectionScore {
                    key: section.key,
                    title: section.title.clone(),
                    score: section.score,
                    max_score: section.max_score,
                    percentage: section.percentage(),
                    stars: section.star_rating(),
                    rating: section.rating(),
                    label: section.rating().label(),
                    comment: section.comment.clone(),
                })
                .collect(),
        }
    }
}

/// Admin review entry point used by the HTTP layer. One submission guard per
/// campaign, so a second submit for the same campaign is refused while the
/// first is in flight.
pub struct ReviewService<F: ?Sized, R: ?Sized, N: ?Sized> {
    rubric: ReviewRubric,
    queue: ReviewQueue<F>,
    reviews: Arc<R>,
    notifier: Arc<N>,
    submissions: Mutex<HashMap<FundraisingId, Arc<ReviewSubmission<R, N>>>>,
}

impl<F, R, N> ReviewService<F, R, N>
where
    F: FundraisingGateway + ?Sized,
    R: ReviewGateway + ?Sized,
    N: NotificationSink + ?Sized,
{
    pub fn new(
        fundraisings: Arc<F>,
        reviews: Arc<R>,
        notifier: Arc<N>,
        config: &ReviewConfig,
    ) -> Self {
        Self {
            rubric: ReviewRubric::standard(),
            queue: ReviewQueue::new(fundraisings, config),
            reviews,
            notifier,
            submissions: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_rubric(mut self, rubric: ReviewRubric) -> Self {
        self.rubric = rubric;
        self
    }

    pub fn rubric(&self) -> &ReviewRubric {
        &self.rubric
    }

    /// Apply `draft` to a fresh model over the configured rubric.
    pub fn score(&self, draft: &ReviewDraft) -> Result<ReviewSnapshot, RubricError> {
        let mut model = ReviewScoringModel::new(&self.rubric);
        for input in &draft.sections {
            let applied = match input.stars {
                Some(stars) => {
                    model.select_stars(input.key, stars).is_some()
                        && model
                            .set_comment(input.key, input.comment.clone())
                            .is_some()
                }
                None => model
                    .update_section(input.key, input.score.unwrap_or(0.0), input.comment.clone())
                    .is_some(),
            };
            if !applied {
                return Err(RubricError::UnknownSection(input.key.to_string()));
            }
        }
        model.set_final_comment(draft.final_comment.clone());
        Ok(model.snapshot())
    }

    pub async fn report(
        &self,
        id: &FundraisingId,
        draft: &ReviewDraft,
    ) -> Result<ReviewReport, ReviewServiceError> {
        let campaign = self.queue.campaign(id).await?;
        let snapshot = self.score(draft)?;
        Ok(ReviewReport::build(id.clone(), campaign.title, &snapshot))
    }

    pub async fn submit(
        &self,
        id: &FundraisingId,
        draft: &ReviewDraft,
    ) -> Result<CreateReviewRequest, ReviewServiceError> {
        let campaign = self.queue.campaign(id).await?;
        let snapshot = self.score(draft)?;
        let submission = self.submission(id);
        Ok(submission
            .submit(id.clone(), &campaign.title, &snapshot)
            .await?)
    }

    /// Submission guard for `id`, created on first use.
    pub fn submission(&self, id: &FundraisingId) -> Arc<ReviewSubmission<R, N>> {
        let mut submissions = self
            .submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        submissions
            .entry(id.clone())
            .or_insert_with(|| {
                Arc::new(ReviewSubmission::new(
                    self.reviews.clone(),
                    self.notifier.clone(),
                ))
            })
            .clone()
    }

    pub async fn pending(&self, page: usize) -> Result<Page<PendingReview>, ReviewServiceError> {
        Ok(self.queue.pending(page).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Rubric(#[from] RubricError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
