use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::scoring::{ReviewSection, ReviewSnapshot};
use super::summary::ReviewSummaryGenerator;
use crate::workflows::fundraising::{FundraisingId, GatewayError, Notification, NotificationSink};

const SUBMITTED: &str = "Review submitted successfully";
const SUBMIT_FAILED: &str = "Failed to submit review";

/// Payload persisted by the review service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub fundraising_id: FundraisingId,
    pub total_score: f64,
    pub max_total_score: f64,
    pub sections: Vec<ReviewSection>,
    pub final_comment: String,
    pub summary: String,
    pub submitted_at: DateTime<Utc>,
}

impl CreateReviewRequest {
    pub fn from_snapshot(
        fundraising_id: FundraisingId,
        campaign_title: &str,
        snapshot: &ReviewSnapshot,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            fundraising_id,
            total_score: snapshot.total_score(),
            max_total_score: snapshot.max_total_score(),
            sections: snapshot.sections.clone(),
            final_comment: snapshot.final_comment.trim().to_string(),
            summary: ReviewSummaryGenerator::generate(campaign_title, snapshot),
            submitted_at,
        }
    }
}

#[async_trait]
pub trait ReviewGateway: Send + Sync {
    async fn create_review(&self, request: CreateReviewRequest) -> Result<(), GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("review has no scores yet")]
    Unrated,
    #[error("a review submission is already in flight")]
    Busy,
    #[error("{0}")]
    Remote(String),
}

/// Sends a finished review to the review service, one submission at a time.
pub struct ReviewSubmission<G: ?Sized, N: ?Sized> {
    gateway: Arc<G>,
    notifier: Arc<N>,
    submitting: AtomicBool,
}

impl<G, N> ReviewSubmission<G, N>
where
    G: ReviewGateway + ?Sized,
    N: NotificationSink + ?Sized,
{
    pub fn new(gateway: Arc<G>, notifier: Arc<N>) -> Self {
        Self {
            gateway,
            notifier,
            submitting: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub async fn submit(
        &self,
        fundraising_id: FundraisingId,
        campaign_title: &str,
        snapshot: &ReviewSnapshot,
    ) -> Result<CreateReviewRequest, SubmissionError> {
        if !snapshot.is_rated() {
            return Err(SubmissionError::Unrated);
        }

        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(%fundraising_id, "review submission rejected: another is in flight");
            return Err(SubmissionError::Busy);
        }
        let _reset = ClearOnDrop(&self.submitting);

        let request =
            CreateReviewRequest::from_snapshot(fundraising_id, campaign_title, snapshot, Utc::now());

        info!(
            fundraising_id = %request.fundraising_id,
            total_score = request.total_score,
            "submitting review"
        );

        match self.gateway.create_review(request.clone()).await {
            Ok(()) => {
                self.notifier.publish(Notification::success(SUBMITTED));
                Ok(request)
            }
            Err(err) => {
                warn!(
                    fundraising_id = %request.fundraising_id,
                    error = %err,
                    "review submission failed"
                );
                let message = err.user_message(SUBMIT_FAILED);
                self.notifier.publish(Notification::error(message.clone()));
                Err(SubmissionError::Remote(message))
            }
        }
    }
}

struct ClearOnDrop<'a>(&'a AtomicBool);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
