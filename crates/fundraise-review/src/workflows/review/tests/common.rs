use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

pub(crate) use crate::workflows::fundraising::tests::common::{
    fundraising, read_json_body, MemoryGateway, RecordingNotifier,
};
use crate::config::ReviewConfig;
use crate::workflows::fundraising::{FundraisingStatus, GatewayError};
use crate::workflows::review::rubric::SectionKey;
use crate::workflows::review::service::{ReviewDraft, ReviewService, SectionInput};
use crate::workflows::review::submission::{CreateReviewRequest, ReviewGateway};

#[derive(Default)]
pub(crate) struct MemoryReviewGateway {
    created: Mutex<Vec<CreateReviewRequest>>,
    failure: Mutex<Option<GatewayError>>,
}

impl MemoryReviewGateway {
    pub(crate) fn fail_with(&self, error: GatewayError) {
        *self.failure.lock().expect("failure mutex poisoned") = Some(error);
    }

    pub(crate) fn created(&self) -> Vec<CreateReviewRequest> {
        self.created.lock().expect("created mutex poisoned").clone()
    }
}

#[async_trait]
impl ReviewGateway for MemoryReviewGateway {
    async fn create_review(&self, request: CreateReviewRequest) -> Result<(), GatewayError> {
        if let Some(error) = self.failure.lock().expect("failure mutex poisoned").clone() {
            return Err(error);
        }
        self.created
            .lock()
            .expect("created mutex poisoned")
            .push(request);
        Ok(())
    }
}

/// Review gateway that parks until the test releases it.
#[derive(Default)]
pub(crate) struct GatedReviewGateway {
    pub(crate) entered: Notify,
    pub(crate) release: Notify,
    calls: AtomicUsize,
}

impl GatedReviewGateway {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewGateway for GatedReviewGateway {
    async fn create_review(&self, _request: CreateReviewRequest) -> Result<(), GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

pub(crate) type TestReviewService =
    ReviewService<MemoryGateway, MemoryReviewGateway, RecordingNotifier>;

pub(crate) struct Harness {
    pub(crate) fundraisings: Arc<MemoryGateway>,
    pub(crate) reviews: Arc<MemoryReviewGateway>,
    pub(crate) notifier: Arc<RecordingNotifier>,
    pub(crate) service: Arc<TestReviewService>,
}

pub(crate) fn harness(page_size: usize) -> Harness {
    let fundraisings = Arc::new(MemoryGateway::with_records(vec![
        fundraising("f-1", FundraisingStatus::ReadyForReview),
        fundraising("f-2", FundraisingStatus::ReadyForReview),
        fundraising("f-3", FundraisingStatus::ReadyForReview),
        fundraising("f-4", FundraisingStatus::Open),
        fundraising("f-5", FundraisingStatus::Closed),
    ]));
    let reviews = Arc::new(MemoryReviewGateway::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = Arc::new(ReviewService::new(
        fundraisings.clone(),
        reviews.clone(),
        notifier.clone(),
        &ReviewConfig {
            queue_page_size: page_size,
        },
    ));
    Harness {
        fundraisings,
        reviews,
        notifier,
        service,
    }
}

pub(crate) fn scored(key: SectionKey, score: f64, comment: &str) -> SectionInput {
    SectionInput {
        key,
        score: Some(score),
        stars: None,
        comment: comment.to_string(),
    }
}

/// 0.3 + 0.2 + 0.15 + 0.25 = 0.9 of 1.0.
pub(crate) fn strong_draft() -> ReviewDraft {
    ReviewDraft {
        sections: vec![
            scored(SectionKey::BasicInfo, 0.3, "Clear and honest"),
            scored(SectionKey::VisualContent, 0.2, ""),
            scored(SectionKey::FinancialSetup, 0.15, "Goal is a bit high"),
            scored(SectionKey::Documentation, 0.25, ""),
        ],
        final_comment: "Ready to archive".to_string(),
    }
}
