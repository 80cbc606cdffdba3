use std::sync::Arc;

use crate::config::ReviewConfig;
use crate::workflows::fundraising::{FundraisingId, FundraisingStatus, GatewayError, Severity};
use crate::workflows::review::rubric::{ReviewRubric, RubricError, SectionKey};
use crate::workflows::review::scoring::{OverallRating, SectionRating};
use crate::workflows::review::service::{
    ReviewDraft, ReviewService, ReviewServiceError, SectionInput,
};
use crate::workflows::review::submission::SubmissionError;

use super::common::*;

#[test]
fn stars_take_precedence_over_raw_scores() {
    let harness = harness(12);
    let draft = ReviewDraft {
        sections: vec![SectionInput {
            key: SectionKey::BasicInfo,
            score: Some(0.06),
            stars: Some(4),
            comment: "Solid".to_string(),
        }],
        final_comment: String::new(),
    };

    let snapshot = harness.service.score(&draft).expect("draft scores");
    let basic = snapshot.section(SectionKey::BasicInfo).expect("basic info");

    assert!((basic.score - 0.24).abs() < 1e-9);
    assert_eq!(basic.comment, "Solid");
    assert_eq!(basic.star_rating(), 4);
}

#[test]
fn missing_section_in_custom_rubric_is_rejected() {
    let harness = harness(12);
    let mut sections = ReviewRubric::standard().sections().to_vec();
    sections.retain(|section| section.key != SectionKey::Documentation);
    sections[0].max_score = 0.6;
    let rubric = ReviewRubric::new(sections).expect("weights sum to one");

    let service = Arc::try_unwrap(harness.service)
        .ok()
        .expect("sole owner")
        .with_rubric(rubric);

    let draft = ReviewDraft {
        sections: vec![scored(SectionKey::Documentation, 0.1, "")],
        final_comment: String::new(),
    };

    assert_eq!(
        service.score(&draft),
        Err(RubricError::UnknownSection("documentation".to_string()))
    );
}

#[tokio::test]
async fn report_carries_labels_and_summary() {
    let harness = harness(12);
    let id = FundraisingId("f-1".into());

    let report = harness
        .service
        .report(&id, &strong_draft())
        .await
        .expect("report builds");

    assert_eq!(report.title, "Drones for unit f-1");
    assert_eq!(report.overall_percentage, 90.0);
    assert_eq!(report.overall_rating, OverallRating::Excellent);
    assert_eq!(report.overall_severity, Severity::Success);
    assert_eq!(report.sections.len(), 4);
    assert_eq!(report.sections[2].rating, SectionRating::Good);
    assert_eq!(report.sections[2].percentage, 75.0);
    assert_eq!(report.sections[2].label, "Good");
    assert!(report
        .summary
        .starts_with("Review Summary for \"Drones for unit f-1\"\n\nTotal Rating: 90% (0.9/1)"));
    assert!(report.summary.ends_with("Final Comment:\nReady to archive"));
}

#[tokio::test]
async fn report_for_unknown_campaign_is_not_found() {
    let harness = harness(12);

    let err = harness
        .service
        .report(&FundraisingId("missing".into()), &strong_draft())
        .await
        .expect_err("campaign is unknown");

    assert!(matches!(
        err,
        ReviewServiceError::Gateway(GatewayError::NotFound)
    ));
}

#[tokio::test]
async fn submit_uses_campaign_title_and_forwards_request() {
    let harness = harness(12);

    let request = harness
        .service
        .submit(&FundraisingId("f-2".into()), &strong_draft())
        .await
        .expect("submission succeeds");

    assert!(request.summary.contains("\"Drones for unit f-2\""));
    assert_eq!(request.final_comment, "Ready to archive");
    assert_eq!(harness.reviews.created().len(), 1);
    assert_eq!(
        harness.notifier.events()[0].message,
        "Review submitted successfully"
    );
}

#[tokio::test]
async fn submit_of_empty_draft_is_unrated() {
    let harness = harness(12);

    let err = harness
        .service
        .submit(&FundraisingId("f-1".into()), &ReviewDraft::default())
        .await
        .expect_err("nothing scored");

    assert!(matches!(
        err,
        ReviewServiceError::Submission(SubmissionError::Unrated)
    ));
    assert!(harness.reviews.created().is_empty());
}

#[tokio::test]
async fn pending_lists_only_campaigns_awaiting_review() {
    let harness = harness(2);

    let first = harness.service.pending(0).await.expect("first page");
    let second = harness.service.pending(1).await.expect("second page");

    assert_eq!(first.total, 3);
    assert_eq!(first.total_pages(), 2);
    let ids: Vec<_> = first
        .items
        .iter()
        .chain(second.items.iter())
        .map(|item| item.fundraising_id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["f-1", "f-2", "f-3"]);
    assert_eq!(first.items[0].report_count, 1);
    assert!(harness.fundraisings.updates().is_empty());
}

#[tokio::test]
async fn concurrent_submit_for_same_campaign_is_busy() {
    let fundraisings = Arc::new(MemoryGateway::with_records(vec![fundraising(
        "f-1",
        FundraisingStatus::ReadyForReview,
    )]));
    let reviews = Arc::new(GatedReviewGateway::default());
    let service = ReviewService::new(
        fundraisings,
        reviews.clone(),
        Arc::new(RecordingNotifier::default()),
        &ReviewConfig::default(),
    );
    let id = FundraisingId("f-1".into());
    let draft = strong_draft();

    let first = service.submit(&id, &draft);
    let second = async {
        reviews.entered.notified().await;
        let outcome = service.submit(&id, &draft).await;
        reviews.release.notify_one();
        outcome
    };

    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok());
    assert!(matches!(
        second,
        Err(ReviewServiceError::Submission(SubmissionError::Busy))
    ));
    assert_eq!(reviews.calls(), 1);
    assert!(!service.submission(&id).is_submitting());
}
