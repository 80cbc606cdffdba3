//! Admin review of campaigns submitted for archival.
//!
//! A [`rubric`] defines the weighted sections, [`scoring`] holds the
//! admin's draft and derives percentages and labels, [`summary`] renders the
//! text preview, and [`submission`] sends the finished review on.

pub mod queue;
pub mod router;
pub mod rubric;
pub mod scoring;
pub mod service;
pub mod submission;
pub mod summary;

#[cfg(test)]
mod tests;

pub use queue::{PendingReview, ReviewQueue};
pub use router::review_router;
pub use rubric::{ReviewRubric, RubricError, SectionDefinition, SectionKey};
pub use scoring::{
    format_number, percentage, round1, OverallRating, ReviewScoringModel, ReviewSection,
    ReviewSnapshot, SectionRating, MAX_STARS,
};
pub use service::{
    ReviewDraft, ReviewReport, ReviewService, ReviewServiceError, SectionInput, SectionScore,
};
pub use submission::{CreateReviewRequest, ReviewGateway, ReviewSubmission, SubmissionError};
pub use summary::ReviewSummaryGenerator;
