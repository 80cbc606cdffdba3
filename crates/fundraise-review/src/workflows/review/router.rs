use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::service::{ReviewDraft, ReviewService, ReviewServiceError};
use super::submission::{ReviewGateway, SubmissionError};
use crate::workflows::fundraising::{FundraisingGateway, FundraisingId, GatewayError, NotificationSink};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PendingQuery {
    #[serde(default)]
    pub page: usize,
}

/// Router exposing admin review scoring, submission and the pending queue.
pub fn review_router<F, R, N>(service: Arc<ReviewService<F, R, N>>) -> Router
where
    F: FundraisingGateway + 'static,
    R: ReviewGateway + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route("/api/v1/reviews/pending", get(pending_handler::<F, R, N>))
        .route(
            "/api/v1/reviews/:fundraising_id/summary",
            post(summary_handler::<F, R, N>),
        )
        .route("/api/v1/reviews/:fundraising_id", post(submit_handler::<F, R, N>))
        .with_state(service)
}

pub(crate) async fn summary_handler<F, R, N>(
    State(service): State<Arc<ReviewService<F, R, N>>>,
    Path(fundraising_id): Path<String>,
    Json(draft): Json<ReviewDraft>,
) -> Response
where
    F: FundraisingGateway + 'static,
    R: ReviewGateway + 'static,
    N: NotificationSink + 'static,
{
    let id = FundraisingId(fundraising_id);
    match service.report(&id, &draft).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<F, R, N>(
    State(service): State<Arc<ReviewService<F, R, N>>>,
    Path(fundraising_id): Path<String>,
    Json(draft): Json<ReviewDraft>,
) -> Response
where
    F: FundraisingGateway + 'static,
    R: ReviewGateway + 'static,
    N: NotificationSink + 'static,
{
    let id = FundraisingId(fundraising_id);
    match service.submit(&id, &draft).await {
        Ok(review) => (StatusCode::CREATED, Json(review)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn pending_handler<F, R, N>(
    State(service): State<Arc<ReviewService<F, R, N>>>,
    Query(query): Query<PendingQuery>,
) -> Response
where
    F: FundraisingGateway + 'static,
    R: ReviewGateway + 'static,
    N: NotificationSink + 'static,
{
    match service.pending(query.page).await {
        Ok(page) => {
            let total_pages = page.total_pages();
            let payload = json!({
                "items": page.items,
                "page": page.page,
                "page_size": page.page_size,
                "total": page.total,
                "total_pages": total_pages,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: ReviewServiceError) -> Response {
    let status = match &err {
        ReviewServiceError::Gateway(GatewayError::NotFound) => StatusCode::NOT_FOUND,
        ReviewServiceError::Rubric(_) | ReviewServiceError::Submission(SubmissionError::Unrated) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ReviewServiceError::Submission(SubmissionError::Busy) => StatusCode::CONFLICT,
        ReviewServiceError::Gateway(_) | ReviewServiceError::Submission(SubmissionError::Remote(_)) => {
            StatusCode::BAD_GATEWAY
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
