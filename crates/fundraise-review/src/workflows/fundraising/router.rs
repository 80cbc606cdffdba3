use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{FundraisingId, FundraisingStatus};
use super::gateway::{FundraisingGateway, GatewayError};
use super::notify::NotificationSink;
use super::service::{FundraisingStatusService, StatusChangeResult, StatusServiceError};

#[derive(Debug, Clone, Deserialize)]
pub struct StatusChangeRequest {
    pub target_status: FundraisingStatus,
    #[serde(default)]
    pub confirmed: bool,
}

/// Router exposing the owner status lifecycle.
pub fn status_router<G, N>(service: Arc<FundraisingStatusService<G, N>>) -> Router
where
    G: FundraisingGateway + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/fundraisings/:fundraising_id/status",
            get(status_handler::<G, N>).post(change_handler::<G, N>),
        )
        .with_state(service)
}

pub(crate) async fn status_handler<G, N>(
    State(service): State<Arc<FundraisingStatusService<G, N>>>,
    Path(fundraising_id): Path<String>,
) -> Response
where
    G: FundraisingGateway + 'static,
    N: NotificationSink + 'static,
{
    let id = FundraisingId(fundraising_id);
    match service.status_view(&id).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn change_handler<G, N>(
    State(service): State<Arc<FundraisingStatusService<G, N>>>,
    Path(fundraising_id): Path<String>,
    axum::Json(request): axum::Json<StatusChangeRequest>,
) -> Response
where
    G: FundraisingGateway + 'static,
    N: NotificationSink + 'static,
{
    let id = FundraisingId(fundraising_id);
    match service
        .change_status(&id, request.target_status, request.confirmed)
        .await
    {
        Ok(StatusChangeResult::Applied { view }) => {
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Ok(StatusChangeResult::ConfirmationRequired { action }) => {
            let payload = json!({
                "error": "confirmation required",
                "confirmation_message": action.confirmation_message,
                "action": action,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: StatusServiceError) -> Response {
    let status = match &err {
        StatusServiceError::Gateway(GatewayError::NotFound) => StatusCode::NOT_FOUND,
        StatusServiceError::NotPermitted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        StatusServiceError::Guard(_) => StatusCode::CONFLICT,
        StatusServiceError::Gateway(_) | StatusServiceError::Remote(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
