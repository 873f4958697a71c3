use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::AllowlistRecordId;
use super::repository::{AllowlistRepository, AllowlistRepositoryError};
use super::service::{AllowlistService, AllowlistServiceError};
use crate::workflows::admissions::notifications::NotificationDispatcher;

/// Router builder exposing HTTP endpoints for the phone allowlist.
pub fn allowlist_router<R, N>(service: Arc<AllowlistService<R, N>>) -> Router
where
    R: AllowlistRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    Router::new()
        .route("/api/v1/allowlist/phones", post(approve_handler::<R, N>))
        .route(
            "/api/v1/allowlist/phones/:record_id/change",
            post(change_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApproveRequest {
    pub phone_number: String,
    pub approver_id: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChangeRequest {
    pub new_phone_number: String,
    pub reason: String,
    pub actor_id: String,
}

pub(crate) async fn approve_handler<R, N>(
    State(service): State<Arc<AllowlistService<R, N>>>,
    axum::Json(request): axum::Json<ApproveRequest>,
) -> Response
where
    R: AllowlistRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    match service.approve_phone(&request.phone_number, &request.approver_id, request.notes) {
        Ok(approval) => {
            let status = if approval.newly_approved {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, axum::Json(approval.record)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn change_handler<R, N>(
    State(service): State<Arc<AllowlistService<R, N>>>,
    Path(record_id): Path<String>,
    axum::Json(request): axum::Json<ChangeRequest>,
) -> Response
where
    R: AllowlistRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let id = AllowlistRecordId(record_id);
    match service.change_approved_phone(
        &id,
        &request.new_phone_number,
        &request.reason,
        &request.actor_id,
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AllowlistServiceError) -> Response {
    let AllowlistServiceError::Repository(repository_error) = &error;
    let status = match repository_error {
        AllowlistRepositoryError::NotFound => StatusCode::NOT_FOUND,
        AllowlistRepositoryError::DuplicatePhone => StatusCode::CONFLICT,
        AllowlistRepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
