use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::documents::required_documents;
use super::domain::{
    AdmissionLevel, ApplicationId, ApplicationIntake, MaritalStatus, ReviewerRole,
};
use super::notifications::NotificationDispatcher;
use super::repository::{ApplicationRepository, ApplicationStatusView, RepositoryError};
use super::rules::{ReviewAction, ReviewPayload, TransitionError};
use super::service::{ReviewService, ReviewServiceError};

/// Router builder exposing HTTP endpoints for intake, review, and the
/// document checklist.
pub fn admissions_router<R, N>(service: Arc<ReviewService<R, N>>) -> Router
where
    R: ApplicationRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    Router::new()
        .route("/api/v1/admissions/applications", post(intake_handler::<R, N>))
        .route(
            "/api/v1/admissions/applications/:application_id",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/admissions/applications/:application_id/review",
            post(review_handler::<R, N>),
        )
        .route(
            "/api/v1/admissions/checklist/:level/:marital_status",
            get(checklist_handler),
        )
        .with_state(service)
}

/// Body of a review submission: actor identity plus the action payload.
#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    pub actor_role: ReviewerRole,
    pub actor_id: String,
    #[serde(flatten)]
    pub action: ReviewAction,
    #[serde(flatten)]
    pub payload: ReviewPayload,
}

#[derive(Debug, Serialize)]
struct ReviewResponse {
    application: ApplicationStatusView,
    notification: &'static str,
}

pub(crate) async fn intake_handler<R, N>(
    State(service): State<Arc<ReviewService<R, N>>>,
    axum::Json(intake): axum::Json<ApplicationIntake>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    match service.submit(intake) {
        Ok(application) => {
            let view = ApplicationStatusView::from_application(&application);
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(ReviewServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "application already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<ReviewService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(application) => {
            let view = ApplicationStatusView::from_application(&application);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(ReviewServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "application not found", "application_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn review_handler<R, N>(
    State(service): State<Arc<ReviewService<R, N>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let id = ApplicationId(application_id);
    let outcome = service.submit_review(
        &id,
        request.actor_role,
        &request.actor_id,
        &request.action,
        &request.payload,
    );

    match outcome {
        Ok(outcome) => {
            let notification = match outcome.dispatch {
                super::notifications::DispatchOutcome::Delivered => "delivered",
                super::notifications::DispatchOutcome::Failed => "failed",
            };
            let body = ReviewResponse {
                application: ApplicationStatusView::from_application(&outcome.application),
                notification,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(ReviewServiceError::Transition(error @ TransitionError::InvalidRoleForState { .. })) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        Err(ReviewServiceError::Transition(error @ TransitionError::MissingRequiredField { .. })) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ReviewServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "application not found", "application_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(ReviewServiceError::Repository(RepositoryError::ConcurrentModification)) => {
            let payload = json!({
                "error": "application changed since it was loaded; reload and retry",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn checklist_handler(
    Path((level, marital_status)): Path<(String, String)>,
) -> Response {
    let Some(level) = parse_level(&level) else {
        let payload = json!({ "error": format!("unknown admission level '{level}'") });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };
    let Some(marital_status) = parse_marital_status(&marital_status) else {
        let payload = json!({ "error": format!("unknown marital status '{marital_status}'") });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };

    let required: Vec<&'static str> = required_documents(level, marital_status)
        .into_iter()
        .map(|doc| doc.label())
        .collect();
    let payload = json!({
        "admission_level": level.label(),
        "marital_status": marital_status.label(),
        "required_documents": required,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) fn parse_level(raw: &str) -> Option<AdmissionLevel> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "licensing" => Some(AdmissionLevel::Licensing),
        "recognition" => Some(AdmissionLevel::Recognition),
        "ordination" => Some(AdmissionLevel::Ordination),
        _ => None,
    }
}

pub(crate) fn parse_marital_status(raw: &str) -> Option<MaritalStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "single" => Some(MaritalStatus::Single),
        "married" => Some(MaritalStatus::Married),
        "widowed" => Some(MaritalStatus::Widowed),
        "divorced" => Some(MaritalStatus::Divorced),
        _ => None,
    }
}

fn internal_error(error: ReviewServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
