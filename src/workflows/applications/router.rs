use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ApplicationId, ApplicationSubmission, ApprovalRequest, RejectionRequest};
use super::repository::ApplicationRepository;
use super::service::ApplicationService;
use crate::caller::Caller;

/// Public registration plus the authenticated review endpoints.
pub fn application_router<R>(service: Arc<ApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/public/register-student", post(submit_handler::<R>))
        .route("/api/v1/applications/pending", get(pending_handler::<R>))
        .route(
            "/api/v1/applications/:application_id/approve",
            post(approve_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/reject",
            post(reject_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Json(submission): Json<ApplicationSubmission>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.submit(submission).await {
        Ok(application_id) => {
            let payload = json!({
                "success": true,
                "message": "Application submitted successfully",
                "data": { "application_id": application_id },
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn pending_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    caller: Caller,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.pending(&caller).await {
        Ok(applications) => {
            let payload = json!({ "success": true, "data": applications });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn approve_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    caller: Caller,
    Path(application_id): Path<i64>,
    body: Option<Json<ApprovalRequest>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let request = body.map(|Json(request)| request).unwrap_or_default();
    match service
        .approve(&caller, ApplicationId(application_id), request)
        .await
    {
        Ok(student_id) => {
            let payload = json!({
                "success": true,
                "message": "Application approved and student created",
                "data": { "student_id": student_id },
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn reject_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    caller: Caller,
    Path(application_id): Path<i64>,
    body: Option<Json<RejectionRequest>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let request = body.map(|Json(request)| request).unwrap_or_default();
    match service
        .reject(&caller, ApplicationId(application_id), request)
        .await
    {
        Ok(()) => {
            let payload = json!({ "success": true, "message": "Application rejected" });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
