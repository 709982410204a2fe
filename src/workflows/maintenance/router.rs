use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::domain::IssueSubmission;
use super::service::{MaintenanceRepository, MaintenanceService};
use crate::caller::Caller;

pub fn maintenance_router<R>(service: Arc<MaintenanceService<R>>) -> Router
where
    R: MaintenanceRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/maintenance",
            get(list_handler::<R>).post(report_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<MaintenanceService<R>>>,
    caller: Caller,
    Json(submission): Json<IssueSubmission>,
) -> Response
where
    R: MaintenanceRepository + 'static,
{
    match service.report(&caller, submission).await {
        Ok(issue) => {
            let payload = json!({
                "success": true,
                "message": "Maintenance issue created successfully",
                "data": issue,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<MaintenanceService<R>>>,
    caller: Caller,
) -> Response
where
    R: MaintenanceRepository + 'static,
{
    match service.list(&caller).await {
        Ok(issues) => Json(json!({ "success": true, "data": issues })).into_response(),
        Err(err) => err.into_response(),
    }
}
