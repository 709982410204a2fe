use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::job::{DailyReportJob, ReportError};
use crate::caller::{AccessError, Caller};
use crate::domain::Role;
use crate::error::failure;

#[derive(Debug, Deserialize)]
pub struct TriggerRequest {
    pub email: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Admin endpoint running the report for every hostel against one address.
pub fn report_router(job: Arc<DailyReportJob>) -> Router {
    Router::new()
        .route("/api/v1/reports/daily/trigger", post(trigger_handler))
        .with_state(job)
}

pub(crate) async fn trigger_handler(
    State(job): State<Arc<DailyReportJob>>,
    caller: Caller,
    Json(request): Json<TriggerRequest>,
) -> Response {
    if caller.role != Role::Admin {
        return AccessError::Forbidden("Only admins can trigger the daily report.").into_response();
    }

    let date = request.date.unwrap_or_else(|| Local::now().date_naive());
    match job.run_manual_cycle(&request.email, date).await {
        Ok(summary) => {
            let payload = json!({
                "success": true,
                "message": format!("Daily report sent to {}", request.email.trim()),
                "data": summary,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(ReportError::BlankOverride) => failure(StatusCode::BAD_REQUEST, "email is required"),
        Err(other) => failure(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}
