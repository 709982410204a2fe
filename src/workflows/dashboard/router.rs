use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::service::DashboardService;
use super::DashboardRepository;
use crate::caller::Caller;
use crate::domain::HostelId;
use crate::error::failure;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub hostel_id: Option<i64>,
}

pub fn dashboard_router<R>(service: Arc<DashboardService<R>>) -> Router
where
    R: DashboardRepository + 'static,
{
    Router::new()
        .route("/api/v1/dashboard/owner-stats", get(owner_stats_handler::<R>))
        .with_state(service)
}

pub(crate) async fn owner_stats_handler<R>(
    State(service): State<Arc<DashboardService<R>>>,
    caller: Caller,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    R: DashboardRepository + 'static,
{
    let hostel = match caller.resolve_hostel(query.hostel_id.map(HostelId)) {
        Ok(Some(hostel)) => hostel,
        Ok(None) => return failure(StatusCode::BAD_REQUEST, "Hostel ID required"),
        Err(err) => return err.into_response(),
    };

    match service.owner_stats(hostel, Local::now().date_naive()).await {
        Ok(stats) => {
            let payload = json!({ "success": true, "data": stats });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            error!(%hostel, error = %err, "owner dashboard stats failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch dashboard stats",
            )
        }
    }
}
