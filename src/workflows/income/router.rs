use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{DateRange, IncomeId, IncomeInput};
use super::repository::IncomeRepository;
use super::service::IncomeService;
use crate::caller::Caller;
use crate::domain::HostelId;
use crate::spreadsheet::XLSX_CONTENT_TYPE;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RangeQuery {
    fn range(&self) -> Option<DateRange> {
        Some(DateRange::new(self.start_date?, self.end_date?))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    #[serde(rename = "type")]
    pub period: Option<String>,
    pub date: Option<NaiveDate>,
    pub hostel_id: Option<i64>,
}

pub fn income_router<R>(service: Arc<IncomeService<R>>) -> Router
where
    R: IncomeRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/income",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route("/api/v1/income/summary", get(summary_handler::<R>))
        .route("/api/v1/income/analytics", get(analytics_handler::<R>))
        .route("/api/v1/income/export", get(export_handler::<R>))
        .route(
            "/api/v1/income/:income_id",
            put(update_handler::<R>).delete(delete_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<IncomeService<R>>>,
    caller: Caller,
    Query(query): Query<RangeQuery>,
) -> Response
where
    R: IncomeRepository + 'static,
{
    match service.list(&caller, query.range()).await {
        Ok(records) => Json(json!({ "success": true, "data": records })).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<IncomeService<R>>>,
    caller: Caller,
    Json(input): Json<IncomeInput>,
) -> Response
where
    R: IncomeRepository + 'static,
{
    match service.create(&caller, input).await {
        Ok(income_id) => {
            let payload = json!({
                "success": true,
                "message": "Income recorded successfully",
                "data": { "income_id": income_id },
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<IncomeService<R>>>,
    caller: Caller,
    Path(income_id): Path<i64>,
    Json(input): Json<IncomeInput>,
) -> Response
where
    R: IncomeRepository + 'static,
{
    match service.update(&caller, IncomeId(income_id), input).await {
        Ok(()) => Json(json!({ "success": true, "message": "Income updated successfully" }))
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<IncomeService<R>>>,
    caller: Caller,
    Path(income_id): Path<i64>,
) -> Response
where
    R: IncomeRepository + 'static,
{
    match service.delete(&caller, IncomeId(income_id)).await {
        Ok(()) => Json(json!({ "success": true, "message": "Income deleted successfully" }))
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<IncomeService<R>>>,
    caller: Caller,
) -> Response
where
    R: IncomeRepository + 'static,
{
    match service.summary(&caller).await {
        Ok(summary) => Json(json!({ "success": true, "data": summary })).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn analytics_handler<R>(
    State(service): State<Arc<IncomeService<R>>>,
    caller: Caller,
    Query(query): Query<AnalyticsQuery>,
) -> Response
where
    R: IncomeRepository + 'static,
{
    let requested = query.hostel_id.map(HostelId);
    match service
        .analytics(&caller, query.period.as_deref(), query.date, requested)
        .await
    {
        Ok(analytics) => Json(json!({ "success": true, "data": analytics })).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn export_handler<R>(
    State(service): State<Arc<IncomeService<R>>>,
    caller: Caller,
    Query(query): Query<RangeQuery>,
) -> Response
where
    R: IncomeRepository + 'static,
{
    match service
        .export(&caller, query.start_date, query.end_date)
        .await
    {
        Ok(export) => {
            let disposition = format!("attachment; filename=\"{}\"", export.filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                export.bytes,
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}
