use crate::infra::{AppServices, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use hostel_ops::workflows::applications::application_router;
use hostel_ops::workflows::daily_report::report_router;
use hostel_ops::workflows::dashboard::dashboard_router;
use hostel_ops::workflows::income::income_router;
use hostel_ops::workflows::maintenance::maintenance_router;
use serde_json::json;

/// Every workflow's routes merged into one router.
pub(crate) fn workflow_routes(services: &AppServices) -> Router {
    Router::new()
        .merge(report_router(services.reports.clone()))
        .merge(application_router(services.applications.clone()))
        .merge(dashboard_router(services.dashboard.clone()))
        .merge(income_router(services.income.clone()))
        .merge(maintenance_router(services.maintenance.clone()))
}

pub(crate) fn with_ops_routes(router: Router) -> Router {
    router
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
