use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use crate::caller::{HOSTEL_ID_HEADER, ROLE_ID_HEADER, USER_ID_HEADER};
use crate::spreadsheet::XLSX_CONTENT_TYPE;
use crate::workflows::income::income_router;

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

fn owner_request(method: &str, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header(USER_ID_HEADER, "5")
        .header(ROLE_ID_HEADER, "2")
        .header(HOSTEL_ID_HEADER, "1")
        .body(body)
        .expect("request builds")
}

#[tokio::test]
async fn create_returns_created_id() {
    let repository = Arc::new(MemoryIncome::with_modes());
    let router = income_router(Arc::new(service(repository.clone())));

    let body = r#"{"income_date":"2025-11-03","amount":"450.00","source":"Mess","payment_mode_id":2}"#;
    let response = router
        .oneshot(owner_request("POST", "/api/v1/income", Body::from(body)))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;
    assert_eq!(json["message"], "Income recorded successfully");
    assert_eq!(json["data"]["income_id"], 1);
}

#[tokio::test]
async fn summary_is_not_taken_for_an_income_id() {
    let repository = Arc::new(MemoryIncome::with_modes());
    repository.seed(1, input("Mess", 100, day(3)));
    let router = income_router(Arc::new(service(repository)));

    let response = router
        .oneshot(owner_request("GET", "/api/v1/income/summary", Body::empty()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"][0]["source"], "Mess");
    assert_eq!(json["data"][0]["count"], 1);
}

#[tokio::test]
async fn analytics_without_date_is_bad_request() {
    let router = income_router(Arc::new(service(Arc::new(MemoryIncome::with_modes()))));

    let response = router
        .oneshot(owner_request(
            "GET",
            "/api/v1/income/analytics?type=week",
            Body::empty(),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Date and Type required");
}

#[tokio::test]
async fn export_is_served_as_attachment() {
    let repository = Arc::new(MemoryIncome::with_modes());
    repository.seed(1, input("Mess", 100, day(3)));
    let router = income_router(Arc::new(service(repository)));

    let response = router
        .oneshot(owner_request(
            "GET",
            "/api/v1/income/export?startDate=2025-11-01&endDate=2025-11-30",
            Body::empty(),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        XLSX_CONTENT_TYPE
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Income_Report_2025-11-01_to_2025-11-30.xlsx\""
    );
}

#[tokio::test]
async fn delete_of_missing_record_is_not_found() {
    let router = income_router(Arc::new(service(Arc::new(MemoryIncome::with_modes()))));

    let response = router
        .oneshot(owner_request("DELETE", "/api/v1/income/42", Body::empty()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["error"], "Income record not found");
}
