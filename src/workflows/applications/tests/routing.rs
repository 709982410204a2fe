use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use crate::caller::{HOSTEL_ID_HEADER, ROLE_ID_HEADER, USER_ID_HEADER};
use crate::workflows::applications::application_router;
use crate::workflows::applications::domain::{ApplicationId, ApplicationStatus};

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

fn owner_request(method: &str, uri: &str, hostel: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header(USER_ID_HEADER, "21")
        .header(ROLE_ID_HEADER, "2")
        .header(HOSTEL_ID_HEADER, hostel)
        .body(body)
        .expect("request builds")
}

#[tokio::test]
async fn public_registration_returns_created() {
    let repository = Arc::new(MemoryApplications::with_hostels(&[1]));
    let router = application_router(Arc::new(service(repository.clone())));

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/public/register-student")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"hostel_id":1,"first_name":"Kiran","last_name":"Das","phone":"98765"}"#,
        ))
        .expect("request builds");
    let response = router.oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["application_id"], 1);
}

#[tokio::test]
async fn registration_with_missing_fields_is_bad_request() {
    let repository = Arc::new(MemoryApplications::with_hostels(&[1]));
    let router = application_router(Arc::new(service(repository)));

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/public/register-student")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"hostel_id":1,"first_name":"Kiran"}"#))
        .expect("request builds");
    let response = router.oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(
        body["error"],
        "Required fields: hostel_id, first_name, last_name, phone"
    );
}

#[tokio::test]
async fn approve_without_body_uses_defaults() {
    let repository = Arc::new(MemoryApplications::with_hostels(&[1]));
    let id = seed(&repository, 1, at(10, 9));
    let router = application_router(Arc::new(service(repository.clone())));

    let response = router
        .oneshot(owner_request(
            "POST",
            &format!("/api/v1/applications/{}/approve", id.0),
            "1",
            Body::empty(),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Application approved and student created");
    assert_eq!(
        repository.get(id).map(|a| a.status),
        Some(ApplicationStatus::Approved)
    );
}

#[tokio::test]
async fn foreign_owner_gets_forbidden() {
    let repository = Arc::new(MemoryApplications::with_hostels(&[1, 2]));
    let id = seed(&repository, 2, at(10, 9));
    let router = application_router(Arc::new(service(repository.clone())));

    let response = router
        .oneshot(owner_request(
            "POST",
            &format!("/api/v1/applications/{}/reject", id.0),
            "1",
            Body::from(r#"{"rejection_reason":"duplicate"}"#),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = read_json(response).await;
    assert_eq!(
        body["error"],
        "You do not have permission to reject this application"
    );
    assert_eq!(
        repository.get(ApplicationId(id.0)).map(|a| a.status),
        Some(ApplicationStatus::Pending)
    );
}

#[tokio::test]
async fn pending_listing_requires_identity() {
    let repository = Arc::new(MemoryApplications::with_hostels(&[1]));
    let router = application_router(Arc::new(service(repository)));

    let request = Request::builder()
        .uri("/api/v1/applications/pending")
        .body(Body::empty())
        .expect("request builds");
    let response = router.oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
