use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use crate::caller::{Caller, HOSTEL_ID_HEADER, ROLE_ID_HEADER, USER_ID_HEADER};
use crate::workflows::maintenance::service::HIGH_PRIORITY_TITLE;
use crate::workflows::maintenance::{maintenance_router, IssueSubmission, MaintenanceError};

fn submission(priority: &str) -> IssueSubmission {
    IssueSubmission {
        room: Some("204".to_string()),
        title: Some("Leaking tap".to_string()),
        priority: Some(priority.to_string()),
        ..IssueSubmission::default()
    }
}

#[tokio::test]
async fn high_priority_issue_alerts_owners() {
    let repository = Arc::new(MemoryIssues::default());
    let gateway = Arc::new(RecordingGateway::default());
    let service = service(repository.clone(), gateway.clone());

    let issue = service
        .report(&Caller::owner(5, Some(1)), submission("High"))
        .await
        .expect("issue stored");

    assert_eq!(issue.status, "Open");
    let messages = gateway.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, "ExpoPushToken[owner-101]");
    assert_eq!(messages[0].title, HIGH_PRIORITY_TITLE);
    assert_eq!(messages[0].body, "Room 204 - Leaking tap");
    assert_eq!(messages[0].data["screen"], "Maintenance");
    assert_eq!(messages[0].data["issueId"], issue.id.0);
}

#[tokio::test]
async fn routine_issue_sends_no_alert() {
    let gateway = Arc::new(RecordingGateway::default());
    let service = service(Arc::new(MemoryIssues::default()), gateway.clone());

    service
        .report(&Caller::owner(5, Some(1)), submission("Medium"))
        .await
        .expect("issue stored");

    assert!(gateway.messages().is_empty());
}

#[tokio::test]
async fn alert_failure_does_not_fail_the_report() {
    let repository = Arc::new(MemoryIssues::default());
    let gateway = Arc::new(RecordingGateway {
        down: true,
        ..RecordingGateway::default()
    });
    let service = service(repository.clone(), gateway);

    let result = service
        .report(&Caller::owner(5, Some(1)), submission("High"))
        .await;

    assert!(result.is_ok());
    assert_eq!(repository.issues.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn reporter_without_hostel_is_rejected() {
    let repository = Arc::new(MemoryIssues::default());
    let service = service(repository.clone(), Arc::new(RecordingGateway::default()));

    let err = service
        .report(&Caller::admin(1), submission("High"))
        .await
        .expect_err("no hostel");
    assert!(matches!(err, MaintenanceError::Invalid(_)));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert!(repository.issues.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn owners_list_only_their_hostel() {
    let repository = Arc::new(MemoryIssues::default());
    let service = service(repository, Arc::new(RecordingGateway::default()));
    service
        .report(&Caller::owner(5, Some(1)), submission("Low"))
        .await
        .expect("stored");
    service
        .report(&Caller::owner(6, Some(2)), submission("Low"))
        .await
        .expect("stored");

    let listed = service
        .list(&Caller::owner(5, Some(1)))
        .await
        .expect("listed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].hostel_id.0, 1);
    assert_eq!(service.list(&Caller::admin(1)).await.expect("all").len(), 2);
}

#[tokio::test]
async fn post_without_priority_is_bad_request() {
    let service = service(
        Arc::new(MemoryIssues::default()),
        Arc::new(RecordingGateway::default()),
    );
    let router = maintenance_router(Arc::new(service));

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/maintenance")
        .header("content-type", "application/json")
        .header(USER_ID_HEADER, "5")
        .header(ROLE_ID_HEADER, "2")
        .header(HOSTEL_ID_HEADER, "1")
        .body(Body::from(r#"{"room":"12","title":"Broken fan"}"#))
        .expect("request builds");
    let response = router.oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body["error"], "Missing required fields");
}
