use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Local;
use serde_json::json;
use tracing::{error, info};

use super::domain::{
    IssueId, IssueSubmission, MaintenanceIssue, MissingIssueFields, NewIssue, ISSUE_STATUS_OPEN,
};
use crate::caller::{AccessError, Caller};
use crate::domain::HostelId;
use crate::error::failure;
use crate::repository::RepositoryError;
use crate::workflows::push::PushNotifier;

pub const HIGH_PRIORITY_TITLE: &str = "🚨 High Priority Maintenance";

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Stores the issue as open.
    async fn insert(&self, issue: &NewIssue) -> Result<IssueId, RepositoryError>;

    /// Newest first.
    async fn list(&self, hostel: Option<HostelId>) -> Result<Vec<MaintenanceIssue>, RepositoryError>;
}

pub struct MaintenanceService<R> {
    repository: Arc<R>,
    notifier: Arc<PushNotifier>,
}

impl<R> MaintenanceService<R>
where
    R: MaintenanceRepository + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<PushNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Record an issue for the reporter's hostel and alert owners when it is urgent.
    pub async fn report(
        &self,
        caller: &Caller,
        submission: IssueSubmission,
    ) -> Result<MaintenanceIssue, MaintenanceError> {
        let issue = submission.validate(
            caller.hostel_id,
            caller.user_id,
            Local::now().naive_local(),
        )?;
        let id = self.repository.insert(&issue).await?;
        info!(hostel_id = %issue.hostel_id, issue_id = %id, priority = %issue.priority, "maintenance issue opened");

        if issue.is_high_priority() {
            let body = format!("Room {} - {}", issue.room, issue.title);
            let data = json!({ "screen": "Maintenance", "issueId": id });
            if let Err(err) = self
                .notifier
                .notify_hostel_owners(issue.hostel_id, HIGH_PRIORITY_TITLE, &body, data)
                .await
            {
                error!(hostel_id = %issue.hostel_id, issue_id = %id, error = %err, "maintenance alert failed");
            }
        }

        Ok(MaintenanceIssue {
            id,
            hostel_id: issue.hostel_id,
            room: issue.room,
            title: issue.title,
            category: issue.category,
            priority: issue.priority,
            description: issue.description,
            cost: issue.cost,
            status: ISSUE_STATUS_OPEN.to_string(),
            created_by: Some(issue.created_by),
            created_at: issue.created_at,
        })
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<MaintenanceIssue>, MaintenanceError> {
        let scope = caller.scope()?;
        Ok(self.repository.list(scope.hostel()).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MaintenanceError {
    #[error(transparent)]
    Invalid(#[from] MissingIssueFields),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl MaintenanceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Access(err) => err.status(),
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MaintenanceError {
    fn into_response(self) -> Response {
        if let Self::Repository(err) = &self {
            error!(error = %err, "maintenance storage failed");
            return failure(self.status(), "Internal server error");
        }
        failure(self.status(), self.to_string())
    }
}
