use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Local;
use rust_decimal::Decimal;
use tracing::{error, info};

use super::domain::{
    Admission, Application, ApplicationId, ApplicationStatus, ApplicationSubmission,
    ApprovalRequest, MissingFields, RejectionRequest, Review, StudentId,
};
use super::repository::ApplicationRepository;
use crate::caller::{AccessError, Caller};
use crate::domain::non_blank;
use crate::error::failure;
use crate::repository::RepositoryError;

/// Intake and review of student applications.
pub struct ApplicationService<R> {
    repository: Arc<R>,
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Store a public registration as a pending application.
    pub async fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ApplicationId, ApplicationServiceError> {
        let application = submission.validate(Local::now().naive_local())?;
        if !self.repository.hostel_exists(application.hostel_id).await? {
            return Err(ApplicationServiceError::HostelNotFound);
        }

        let hostel_id = application.hostel_id;
        let id = self.repository.insert(application).await?;
        info!(%hostel_id, application_id = %id, "application submitted");
        Ok(id)
    }

    pub async fn pending(&self, caller: &Caller) -> Result<Vec<Application>, ApplicationServiceError> {
        let scope = caller.scope()?;
        Ok(self.repository.pending(scope.hostel()).await?)
    }

    /// Admit the applicant as an active student.
    pub async fn approve(
        &self,
        caller: &Caller,
        id: ApplicationId,
        request: ApprovalRequest,
    ) -> Result<StudentId, ApplicationServiceError> {
        let application = self.reviewable(caller, id, "approve").await?;
        let now = Local::now().naive_local();
        let admission = Admission {
            room_id: request.room_id,
            monthly_rent: request.monthly_rent.unwrap_or(Decimal::ZERO),
            admission_fee: request.admission_fee.unwrap_or(Decimal::ZERO),
            admitted_on: now.date(),
        };
        let review = Review {
            reviewer: caller.user_id,
            reviewed_at: now,
        };

        let student_id = self
            .repository
            .approve(&application, admission, review)
            .await
            .map_err(already_reviewed_on_conflict)?;
        info!(application_id = %id, student_id = student_id.0, "application approved");
        Ok(student_id)
    }

    pub async fn reject(
        &self,
        caller: &Caller,
        id: ApplicationId,
        request: RejectionRequest,
    ) -> Result<(), ApplicationServiceError> {
        self.reviewable(caller, id, "reject").await?;
        let review = Review {
            reviewer: caller.user_id,
            reviewed_at: Local::now().naive_local(),
        };

        self.repository
            .reject(id, non_blank(request.rejection_reason), review)
            .await
            .map_err(already_reviewed_on_conflict)?;
        info!(application_id = %id, "application rejected");
        Ok(())
    }

    async fn reviewable(
        &self,
        caller: &Caller,
        id: ApplicationId,
        action: &'static str,
    ) -> Result<Application, ApplicationServiceError> {
        let application = self
            .repository
            .fetch(id)
            .await?
            .ok_or(ApplicationServiceError::NotFound)?;

        if !caller.scope()?.permits(application.hostel_id) {
            return Err(ApplicationServiceError::Forbidden(action));
        }
        if application.status != ApplicationStatus::Pending {
            return Err(ApplicationServiceError::AlreadyReviewed);
        }
        Ok(application)
    }
}

fn already_reviewed_on_conflict(err: RepositoryError) -> ApplicationServiceError {
    match err {
        RepositoryError::Conflict => ApplicationServiceError::AlreadyReviewed,
        other => ApplicationServiceError::Repository(other),
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Invalid(#[from] MissingFields),
    #[error("Hostel not found")]
    HostelNotFound,
    #[error("Application not found")]
    NotFound,
    #[error("You do not have permission to {0} this application")]
    Forbidden(&'static str),
    #[error("Application has already been reviewed")]
    AlreadyReviewed,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApplicationServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Invalid(_) | Self::AlreadyReviewed => StatusCode::BAD_REQUEST,
            Self::HostelNotFound | Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Access(err) => err.status(),
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApplicationServiceError {
    fn into_response(self) -> Response {
        if let Self::Repository(err) = &self {
            error!(error = %err, "application storage failed");
            return failure(self.status(), "Failed to process application");
        }
        failure(self.status(), self.to_string())
    }
}
