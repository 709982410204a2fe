use async_trait::async_trait;

use super::domain::{Admission, Application, ApplicationId, NewApplication, Review, StudentId};
use crate::domain::HostelId;
use crate::repository::RepositoryError;

/// Storage abstraction for the admission workflow.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn hostel_exists(&self, hostel: HostelId) -> Result<bool, RepositoryError>;

    async fn insert(&self, application: NewApplication) -> Result<ApplicationId, RepositoryError>;

    /// Pending applications, newest first, optionally limited to one hostel.
    async fn pending(&self, hostel: Option<HostelId>) -> Result<Vec<Application>, RepositoryError>;

    async fn fetch(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError>;

    /// Creates the student and marks the application approved as one unit.
    ///
    /// Returns [`RepositoryError::Conflict`] when the application left `Pending` meanwhile.
    async fn approve(
        &self,
        application: &Application,
        admission: Admission,
        review: Review,
    ) -> Result<StudentId, RepositoryError>;

    /// Same conflict rule as [`ApplicationRepository::approve`].
    async fn reject(
        &self,
        id: ApplicationId,
        reason: Option<String>,
        review: Review,
    ) -> Result<(), RepositoryError>;
}
