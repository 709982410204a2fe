//! Student admission: public registration followed by owner or admin review.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Admission, Application, ApplicationId, ApplicationStatus, ApplicationSubmission,
    ApprovalRequest, NewApplication, RejectionRequest, Review, StudentId,
};
pub use repository::ApplicationRepository;
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
