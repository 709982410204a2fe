//! Maintenance issue intake with push alerts for urgent issues.

pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{IssueId, IssueSubmission, MaintenanceIssue, NewIssue};
pub use router::maintenance_router;
pub use service::{MaintenanceError, MaintenanceRepository, MaintenanceService};
