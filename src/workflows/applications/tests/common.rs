use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::caller::Caller;
use crate::domain::HostelId;
use crate::repository::RepositoryError;
use crate::workflows::applications::domain::{
    Admission, Application, ApplicationId, ApplicationStatus, ApplicationSubmission,
    NewApplication, Review, StudentId,
};
use crate::workflows::applications::repository::ApplicationRepository;
use crate::workflows::applications::ApplicationService;

pub(super) fn submission(hostel: i64) -> ApplicationSubmission {
    ApplicationSubmission {
        hostel_id: Some(hostel),
        first_name: Some("Kiran".to_string()),
        last_name: Some("Das".to_string()),
        phone: Some("9876543210".to_string()),
        email: Some("kiran@example.com".to_string()),
        ..ApplicationSubmission::default()
    }
}

pub(super) fn owner_of(hostel: i64) -> Caller {
    Caller::owner(20 + hostel, Some(hostel))
}

pub(super) fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

#[derive(Debug, Clone)]
pub(super) struct AdmittedStudent {
    pub application_id: ApplicationId,
    pub hostel_id: HostelId,
    pub first_name: String,
    pub admission: Admission,
}

/// In-memory application store with a fixed set of hostels.
#[derive(Default)]
pub(super) struct MemoryApplications {
    pub hostels: HashSet<HostelId>,
    pub applications: Mutex<BTreeMap<i64, Application>>,
    pub students: Mutex<Vec<AdmittedStudent>>,
}

impl MemoryApplications {
    pub fn with_hostels(ids: &[i64]) -> Self {
        Self {
            hostels: ids.iter().copied().map(HostelId).collect(),
            ..Self::default()
        }
    }

    pub fn get(&self, id: ApplicationId) -> Option<Application> {
        self.applications
            .lock()
            .expect("applications mutex poisoned")
            .get(&id.0)
            .cloned()
    }

    pub fn admitted(&self) -> Vec<AdmittedStudent> {
        self.students.lock().expect("students mutex poisoned").clone()
    }

    fn review(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
        reason: Option<String>,
        review: Review,
    ) -> Result<(), RepositoryError> {
        let mut applications = self.applications.lock().expect("applications mutex poisoned");
        let application = applications.get_mut(&id.0).ok_or(RepositoryError::NotFound)?;
        if application.status != ApplicationStatus::Pending {
            return Err(RepositoryError::Conflict);
        }
        application.status = status;
        application.rejection_reason = reason;
        application.reviewed_at = Some(review.reviewed_at);
        application.reviewed_by = Some(review.reviewer);
        Ok(())
    }
}

#[async_trait]
impl ApplicationRepository for MemoryApplications {
    async fn hostel_exists(&self, hostel: HostelId) -> Result<bool, RepositoryError> {
        Ok(self.hostels.contains(&hostel))
    }

    async fn insert(&self, application: NewApplication) -> Result<ApplicationId, RepositoryError> {
        let mut applications = self.applications.lock().expect("applications mutex poisoned");
        let id = ApplicationId(applications.len() as i64 + 1);
        applications.insert(
            id.0,
            Application {
                application_id: id,
                hostel_id: application.hostel_id,
                first_name: application.first_name,
                last_name: application.last_name,
                phone: application.phone,
                email: application.email,
                date_of_birth: application.date_of_birth,
                gender: application.gender,
                permanent_address: application.permanent_address,
                guardian_name: application.guardian_name,
                guardian_phone: application.guardian_phone,
                id_proof_number: application.id_proof_number,
                status: ApplicationStatus::Pending,
                rejection_reason: None,
                submitted_at: application.submitted_at,
                reviewed_at: None,
                reviewed_by: None,
            },
        );
        Ok(id)
    }

    async fn pending(&self, hostel: Option<HostelId>) -> Result<Vec<Application>, RepositoryError> {
        let applications = self.applications.lock().expect("applications mutex poisoned");
        let mut pending: Vec<Application> = applications
            .values()
            .filter(|application| application.status == ApplicationStatus::Pending)
            .filter(|application| hostel.map_or(true, |id| application.hostel_id == id))
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(pending)
    }

    async fn fetch(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn approve(
        &self,
        application: &Application,
        admission: Admission,
        review: Review,
    ) -> Result<StudentId, RepositoryError> {
        self.review(
            application.application_id,
            ApplicationStatus::Approved,
            None,
            review,
        )?;
        let mut students = self.students.lock().expect("students mutex poisoned");
        students.push(AdmittedStudent {
            application_id: application.application_id,
            hostel_id: application.hostel_id,
            first_name: application.first_name.clone(),
            admission,
        });
        Ok(StudentId(100 + students.len() as i64))
    }

    async fn reject(
        &self,
        id: ApplicationId,
        reason: Option<String>,
        review: Review,
    ) -> Result<(), RepositoryError> {
        self.review(id, ApplicationStatus::Rejected, reason, review)
    }
}

pub(super) fn service(
    repository: Arc<MemoryApplications>,
) -> ApplicationService<MemoryApplications> {
    ApplicationService::new(repository)
}

/// Inserts an application with a fixed submission time.
pub(super) fn seed(
    repository: &MemoryApplications,
    hostel: i64,
    submitted_at: NaiveDateTime,
) -> ApplicationId {
    let mut applications = repository
        .applications
        .lock()
        .expect("applications mutex poisoned");
    let id = ApplicationId(applications.len() as i64 + 1);
    let new = submission(hostel)
        .validate(submitted_at)
        .expect("valid submission");
    applications.insert(
        id.0,
        Application {
            application_id: id,
            hostel_id: new.hostel_id,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            email: new.email,
            date_of_birth: None,
            gender: new.gender,
            permanent_address: None,
            guardian_name: None,
            guardian_phone: None,
            id_proof_number: None,
            status: ApplicationStatus::Pending,
            rejection_reason: None,
            submitted_at,
            reviewed_at: None,
            reviewed_by: None,
        },
    );
    id
}
