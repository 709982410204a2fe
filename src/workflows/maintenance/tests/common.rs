use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{HostelId, UserId};
use crate::repository::RepositoryError;
use crate::workflows::maintenance::domain::{IssueId, MaintenanceIssue, NewIssue, ISSUE_STATUS_OPEN};
use crate::workflows::maintenance::{MaintenanceRepository, MaintenanceService};
use crate::workflows::push::{DeviceDirectory, PushError, PushGateway, PushMessage, PushNotifier};

#[derive(Default)]
pub(super) struct MemoryIssues {
    pub issues: Mutex<Vec<MaintenanceIssue>>,
}

#[async_trait]
impl MaintenanceRepository for MemoryIssues {
    async fn insert(&self, issue: &NewIssue) -> Result<IssueId, RepositoryError> {
        let mut issues = self.issues.lock().expect("issues mutex poisoned");
        let id = IssueId(issues.len() as i64 + 1);
        issues.push(MaintenanceIssue {
            id,
            hostel_id: issue.hostel_id,
            room: issue.room.clone(),
            title: issue.title.clone(),
            category: issue.category.clone(),
            priority: issue.priority.clone(),
            description: issue.description.clone(),
            cost: issue.cost,
            status: ISSUE_STATUS_OPEN.to_string(),
            created_by: Some(issue.created_by),
            created_at: issue.created_at,
        });
        Ok(id)
    }

    async fn list(&self, hostel: Option<HostelId>) -> Result<Vec<MaintenanceIssue>, RepositoryError> {
        let issues = self.issues.lock().expect("issues mutex poisoned");
        let mut listed: Vec<MaintenanceIssue> = issues
            .iter()
            .filter(|issue| hostel.map_or(true, |id| issue.hostel_id == id))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(listed)
    }
}

/// Every hostel has owner `100 + hostel` with one device.
pub(super) struct OneDevicePerOwner;

#[async_trait]
impl DeviceDirectory for OneDevicePerOwner {
    async fn owners_of(&self, hostel: HostelId) -> Result<Vec<UserId>, RepositoryError> {
        Ok(vec![UserId(100 + hostel.0)])
    }

    async fn tokens_for(&self, user: UserId) -> Result<Vec<String>, RepositoryError> {
        Ok(vec![format!("ExpoPushToken[owner-{}]", user.0)])
    }
}

#[derive(Default)]
pub(super) struct RecordingGateway {
    pub sent: Mutex<Vec<PushMessage>>,
    pub down: bool,
}

#[async_trait]
impl PushGateway for RecordingGateway {
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<(), PushError> {
        if self.down {
            return Err(PushError::Transport("push api unreachable".to_string()));
        }
        self.sent
            .lock()
            .expect("push mutex poisoned")
            .extend_from_slice(messages);
        Ok(())
    }
}

impl RecordingGateway {
    pub fn messages(&self) -> Vec<PushMessage> {
        self.sent.lock().expect("push mutex poisoned").clone()
    }
}

pub(super) fn service(
    repository: Arc<MemoryIssues>,
    gateway: Arc<RecordingGateway>,
) -> MaintenanceService<MemoryIssues> {
    let notifier = PushNotifier::new(Arc::new(OneDevicePerOwner), gateway);
    MaintenanceService::new(repository, Arc::new(notifier))
}
