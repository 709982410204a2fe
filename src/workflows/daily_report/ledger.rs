use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::HostelId;
use crate::repository::RepositoryError;

/// Record of which hostels already received their owner report for a day.
///
/// Processes running owner cycles against the same database share one log.
#[async_trait]
pub trait DeliveryLog: Send + Sync {
    /// Returns `false` when the pair was already claimed.
    async fn claim(&self, hostel: HostelId, date: NaiveDate) -> Result<bool, RepositoryError>;

    async fn release(&self, hostel: HostelId, date: NaiveDate) -> Result<(), RepositoryError>;

    /// Drops claims older than `keep_from`.
    async fn prune_before(&self, keep_from: NaiveDate) -> Result<(), RepositoryError>;
}

/// Process-local delivery log.
#[derive(Debug, Default)]
pub struct DeliveryLedger {
    claimed: Mutex<HashSet<(HostelId, NaiveDate)>>,
}

impl DeliveryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_claimed(&self, hostel: HostelId, date: NaiveDate) -> bool {
        let claimed = self.claimed.lock().unwrap_or_else(|err| err.into_inner());
        claimed.contains(&(hostel, date))
    }
}

#[async_trait]
impl DeliveryLog for DeliveryLedger {
    async fn claim(&self, hostel: HostelId, date: NaiveDate) -> Result<bool, RepositoryError> {
        let mut claimed = self.claimed.lock().unwrap_or_else(|err| err.into_inner());
        Ok(claimed.insert((hostel, date)))
    }

    async fn release(&self, hostel: HostelId, date: NaiveDate) -> Result<(), RepositoryError> {
        let mut claimed = self.claimed.lock().unwrap_or_else(|err| err.into_inner());
        claimed.remove(&(hostel, date));
        Ok(())
    }

    async fn prune_before(&self, keep_from: NaiveDate) -> Result<(), RepositoryError> {
        let mut claimed = self.claimed.lock().unwrap_or_else(|err| err.into_inner());
        claimed.retain(|(_, date)| *date >= keep_from);
        Ok(())
    }
}
