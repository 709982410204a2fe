use async_trait::async_trait;

use super::analytics::{OtherLine, RentLine};
use super::domain::{DateRange, ExportLine, IncomeEntry, IncomeId, IncomeRecord, SourceTotal};
use crate::domain::HostelId;
use crate::repository::RepositoryError;

/// Storage for the `income` table plus the fee payments read by analytics.
///
/// A `None` hostel means every hostel.
#[async_trait]
pub trait IncomeRepository: Send + Sync {
    /// Newest income date first.
    async fn list(
        &self,
        hostel: Option<HostelId>,
        range: Option<DateRange>,
    ) -> Result<Vec<IncomeRecord>, RepositoryError>;

    async fn owner_of(&self, id: IncomeId) -> Result<Option<HostelId>, RepositoryError>;

    async fn insert(&self, hostel: HostelId, entry: IncomeEntry) -> Result<IncomeId, RepositoryError>;

    async fn update(&self, id: IncomeId, entry: IncomeEntry) -> Result<(), RepositoryError>;

    async fn delete(&self, id: IncomeId) -> Result<(), RepositoryError>;

    /// Totals per source, largest first.
    async fn summary(&self, hostel: Option<HostelId>) -> Result<Vec<SourceTotal>, RepositoryError>;

    async fn rent_lines(
        &self,
        hostel: Option<HostelId>,
        range: DateRange,
    ) -> Result<Vec<RentLine>, RepositoryError>;

    async fn other_lines(
        &self,
        hostel: Option<HostelId>,
        range: DateRange,
    ) -> Result<Vec<OtherLine>, RepositoryError>;

    /// Oldest income date first.
    async fn export_lines(
        &self,
        hostel: Option<HostelId>,
        range: DateRange,
    ) -> Result<Vec<ExportLine>, RepositoryError>;
}
