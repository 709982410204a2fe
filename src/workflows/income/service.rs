use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use rust_xlsxwriter::XlsxError;
use tracing::{error, info};

use super::analytics::{analyze, IncomeAnalytics, Period};
use super::domain::{DateRange, IncomeId, IncomeInput, IncomeRecord, MissingIncomeFields, SourceTotal};
use super::export::{build_export, export_filename};
use super::repository::IncomeRepository;
use crate::caller::{AccessError, Caller, HostelScope};
use crate::domain::HostelId;
use crate::error::failure;
use crate::repository::RepositoryError;

/// Rendered income export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Role-scoped bookkeeping of non-rent income.
pub struct IncomeService<R> {
    repository: Arc<R>,
}

impl<R> IncomeService<R>
where
    R: IncomeRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list(
        &self,
        caller: &Caller,
        range: Option<DateRange>,
    ) -> Result<Vec<IncomeRecord>, IncomeError> {
        let scope = caller.scope()?;
        Ok(self.repository.list(scope.hostel(), range).await?)
    }

    /// Owners record against their own hostel; admins name one in the body.
    pub async fn create(&self, caller: &Caller, input: IncomeInput) -> Result<IncomeId, IncomeError> {
        let entry = input.entry()?;
        let hostel = match caller.scope()? {
            HostelScope::Only(id) => id,
            HostelScope::All => input
                .hostel_id
                .filter(|id| *id > 0)
                .map(HostelId)
                .ok_or(IncomeError::HostelRequired)?,
        };

        let id = self.repository.insert(hostel, entry).await?;
        info!(%hostel, income_id = %id, "income recorded");
        Ok(id)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: IncomeId,
        input: IncomeInput,
    ) -> Result<(), IncomeError> {
        let entry = input.entry()?;
        self.authorize(caller, id, "update").await?;
        self.repository.update(id, entry).await?;
        info!(income_id = %id, "income updated");
        Ok(())
    }

    pub async fn delete(&self, caller: &Caller, id: IncomeId) -> Result<(), IncomeError> {
        self.authorize(caller, id, "delete").await?;
        self.repository.delete(id).await?;
        info!(income_id = %id, "income deleted");
        Ok(())
    }

    pub async fn summary(&self, caller: &Caller) -> Result<Vec<SourceTotal>, IncomeError> {
        let scope = caller.scope()?;
        Ok(self.repository.summary(scope.hostel()).await?)
    }

    /// Rent and other income around `date`, bucketed for the requested period.
    pub async fn analytics(
        &self,
        caller: &Caller,
        period: Option<&str>,
        date: Option<NaiveDate>,
        requested: Option<HostelId>,
    ) -> Result<IncomeAnalytics, IncomeError> {
        let hostel = caller.resolve_hostel(requested)?;
        let (Some(raw), Some(date)) = (period, date) else {
            return Err(IncomeError::AnalyticsParams);
        };
        let period = Period::parse(raw);

        let range = period.window(date);
        let rent = self.repository.rent_lines(hostel, range).await?;
        let other = self.repository.other_lines(hostel, range).await?;
        Ok(analyze(period, range, &rent, &other))
    }

    pub async fn export(
        &self,
        caller: &Caller,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<IncomeExport, IncomeError> {
        let scope = caller.scope()?;
        let (Some(start), Some(end)) = (start, end) else {
            return Err(IncomeError::ExportRange);
        };

        let range = DateRange::new(start, end);
        let lines = self.repository.export_lines(scope.hostel(), range).await?;
        let bytes = build_export(&lines).to_xlsx()?;
        Ok(IncomeExport {
            filename: export_filename(range),
            bytes,
        })
    }

    async fn authorize(
        &self,
        caller: &Caller,
        id: IncomeId,
        action: &'static str,
    ) -> Result<(), IncomeError> {
        let hostel = self
            .repository
            .owner_of(id)
            .await?
            .ok_or(IncomeError::NotFound)?;
        if !caller.scope()?.permits(hostel) {
            return Err(IncomeError::Forbidden(action));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IncomeError {
    #[error(transparent)]
    Invalid(#[from] MissingIncomeFields),
    #[error("hostel_id is required for admin users")]
    HostelRequired,
    #[error("Income record not found")]
    NotFound,
    #[error("You can only {0} income for your own hostel.")]
    Forbidden(&'static str),
    #[error("Date and Type required")]
    AnalyticsParams,
    #[error("Start date and End date are required")]
    ExportRange,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("failed to render income export: {0}")]
    Workbook(#[from] XlsxError),
}

impl IncomeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Invalid(_)
            | Self::HostelRequired
            | Self::AnalyticsParams
            | Self::ExportRange => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Access(err) => err.status(),
            Self::Repository(_) | Self::Workbook(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for IncomeError {
    fn into_response(self) -> Response {
        match &self {
            Self::Repository(err) => {
                error!(error = %err, "income storage failed");
                failure(self.status(), "Failed to process income record")
            }
            Self::Workbook(err) => {
                error!(error = %err, "income export failed");
                failure(self.status(), "Failed to export income")
            }
            _ => failure(self.status(), self.to_string()),
        }
    }
}
