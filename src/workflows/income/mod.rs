//! Non-rent income bookkeeping, income analytics and the income export.

pub mod analytics;
pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use analytics::{IncomeAnalytics, OtherLine, Period, RentLine};
pub use domain::{DateRange, ExportLine, IncomeEntry, IncomeId, IncomeInput, IncomeRecord, SourceTotal};
pub use repository::IncomeRepository;
pub use router::income_router;
pub use service::{IncomeError, IncomeExport, IncomeService};
