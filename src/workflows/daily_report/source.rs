use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::HostelId;
use crate::repository::RepositoryError;

/// Active hostel the report is produced for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hostel {
    pub id: HostelId,
    pub name: String,
}

/// Student headcounts for one hostel on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StudentCounts {
    pub total: u64,
    pub active: u64,
    pub joined_today: u64,
    pub vacated_today: u64,
    pub with_room: u64,
}

/// Monthly fee that still carries a balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeLine {
    pub first_name: String,
    pub last_name: String,
    pub room_number: Option<String>,
    pub balance: Decimal,
    pub period: String,
    pub due_date: Option<NaiveDate>,
    pub status: String,
}

/// Payment recorded against a fee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentLine {
    pub first_name: String,
    pub last_name: String,
    pub room_number: Option<String>,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub mode_name: Option<String>,
    pub receipt_number: Option<String>,
}

/// Someone who receives a hostel's report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub email: String,
    pub name: String,
}

/// Read-only queries feeding the daily report.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn active_hostels(&self) -> Result<Vec<Hostel>, RepositoryError>;

    async fn student_counts(
        &self,
        hostel: HostelId,
        day: NaiveDate,
    ) -> Result<StudentCounts, RepositoryError>;

    /// Every fee of the hostel that is not settled, regardless of due date.
    async fn unsettled_fees(&self, hostel: HostelId) -> Result<Vec<FeeLine>, RepositoryError>;

    async fn payments_on(
        &self,
        hostel: HostelId,
        day: NaiveDate,
    ) -> Result<Vec<PaymentLine>, RepositoryError>;

    /// Users holding the owner role for the hostel.
    async fn owners(&self, hostel: HostelId) -> Result<Vec<Recipient>, RepositoryError>;
}
