use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::source::{FeeLine, Hostel, PaymentLine, ReportSource, StudentCounts};
use crate::domain::FeeStatus;
use crate::repository::RepositoryError;

pub const UNKNOWN_MODE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeTotal {
    pub mode: String,
    pub amount: Decimal,
}

/// Everything the report shows for one hostel and one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    pub hostel: Hostel,
    pub date: NaiveDate,
    pub students: StudentCounts,
    pub pending_fees: Vec<FeeLine>,
    pub overdue_fees: Vec<FeeLine>,
    pub payments: Vec<PaymentLine>,
    pub total_collected: Decimal,
    pub total_pending: Decimal,
    pub total_overdue: Decimal,
    pub mode_breakdown: Vec<ModeTotal>,
}

impl DailyAggregate {
    pub fn build(
        hostel: Hostel,
        date: NaiveDate,
        students: StudentCounts,
        fees: Vec<FeeLine>,
        payments: Vec<PaymentLine>,
    ) -> Self {
        let pending_fees: Vec<FeeLine> = fees
            .into_iter()
            .filter(|fee| !FeeStatus::parse(&fee.status).is_some_and(FeeStatus::is_settled))
            .map(|mut fee| {
                if let Some(status) = FeeStatus::parse(&fee.status) {
                    fee.status = status.label().to_string();
                }
                fee
            })
            .collect();

        let overdue_fees: Vec<FeeLine> = pending_fees
            .iter()
            .filter(|fee| fee.due_date.is_some_and(|due| due < date))
            .cloned()
            .collect();

        let total_pending = pending_fees.iter().map(|fee| fee.balance).sum();
        let total_overdue = overdue_fees.iter().map(|fee| fee.balance).sum();
        let total_collected = payments.iter().map(|payment| payment.amount).sum();
        let mode_breakdown = mode_breakdown(&payments);

        Self {
            hostel,
            date,
            students,
            pending_fees,
            overdue_fees,
            payments,
            total_collected,
            total_pending,
            total_overdue,
            mode_breakdown,
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.payments.len()
    }
}

/// Sums payment amounts per mode, keeping modes in order of first appearance.
pub fn mode_breakdown(payments: &[PaymentLine]) -> Vec<ModeTotal> {
    let mut totals: Vec<ModeTotal> = Vec::new();

    for payment in payments {
        let mode = payment
            .mode_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_MODE);

        match totals.iter_mut().find(|entry| entry.mode == mode) {
            Some(entry) => entry.amount += payment.amount,
            None => totals.push(ModeTotal {
                mode: mode.to_string(),
                amount: payment.amount,
            }),
        }
    }

    totals
}

/// Runs the report queries for one hostel and folds them into an aggregate.
pub async fn collect<S>(
    source: &S,
    hostel: &Hostel,
    date: NaiveDate,
) -> Result<DailyAggregate, RepositoryError>
where
    S: ReportSource + ?Sized,
{
    let students = source.student_counts(hostel.id, date).await?;
    let fees = source.unsettled_fees(hostel.id).await?;
    let payments = source.payments_on(hostel.id, date).await?;

    Ok(DailyAggregate::build(
        hostel.clone(),
        date,
        students,
        fees,
        payments,
    ))
}
