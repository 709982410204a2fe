use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{non_blank, HostelId};

/// Primary key of `income`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncomeId(pub i64);

impl fmt::Display for IncomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Income row as listed to owners and admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeRecord {
    pub income_id: IncomeId,
    pub hostel_id: HostelId,
    pub hostel_name: Option<String>,
    pub income_date: NaiveDate,
    pub amount: Decimal,
    pub source: String,
    pub payment_mode: Option<String>,
    pub receipt_number: Option<String>,
    pub description: Option<String>,
}

/// Create/update body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomeInput {
    pub hostel_id: Option<i64>,
    pub income_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub source: Option<String>,
    pub payment_mode_id: Option<i64>,
    pub receipt_number: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Missing required fields")]
pub struct MissingIncomeFields;

/// Validated income fields, independent of the owning hostel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeEntry {
    pub income_date: NaiveDate,
    pub amount: Decimal,
    pub source: String,
    pub payment_mode_id: i64,
    pub receipt_number: Option<String>,
    pub description: Option<String>,
}

impl IncomeInput {
    /// Zero amounts and blank sources count as missing.
    pub fn entry(&self) -> Result<IncomeEntry, MissingIncomeFields> {
        let income_date = self.income_date.ok_or(MissingIncomeFields)?;
        let amount = self
            .amount
            .filter(|amount| !amount.is_zero())
            .ok_or(MissingIncomeFields)?;
        let source = non_blank(self.source.clone()).ok_or(MissingIncomeFields)?;
        let payment_mode_id = self
            .payment_mode_id
            .filter(|id| *id > 0)
            .ok_or(MissingIncomeFields)?;

        Ok(IncomeEntry {
            income_date,
            amount,
            source,
            payment_mode_id,
            receipt_number: non_blank(self.receipt_number.clone()),
            description: non_blank(self.description.clone()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTotal {
    pub source: String,
    pub total_amount: Decimal,
    pub count: u64,
}

/// One row of the income export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLine {
    pub income_date: NaiveDate,
    pub amount: Decimal,
    pub source: String,
    pub payment_mode: Option<String>,
    pub receipt_number: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> IncomeInput {
        IncomeInput {
            income_date: NaiveDate::from_ymd_opt(2025, 11, 3),
            amount: Some(Decimal::new(150000, 2)),
            source: Some(" Laundry ".to_string()),
            payment_mode_id: Some(2),
            receipt_number: Some(String::new()),
            ..IncomeInput::default()
        }
    }

    #[test]
    fn entry_trims_and_drops_blank_optionals() {
        let entry = input().entry().expect("valid input");
        assert_eq!(entry.source, "Laundry");
        assert_eq!(entry.receipt_number, None);
        assert_eq!(entry.amount, Decimal::new(1500, 0));
    }

    #[test]
    fn zero_amount_is_missing() {
        let mut zero = input();
        zero.amount = Some(Decimal::ZERO);
        assert_eq!(zero.entry(), Err(MissingIncomeFields));

        let mut no_mode = input();
        no_mode.payment_mode_id = None;
        assert_eq!(no_mode.entry(), Err(MissingIncomeFields));
    }
}
