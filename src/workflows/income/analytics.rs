use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::DateRange;

/// Other income carries no time of day; it is charted at noon.
pub const OTHER_INCOME_HOUR: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    /// `day` and `week` select those views; any other value reads as a month.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" => Self::Day,
            "week" => Self::Week,
            _ => Self::Month,
        }
    }

    /// Dates covered for a reference day: the day itself, the day and the six
    /// following it, or the whole calendar month.
    pub fn window(self, reference: NaiveDate) -> DateRange {
        match self {
            Self::Day => DateRange::new(reference, reference),
            Self::Week => DateRange::new(
                reference,
                reference.checked_add_days(Days::new(6)).unwrap_or(reference),
            ),
            Self::Month => {
                let first = reference.with_day(1).unwrap_or(reference);
                DateRange::new(first, last_day_of_month(reference))
            }
        }
    }
}

fn last_day_of_month(day: NaiveDate) -> NaiveDate {
    let (year, month) = if day.month() == 12 {
        (day.year() + 1, 1)
    } else {
        (day.year(), day.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(day)
}

/// Fee payment counted as rent income.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentLine {
    pub payment_id: i64,
    pub student_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub hour: u32,
}

/// Entry of the `income` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherLine {
    pub income_id: i64,
    pub amount: Decimal,
    pub income_date: NaiveDate,
    pub source: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphPoint {
    pub label: String,
    pub value: Decimal,
    #[serde(rename = "fullDate", skip_serializing_if = "Option::is_none")]
    pub full_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    Rent,
    Income,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub rent: Decimal,
    pub other: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeAnalytics {
    pub total_amount: Decimal,
    pub breakdown: Breakdown,
    pub graph: Vec<GraphPoint>,
    pub transactions: Vec<Transaction>,
}

/// Totals, chart buckets and the merged transaction feed for a window.
pub fn analyze(
    period: Period,
    range: DateRange,
    rent: &[RentLine],
    other: &[OtherLine],
) -> IncomeAnalytics {
    let breakdown = Breakdown {
        rent: rent.iter().map(|line| line.amount).sum(),
        other: other.iter().map(|line| line.amount).sum(),
    };

    let graph = match period {
        Period::Day => hourly_graph(rent, other),
        Period::Week => daily_graph(range, rent, other),
        Period::Month => weekly_graph(range, rent, other),
    };

    IncomeAnalytics {
        total_amount: breakdown.rent + breakdown.other,
        breakdown,
        graph,
        transactions: transactions(rent, other),
    }
}

fn hourly_graph(rent: &[RentLine], other: &[OtherLine]) -> Vec<GraphPoint> {
    let mut buckets: BTreeMap<u32, Decimal> = BTreeMap::new();
    for line in rent {
        *buckets.entry(line.hour).or_default() += line.amount;
    }
    for line in other {
        *buckets.entry(OTHER_INCOME_HOUR).or_default() += line.amount;
    }

    buckets
        .into_iter()
        .map(|(hour, value)| GraphPoint {
            label: format!("{hour:02}:00"),
            value,
            full_date: None,
        })
        .collect()
}

fn per_day(rent: &[RentLine], other: &[OtherLine]) -> BTreeMap<NaiveDate, Decimal> {
    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for line in rent {
        *totals.entry(line.payment_date).or_default() += line.amount;
    }
    for line in other {
        *totals.entry(line.income_date).or_default() += line.amount;
    }
    totals
}

fn daily_graph(range: DateRange, rent: &[RentLine], other: &[OtherLine]) -> Vec<GraphPoint> {
    let totals = per_day(rent, other);
    range
        .start
        .iter_days()
        .take(7)
        .map(|day| GraphPoint {
            label: day.day().to_string(),
            value: totals.get(&day).copied().unwrap_or_default(),
            full_date: Some(day),
        })
        .collect()
}

fn weekly_graph(range: DateRange, rent: &[RentLine], other: &[OtherLine]) -> Vec<GraphPoint> {
    let last = range.end.day();
    let mut buckets = [
        (1, 7, "1-7".to_string(), Decimal::ZERO),
        (8, 15, "8-15".to_string(), Decimal::ZERO),
        (16, 22, "16-22".to_string(), Decimal::ZERO),
        (23, 31, format!("23-{last}"), Decimal::ZERO),
    ];

    for (day, value) in per_day(rent, other) {
        if !range.contains(day) {
            continue;
        }
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|(start, end, _, _)| (*start..=*end).contains(&day.day()))
        {
            bucket.3 += value;
        }
    }

    buckets
        .into_iter()
        .map(|(_, _, label, value)| GraphPoint {
            label,
            value,
            full_date: None,
        })
        .collect()
}

fn transactions(rent: &[RentLine], other: &[OtherLine]) -> Vec<Transaction> {
    let mut merged: Vec<Transaction> = rent
        .iter()
        .map(|line| Transaction {
            id: format!("rent-{}", line.payment_id),
            date: line.payment_date,
            amount: line.amount,
            kind: TransactionKind::Rent,
            title: crate::domain::full_name(
                line.first_name.as_deref().unwrap_or_default(),
                line.last_name.as_deref().unwrap_or_default(),
            ),
            subtitle: "Monthly Stay".to_string(),
            student_id: line.student_id,
        })
        .chain(other.iter().map(|line| Transaction {
            id: format!("inc-{}", line.income_id),
            date: line.income_date,
            amount: line.amount,
            kind: TransactionKind::Income,
            title: line.source.clone(),
            subtitle: line
                .description
                .clone()
                .unwrap_or_else(|| "Other Income".to_string()),
            student_id: None,
        }))
        .collect();

    merged.sort_by(|a, b| b.date.cmp(&a.date));
    merged
}
