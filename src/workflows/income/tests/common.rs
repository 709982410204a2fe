use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::HostelId;
use crate::repository::RepositoryError;
use crate::workflows::income::analytics::{OtherLine, RentLine};
use crate::workflows::income::domain::{
    DateRange, ExportLine, IncomeEntry, IncomeId, IncomeInput, IncomeRecord, SourceTotal,
};
use crate::workflows::income::{IncomeRepository, IncomeService};

pub(super) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, d).expect("valid date")
}

pub(super) fn input(source: &str, amount: i64, date: NaiveDate) -> IncomeInput {
    IncomeInput {
        income_date: Some(date),
        amount: Some(Decimal::new(amount, 0)),
        source: Some(source.to_string()),
        payment_mode_id: Some(1),
        ..IncomeInput::default()
    }
}

/// In-memory income table plus fixed rent payments.
#[derive(Default)]
pub(super) struct MemoryIncome {
    pub entries: Mutex<BTreeMap<i64, (HostelId, IncomeEntry)>>,
    pub rent: Vec<(HostelId, RentLine)>,
    pub modes: HashMap<i64, String>,
}

impl MemoryIncome {
    pub fn with_modes() -> Self {
        Self {
            modes: HashMap::from([(1, "Cash".to_string()), (2, "UPI".to_string())]),
            ..Self::default()
        }
    }

    pub fn seed(&self, hostel: i64, input: IncomeInput) -> IncomeId {
        let entry = input.entry().expect("valid income");
        let mut entries = self.entries.lock().expect("income mutex poisoned");
        let id = entries.keys().next_back().copied().unwrap_or(0) + 1;
        entries.insert(id, (HostelId(hostel), entry));
        IncomeId(id)
    }

    pub fn get(&self, id: IncomeId) -> Option<(HostelId, IncomeEntry)> {
        self.entries
            .lock()
            .expect("income mutex poisoned")
            .get(&id.0)
            .cloned()
    }

    fn matching(
        &self,
        hostel: Option<HostelId>,
        range: Option<DateRange>,
    ) -> Vec<(i64, HostelId, IncomeEntry)> {
        self.entries
            .lock()
            .expect("income mutex poisoned")
            .iter()
            .filter(|(_, (owner, _))| hostel.map_or(true, |id| *owner == id))
            .filter(|(_, (_, entry))| range.map_or(true, |r| r.contains(entry.income_date)))
            .map(|(id, (owner, entry))| (*id, *owner, entry.clone()))
            .collect()
    }
}

#[async_trait]
impl IncomeRepository for MemoryIncome {
    async fn list(
        &self,
        hostel: Option<HostelId>,
        range: Option<DateRange>,
    ) -> Result<Vec<IncomeRecord>, RepositoryError> {
        let mut records: Vec<IncomeRecord> = self
            .matching(hostel, range)
            .into_iter()
            .map(|(id, owner, entry)| IncomeRecord {
                income_id: IncomeId(id),
                hostel_id: owner,
                hostel_name: None,
                income_date: entry.income_date,
                amount: entry.amount,
                source: entry.source,
                payment_mode: self.modes.get(&entry.payment_mode_id).cloned(),
                receipt_number: entry.receipt_number,
                description: entry.description,
            })
            .collect();
        records.sort_by(|a, b| b.income_date.cmp(&a.income_date));
        Ok(records)
    }

    async fn owner_of(&self, id: IncomeId) -> Result<Option<HostelId>, RepositoryError> {
        Ok(self.get(id).map(|(owner, _)| owner))
    }

    async fn insert(&self, hostel: HostelId, entry: IncomeEntry) -> Result<IncomeId, RepositoryError> {
        let mut entries = self.entries.lock().expect("income mutex poisoned");
        let id = entries.keys().next_back().copied().unwrap_or(0) + 1;
        entries.insert(id, (hostel, entry));
        Ok(IncomeId(id))
    }

    async fn update(&self, id: IncomeId, entry: IncomeEntry) -> Result<(), RepositoryError> {
        let mut entries = self.entries.lock().expect("income mutex poisoned");
        let slot = entries.get_mut(&id.0).ok_or(RepositoryError::NotFound)?;
        slot.1 = entry;
        Ok(())
    }

    async fn delete(&self, id: IncomeId) -> Result<(), RepositoryError> {
        self.entries
            .lock()
            .expect("income mutex poisoned")
            .remove(&id.0)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn summary(&self, hostel: Option<HostelId>) -> Result<Vec<SourceTotal>, RepositoryError> {
        let mut totals: BTreeMap<String, SourceTotal> = BTreeMap::new();
        for (_, _, entry) in self.matching(hostel, None) {
            let total = totals.entry(entry.source.clone()).or_insert(SourceTotal {
                source: entry.source,
                total_amount: Decimal::ZERO,
                count: 0,
            });
            total.total_amount += entry.amount;
            total.count += 1;
        }
        let mut summary: Vec<SourceTotal> = totals.into_values().collect();
        summary.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
        Ok(summary)
    }

    async fn rent_lines(
        &self,
        hostel: Option<HostelId>,
        range: DateRange,
    ) -> Result<Vec<RentLine>, RepositoryError> {
        Ok(self
            .rent
            .iter()
            .filter(|(owner, _)| hostel.map_or(true, |id| *owner == id))
            .filter(|(_, line)| range.contains(line.payment_date))
            .map(|(_, line)| line.clone())
            .collect())
    }

    async fn other_lines(
        &self,
        hostel: Option<HostelId>,
        range: DateRange,
    ) -> Result<Vec<OtherLine>, RepositoryError> {
        Ok(self
            .matching(hostel, Some(range))
            .into_iter()
            .map(|(id, _, entry)| OtherLine {
                income_id: id,
                amount: entry.amount,
                income_date: entry.income_date,
                source: entry.source,
                description: entry.description,
            })
            .collect())
    }

    async fn export_lines(
        &self,
        hostel: Option<HostelId>,
        range: DateRange,
    ) -> Result<Vec<ExportLine>, RepositoryError> {
        let mut lines: Vec<ExportLine> = self
            .matching(hostel, Some(range))
            .into_iter()
            .map(|(_, _, entry)| ExportLine {
                income_date: entry.income_date,
                amount: entry.amount,
                source: entry.source,
                payment_mode: self.modes.get(&entry.payment_mode_id).cloned(),
                receipt_number: entry.receipt_number,
                description: entry.description,
            })
            .collect();
        lines.sort_by_key(|line| line.income_date);
        Ok(lines)
    }
}

pub(super) fn rent_payment(id: i64, date: NaiveDate, amount: i64, hour: u32) -> RentLine {
    RentLine {
        payment_id: id,
        student_id: Some(id + 500),
        first_name: Some("Meera".to_string()),
        last_name: Some("Iyer".to_string()),
        amount: Decimal::new(amount, 0),
        payment_date: date,
        hour,
    }
}

pub(super) fn service(repository: Arc<MemoryIncome>) -> IncomeService<MemoryIncome> {
    IncomeService::new(repository)
}
