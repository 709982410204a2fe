use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::HostelId;
use crate::repository::RepositoryError;
use crate::workflows::daily_report::mailer::{MailError, Mailer, OutboundEmail};
use crate::workflows::daily_report::source::{
    FeeLine, Hostel, PaymentLine, Recipient, ReportSource, StudentCounts,
};
use crate::workflows::daily_report::{DailyReportJob, DeliveryLedger, DeliveryLog};

pub(super) fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 14).expect("valid date")
}

pub(super) fn hostel(id: i64, name: &str) -> Hostel {
    Hostel {
        id: HostelId(id),
        name: name.to_string(),
    }
}

pub(super) fn owner(email: &str, name: &str) -> Recipient {
    Recipient {
        email: email.to_string(),
        name: name.to_string(),
    }
}

pub(super) fn payment(amount: Decimal, mode: &str) -> PaymentLine {
    PaymentLine {
        first_name: "Ravi".to_string(),
        last_name: "Kumar".to_string(),
        room_number: Some("101".to_string()),
        amount,
        payment_date: day(),
        mode_name: Some(mode.to_string()),
        receipt_number: Some("RCP-1001".to_string()),
    }
}

pub(super) fn fee(balance: Decimal, due: NaiveDate) -> FeeLine {
    FeeLine {
        first_name: "Meera".to_string(),
        last_name: "Iyer".to_string(),
        room_number: None,
        balance,
        period: "2025-11".to_string(),
        due_date: Some(due),
        status: "Pending".to_string(),
    }
}

/// In-memory report source keyed by hostel.
#[derive(Default)]
pub(super) struct MemorySource {
    pub hostels: Vec<Hostel>,
    pub counts: HashMap<HostelId, StudentCounts>,
    pub fees: HashMap<HostelId, Vec<FeeLine>>,
    pub payments: HashMap<HostelId, Vec<PaymentLine>>,
    pub owners: HashMap<HostelId, Vec<Recipient>>,
    pub broken_hostels: HashSet<HostelId>,
    pub enumeration_down: bool,
}

impl MemorySource {
    fn check(&self, hostel: HostelId) -> Result<(), RepositoryError> {
        if self.broken_hostels.contains(&hostel) {
            return Err(RepositoryError::Unavailable("lost connection".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ReportSource for MemorySource {
    async fn active_hostels(&self) -> Result<Vec<Hostel>, RepositoryError> {
        if self.enumeration_down {
            return Err(RepositoryError::Unavailable("pool timed out".to_string()));
        }
        Ok(self.hostels.clone())
    }

    async fn student_counts(
        &self,
        hostel: HostelId,
        _day: NaiveDate,
    ) -> Result<StudentCounts, RepositoryError> {
        self.check(hostel)?;
        Ok(self.counts.get(&hostel).copied().unwrap_or_default())
    }

    async fn unsettled_fees(&self, hostel: HostelId) -> Result<Vec<FeeLine>, RepositoryError> {
        self.check(hostel)?;
        Ok(self.fees.get(&hostel).cloned().unwrap_or_default())
    }

    async fn payments_on(
        &self,
        hostel: HostelId,
        day: NaiveDate,
    ) -> Result<Vec<PaymentLine>, RepositoryError> {
        self.check(hostel)?;
        Ok(self
            .payments
            .get(&hostel)
            .map(|lines| {
                lines
                    .iter()
                    .filter(|line| line.payment_date == day)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn owners(&self, hostel: HostelId) -> Result<Vec<Recipient>, RepositoryError> {
        Ok(self.owners.get(&hostel).cloned().unwrap_or_default())
    }
}

/// Mailer recording every message it accepts.
#[derive(Default)]
pub(super) struct MemoryMailer {
    pub sent: Mutex<Vec<OutboundEmail>>,
    pub rejecting: HashSet<String>,
}

impl MemoryMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent().into_iter().map(|email| email.to).collect()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        if self.rejecting.contains(&email.to) {
            return Err(MailError::Rejected {
                status: 422,
                body: "mailbox unavailable".to_string(),
            });
        }
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(email.clone());
        Ok(())
    }
}

/// Three hostels: one healthy with two owners, one without owners, one broken.
pub(super) fn three_hostel_source() -> MemorySource {
    let mut source = MemorySource {
        hostels: vec![
            hostel(1, "Lakeview Boys Hostel"),
            hostel(2, "Sunrise Girls Hostel"),
            hostel(3, "Hilltop Residency"),
        ],
        ..MemorySource::default()
    };

    source.counts.insert(
        HostelId(1),
        StudentCounts {
            total: 20,
            active: 18,
            joined_today: 2,
            vacated_today: 0,
            with_room: 17,
        },
    );
    source.payments.insert(
        HostelId(1),
        vec![
            payment(Decimal::new(10000, 2), "Cash"),
            payment(Decimal::new(25050, 2), "Cash"),
            payment(Decimal::ZERO, "Cash"),
            payment(Decimal::new(5000, 2), "UPI"),
        ],
    );
    source.fees.insert(
        HostelId(1),
        vec![fee(Decimal::new(4500, 0), day().pred_opt().expect("valid"))],
    );
    source.owners.insert(
        HostelId(1),
        vec![
            owner("owner.one@example.com", "Anil"),
            owner("owner.two@example.com", "Priya"),
        ],
    );
    source.owners.insert(HostelId(3), vec![owner("hilltop@example.com", "Suresh")]);
    source.broken_hostels.insert(HostelId(3));
    source
}

pub(super) fn job(source: MemorySource, mailer: Arc<MemoryMailer>) -> DailyReportJob {
    DailyReportJob::new(Arc::new(source), mailer)
}

/// Job whose owner deliveries are recorded in `ledger`, as several processes sharing one store would be.
pub(super) fn job_with_ledger(
    source: Arc<MemorySource>,
    mailer: Arc<MemoryMailer>,
    ledger: Arc<DeliveryLedger>,
) -> DailyReportJob {
    DailyReportJob::new(source, mailer).with_ledger(ledger)
}

/// Delivery log whose backing table cannot be reached.
pub(super) struct UnreachableLog;

#[async_trait]
impl DeliveryLog for UnreachableLog {
    async fn claim(&self, _hostel: HostelId, _date: NaiveDate) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("deliveries table locked".to_string()))
    }

    async fn release(&self, _hostel: HostelId, _date: NaiveDate) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn prune_before(&self, _keep_from: NaiveDate) -> Result<(), RepositoryError> {
        Ok(())
    }
}

pub(super) async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}
