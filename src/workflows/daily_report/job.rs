use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::aggregate::collect;
use super::dispatch::{DispatchOutcome, ReportDispatcher};
use super::ledger::{DeliveryLedger, DeliveryLog};
use super::mailer::Mailer;
use super::source::{Hostel, Recipient, ReportSource};
use super::workbook::build_document;
use crate::domain::HostelId;
use crate::repository::RepositoryError;

const OVERRIDE_RECIPIENT_NAME: &str = "Admin";

/// Who receives a cycle's reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// Every owner linked to the hostel, guarded by the delivery ledger.
    Owners,
    /// A single address replacing the owners of every hostel.
    Override(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HostelOutcome {
    Delivered(DispatchOutcome),
    NoRecipients,
    AlreadyDelivered,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostelReport {
    pub hostel_id: HostelId,
    pub hostel_name: String,
    #[serde(flatten)]
    pub outcome: HostelOutcome,
}

/// Result of one pass over every active hostel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub date: NaiveDate,
    pub hostels: Vec<HostelReport>,
}

impl CycleSummary {
    pub fn emails_sent(&self) -> usize {
        self.hostels
            .iter()
            .map(|report| match &report.outcome {
                HostelOutcome::Delivered(outcome) => outcome.sent,
                _ => 0,
            })
            .sum()
    }

    pub fn failed_hostels(&self) -> usize {
        self.hostels
            .iter()
            .filter(|report| matches!(report.outcome, HostelOutcome::Failed { .. }))
            .count()
    }
}

/// Error aborting a whole cycle.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to enumerate active hostels: {0}")]
    Enumeration(#[source] RepositoryError),
    #[error("override recipient must not be blank")]
    BlankOverride,
}

#[derive(Debug, thiserror::Error)]
enum HostelError {
    #[error("aggregation query failed: {0}")]
    Query(#[source] RepositoryError),
    #[error("delivery log unavailable: {0}")]
    Ledger(#[source] RepositoryError),
    #[error("owner lookup failed: {0}")]
    Recipients(#[source] RepositoryError),
    #[error("workbook generation failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

/// Aggregation, workbook and dispatch for every active hostel.
pub struct DailyReportJob {
    source: Arc<dyn ReportSource>,
    dispatcher: ReportDispatcher,
    ledger: Arc<dyn DeliveryLog>,
    cycle: Mutex<()>,
}

impl DailyReportJob {
    pub fn new(source: Arc<dyn ReportSource>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            source,
            dispatcher: ReportDispatcher::new(mailer),
            ledger: Arc::new(DeliveryLedger::new()),
            cycle: Mutex::new(()),
        }
    }

    /// Replaces the process-local delivery log with a shared one.
    pub fn with_ledger(mut self, ledger: Arc<dyn DeliveryLog>) -> Self {
        self.ledger = ledger;
        self
    }

    /// Timed run: owners of each hostel, at most once per hostel and day.
    pub async fn run_scheduled_cycle(&self, date: NaiveDate) -> Result<CycleSummary, ReportError> {
        let summary = self.run_cycle(date, &Recipients::Owners).await?;
        if let Some(cutoff) = date.pred_opt() {
            if let Err(err) = self.ledger.prune_before(cutoff).await {
                warn!(%date, error = %err, "delivery log pruning failed");
            }
        }
        Ok(summary)
    }

    /// Manual run: every hostel's report goes to `email` only.
    pub async fn run_manual_cycle(
        &self,
        email: &str,
        date: NaiveDate,
    ) -> Result<CycleSummary, ReportError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ReportError::BlankOverride);
        }
        self.run_cycle(date, &Recipients::Override(email.to_string()))
            .await
    }

    pub async fn run_cycle(
        &self,
        date: NaiveDate,
        recipients: &Recipients,
    ) -> Result<CycleSummary, ReportError> {
        let _running = self.cycle.lock().await;
        info!(%date, "daily report cycle started");

        let hostels = self.source.active_hostels().await.map_err(|err| {
            error!(%date, error = %err, "daily report cycle aborted");
            ReportError::Enumeration(err)
        })?;

        let mut reports = Vec::with_capacity(hostels.len());
        for hostel in hostels {
            let outcome = self.run_hostel(&hostel, date, recipients).await;
            reports.push(HostelReport {
                hostel_id: hostel.id,
                hostel_name: hostel.name,
                outcome,
            });
        }

        let summary = CycleSummary {
            date,
            hostels: reports,
        };
        info!(
            %date,
            hostels = summary.hostels.len(),
            emails_sent = summary.emails_sent(),
            failed_hostels = summary.failed_hostels(),
            "daily report cycle finished"
        );
        Ok(summary)
    }

    async fn run_hostel(
        &self,
        hostel: &Hostel,
        date: NaiveDate,
        recipients: &Recipients,
    ) -> HostelOutcome {
        let guarded = matches!(recipients, Recipients::Owners);
        if guarded {
            match self.ledger.claim(hostel.id, date).await {
                Ok(true) => {}
                Ok(false) => {
                    info!(hostel_id = %hostel.id, %date, "report already delivered for this day");
                    return HostelOutcome::AlreadyDelivered;
                }
                Err(err) => {
                    metrics::counter!("daily_report_hostels_failed_total").increment(1);
                    warn!(hostel_id = %hostel.id, %date, error = %err, "delivery log unavailable, report skipped");
                    return HostelOutcome::Failed {
                        reason: HostelError::Ledger(err).to_string(),
                    };
                }
            }
        }

        info!(hostel_id = %hostel.id, hostel = %hostel.name, %date, "generating daily report");
        let outcome = match self.deliver(hostel, date, recipients).await {
            Ok(None) => HostelOutcome::NoRecipients,
            Ok(Some(dispatch)) => HostelOutcome::Delivered(dispatch),
            Err(err) => {
                metrics::counter!("daily_report_hostels_failed_total").increment(1);
                warn!(hostel_id = %hostel.id, hostel = %hostel.name, error = %err, "daily report skipped");
                HostelOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        };

        let delivered_any = matches!(&outcome, HostelOutcome::Delivered(dispatch) if dispatch.sent > 0);
        if guarded && !delivered_any {
            if let Err(err) = self.ledger.release(hostel.id, date).await {
                warn!(hostel_id = %hostel.id, %date, error = %err, "delivery claim release failed");
            }
        }

        outcome
    }

    async fn deliver(
        &self,
        hostel: &Hostel,
        date: NaiveDate,
        recipients: &Recipients,
    ) -> Result<Option<DispatchOutcome>, HostelError> {
        let aggregate = collect(self.source.as_ref(), hostel, date)
            .await
            .map_err(HostelError::Query)?;
        let workbook = build_document(&aggregate).to_xlsx()?;

        let recipients = match recipients {
            Recipients::Owners => self
                .source
                .owners(hostel.id)
                .await
                .map_err(HostelError::Recipients)?,
            Recipients::Override(email) => vec![Recipient {
                email: email.clone(),
                name: OVERRIDE_RECIPIENT_NAME.to_string(),
            }],
        };

        if recipients.is_empty() {
            info!(hostel_id = %hostel.id, hostel = %hostel.name, "no recipients found, skipping email");
            return Ok(None);
        }

        Ok(Some(
            self.dispatcher
                .deliver(&aggregate, &workbook, &recipients)
                .await,
        ))
    }
}
