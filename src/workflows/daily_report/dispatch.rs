use std::sync::Arc;

use askama::Template;
use serde::Serialize;
use tracing::{info, warn};

use super::aggregate::DailyAggregate;
use super::mailer::{Attachment, Mailer, OutboundEmail};
use super::source::Recipient;
use super::workbook::attachment_name;
use crate::spreadsheet::XLSX_CONTENT_TYPE;

/// Per-hostel delivery tally. A failed send never aborts the remaining ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub attempted: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub struct ReportDispatcher {
    mailer: Arc<dyn Mailer>,
}

impl ReportDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Sends one email per recipient with the workbook attached.
    pub async fn deliver(
        &self,
        aggregate: &DailyAggregate,
        workbook: &[u8],
        recipients: &[Recipient],
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let hostel_id = aggregate.hostel.id;

        if recipients.is_empty() {
            info!(%hostel_id, hostel = %aggregate.hostel.name, "no recipients found, skipping email");
            return outcome;
        }

        for recipient in recipients {
            if recipient.email.trim().is_empty() {
                outcome.skipped += 1;
                continue;
            }

            outcome.attempted += 1;
            let email = match compose_email(aggregate, recipient, workbook) {
                Ok(email) => email,
                Err(err) => {
                    outcome.failed += 1;
                    metrics::counter!("daily_report_emails_failed_total").increment(1);
                    warn!(%hostel_id, recipient = %recipient.email, error = %err, "daily report email failed to render");
                    continue;
                }
            };
            match self.mailer.send(&email).await {
                Ok(()) => {
                    outcome.sent += 1;
                    metrics::counter!("daily_report_emails_sent_total").increment(1);
                    info!(%hostel_id, recipient = %recipient.email, "daily report sent");
                }
                Err(err) => {
                    outcome.failed += 1;
                    metrics::counter!("daily_report_emails_failed_total").increment(1);
                    warn!(%hostel_id, recipient = %recipient.email, error = %err, "daily report send failed");
                }
            }
        }

        outcome
    }
}

pub fn subject(aggregate: &DailyAggregate) -> String {
    format!("Daily Hostel Report - {}", aggregate.date.format("%Y-%m-%d"))
}

/// HTML body of the owner email, rendered from `templates/daily_report.html`.
#[derive(Template)]
#[template(path = "daily_report.html")]
pub struct DailyReportEmail<'a> {
    pub hostel: &'a str,
    pub date: String,
    pub recipient: &'a str,
    pub new_students: u64,
    pub total_collected: String,
    pub transactions: usize,
}

impl<'a> DailyReportEmail<'a> {
    pub fn new(aggregate: &'a DailyAggregate, recipient: &'a Recipient) -> Self {
        Self {
            hostel: &aggregate.hostel.name,
            date: aggregate.date.format("%Y-%m-%d").to_string(),
            recipient: &recipient.name,
            new_students: aggregate.students.joined_today,
            total_collected: format!("{:.2}", aggregate.total_collected.round_dp(2)),
            transactions: aggregate.transaction_count(),
        }
    }
}

pub fn compose_email(
    aggregate: &DailyAggregate,
    recipient: &Recipient,
    workbook: &[u8],
) -> Result<OutboundEmail, askama::Error> {
    let html = DailyReportEmail::new(aggregate, recipient).render()?;

    Ok(OutboundEmail {
        to: recipient.email.trim().to_string(),
        subject: subject(aggregate),
        html,
        attachments: vec![Attachment {
            filename: attachment_name(aggregate),
            content: workbook.to_vec(),
            content_type: XLSX_CONTENT_TYPE.to_string(),
        }],
    })
}
