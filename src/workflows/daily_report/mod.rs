//! End-of-day owner report.
//!
//! For every active hostel the job aggregates the day's students, fees and payments,
//! renders them into a four-sheet workbook and mails it to the hostel's owners.
//! Hostels are processed one after another and a failing hostel never stops the cycle.

pub mod aggregate;
pub mod dispatch;
pub mod job;
pub mod ledger;
pub mod mailer;
pub mod router;
pub mod schedule;
pub mod source;
pub mod workbook;

#[cfg(test)]
mod tests;

pub use aggregate::{DailyAggregate, ModeTotal};
pub use dispatch::{DispatchOutcome, ReportDispatcher};
pub use job::{CycleSummary, DailyReportJob, HostelOutcome, HostelReport, Recipients, ReportError};
pub use ledger::{DeliveryLedger, DeliveryLog};
pub use mailer::{Attachment, HttpMailer, MailError, Mailer, OutboundEmail};
pub use router::report_router;
pub use schedule::{spawn_daily, DailySchedule};
pub use source::{FeeLine, Hostel, PaymentLine, Recipient, ReportSource, StudentCounts};
