use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::job::DailyReportJob;

/// Wall-clock time at which the timed cycle fires every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub at: NaiveTime,
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            at: NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl DailySchedule {
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    /// First firing strictly after `now`, in the zone of `now`.
    ///
    /// Local times skipped by a DST jump fall through to the next day.
    pub fn next_run_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let zone = now.timezone();
        let mut day = now.date_naive();
        for _ in 0..3 {
            if let Some(candidate) = zone
                .from_local_datetime(&day.and_time(self.at))
                .earliest()
            {
                if candidate > *now {
                    return Some(candidate);
                }
            }
            day = day.succ_opt()?;
        }
        None
    }
}

/// Runs the timed cycle forever on the local clock, reporting on the day it fires.
pub fn spawn_daily(job: Arc<DailyReportJob>, schedule: DailySchedule) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(at = %schedule.at, "daily report scheduler started");
        loop {
            let now = Local::now();
            let Some(next) = schedule.next_run_after(&now) else {
                error!("could not compute next daily report run; scheduler stopped");
                return;
            };

            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            info!(next_run = %next, "daily report scheduled");
            tokio::time::sleep(wait).await;

            let date: NaiveDate = next.date_naive();
            match job.run_scheduled_cycle(date).await {
                Ok(summary) => info!(
                    %date,
                    emails_sent = summary.emails_sent(),
                    failed_hostels = summary.failed_hostels(),
                    "scheduled daily report finished"
                ),
                Err(err) => warn!(%date, error = %err, "scheduled daily report failed"),
            }

            // The wall clock may lag the timer slightly.
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    })
}
