use crate::infra::{parse_date, report_job};
use chrono::{Local, NaiveDate};
use clap::Args;
use hostel_ops::config::AppConfig;
use hostel_ops::db::{create_pool, MySqlStore};
use hostel_ops::error::AppError;
use hostel_ops::telemetry;
use hostel_ops::workflows::daily_report::{CycleSummary, HostelOutcome};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportRunArgs {
    /// Report date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportSendArgs {
    /// Address that receives every hostel's report
    #[arg(long)]
    pub(crate) to: String,
    /// Report date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) async fn run_report(args: ReportRunArgs) -> Result<(), AppError> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let job = connect().await?;
    let summary = job.run_scheduled_cycle(date).await?;
    render_summary(&summary);
    Ok(())
}

pub(crate) async fn send_report(args: ReportSendArgs) -> Result<(), AppError> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let job = connect().await?;
    let summary = job.run_manual_cycle(&args.to, date).await?;
    render_summary(&summary);
    Ok(())
}

async fn connect() -> Result<hostel_ops::workflows::daily_report::DailyReportJob, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;
    let pool = create_pool(&config.database).await?;
    Ok(report_job(Arc::new(MySqlStore::new(pool)), &config))
}

fn render_summary(summary: &CycleSummary) {
    println!("Daily report for {}", summary.date);
    for report in &summary.hostels {
        println!("  {}", describe(&report.hostel_name, &report.outcome));
    }
    println!(
        "Emails sent: {}, failed hostels: {}",
        summary.emails_sent(),
        summary.failed_hostels()
    );
}

fn describe(hostel: &str, outcome: &HostelOutcome) -> String {
    match outcome {
        HostelOutcome::Delivered(dispatch) => format!(
            "{hostel}: sent {} of {} email(s)",
            dispatch.sent, dispatch.attempted
        ),
        HostelOutcome::NoRecipients => format!("{hostel}: no recipients"),
        HostelOutcome::AlreadyDelivered => format!("{hostel}: already delivered today"),
        HostelOutcome::Failed { reason } => format!("{hostel}: failed ({reason})"),
    }
}
