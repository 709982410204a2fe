use chrono::NaiveDate;
use hostel_ops::config::AppConfig;
use hostel_ops::db::MySqlStore;
use hostel_ops::workflows::applications::ApplicationService;
use hostel_ops::workflows::daily_report::{DailyReportJob, HttpMailer};
use hostel_ops::workflows::dashboard::DashboardService;
use hostel_ops::workflows::income::IncomeService;
use hostel_ops::workflows::maintenance::MaintenanceService;
use hostel_ops::workflows::push::{ExpoPushClient, PushNotifier};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Every workflow service wired to the shared MySQL store.
pub(crate) struct AppServices {
    pub(crate) reports: Arc<DailyReportJob>,
    pub(crate) applications: Arc<ApplicationService<MySqlStore>>,
    pub(crate) dashboard: Arc<DashboardService<MySqlStore>>,
    pub(crate) income: Arc<IncomeService<MySqlStore>>,
    pub(crate) maintenance: Arc<MaintenanceService<MySqlStore>>,
}

impl AppServices {
    pub(crate) fn build(store: MySqlStore, config: &AppConfig) -> Self {
        let store = Arc::new(store);
        let notifier = Arc::new(PushNotifier::new(
            store.clone(),
            Arc::new(ExpoPushClient::from_config(&config.push)),
        ));

        Self {
            reports: Arc::new(report_job(store.clone(), config)),
            applications: Arc::new(ApplicationService::new(store.clone())),
            dashboard: Arc::new(DashboardService::new(store.clone())),
            income: Arc::new(IncomeService::new(store.clone())),
            maintenance: Arc::new(MaintenanceService::new(store, notifier)),
        }
    }
}

pub(crate) fn report_job(store: Arc<MySqlStore>, config: &AppConfig) -> DailyReportJob {
    let mailer = HttpMailer::from_config(&config.mail);
    if !mailer.is_configured() {
        warn!("MAIL_API_URL is not set; daily report emails will fail");
    }
    DailyReportJob::new(store.clone(), Arc::new(mailer)).with_ledger(store)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
