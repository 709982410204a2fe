use crate::cli::ServeArgs;
use crate::infra::{AppServices, AppState};
use crate::routes::{with_ops_routes, workflow_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hostel_ops::config::AppConfig;
use hostel_ops::db::{create_pool, MySqlStore};
use hostel_ops::error::AppError;
use hostel_ops::telemetry;
use hostel_ops::workflows::daily_report::{spawn_daily, DailySchedule};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let pool = create_pool(&config.database).await?;
    let services = AppServices::build(MySqlStore::new(pool), &config);

    if config.report.scheduler_enabled && !args.no_scheduler {
        let schedule = DailySchedule::new(config.report.run_at);
        spawn_daily(services.reports.clone(), schedule);
        info!(run_at = %config.report.run_at, "daily report scheduler started");
    } else {
        info!("daily report scheduler disabled");
    }

    let app = with_ops_routes(workflow_routes(&services))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hostel operations api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
