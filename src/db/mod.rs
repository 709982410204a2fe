//! MySQL access for every workflow.
//!
//! A single [`MySqlStore`] wraps the process-wide pool and implements each workflow's
//! repository trait in its own submodule.

mod applications;
mod dashboard;
mod deliveries;
mod income;
mod maintenance;
mod notifications;
mod reports;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use crate::config::DatabaseConfig;

/// Create the shared connection pool and verify it can reach the server.
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;
    tracing::info!(
        max_connections = config.max_connections,
        "database connected"
    );
    Ok(pool)
}

#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// `NOT IN (...)` fragment excluding settled fees under either stored spelling.
pub(crate) fn unsettled_fee_clause(column: &str) -> String {
    let labels = crate::domain::FeeStatus::SETTLED_LABELS
        .iter()
        .map(|label| format!("'{label}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{column} NOT IN ({labels})")
}
