use async_trait::async_trait;
use chrono::NaiveDate;

use super::MySqlStore;
use crate::domain::HostelId;
use crate::repository::RepositoryError;
use crate::workflows::daily_report::DeliveryLog;

/// Delivery claims in `daily_report_deliveries`, unique on `(hostel_id, report_date)`.
#[async_trait]
impl DeliveryLog for MySqlStore {
    async fn claim(&self, hostel: HostelId, date: NaiveDate) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO daily_report_deliveries (hostel_id, report_date, claimed_at)
            VALUES (?, ?, NOW())
            "#,
        )
        .bind(hostel.0)
        .bind(date)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, hostel: HostelId, date: NaiveDate) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM daily_report_deliveries WHERE hostel_id = ? AND report_date = ?")
            .bind(hostel.0)
            .bind(date)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn prune_before(&self, keep_from: NaiveDate) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM daily_report_deliveries WHERE report_date < ?")
            .bind(keep_from)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
