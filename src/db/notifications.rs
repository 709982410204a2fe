use async_trait::async_trait;

use super::MySqlStore;
use crate::domain::{HostelId, Role, UserId};
use crate::repository::RepositoryError;
use crate::workflows::push::DeviceDirectory;

#[async_trait]
impl DeviceDirectory for MySqlStore {
    async fn owners_of(&self, hostel: HostelId) -> Result<Vec<UserId>, RepositoryError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT CAST(user_id AS SIGNED) FROM users WHERE hostel_id = ? AND role_id = ?",
        )
        .bind(hostel.0)
        .bind(Role::OWNER_ID)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(|(id,)| UserId(id)).collect())
    }

    async fn tokens_for(&self, user: UserId) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT expo_push_token FROM user_devices WHERE user_id = ?")
                .bind(user.0)
                .fetch_all(self.pool())
                .await?;
        Ok(rows.into_iter().map(|(token,)| token).collect())
    }
}
