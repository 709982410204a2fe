use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::MySqlStore;
use crate::domain::{HostelId, UserId};
use crate::repository::RepositoryError;
use crate::workflows::maintenance::domain::ISSUE_STATUS_OPEN;
use crate::workflows::maintenance::{IssueId, MaintenanceIssue, MaintenanceRepository, NewIssue};

#[derive(sqlx::FromRow)]
struct IssueRow {
    issue_id: i64,
    hostel_id: i64,
    room: String,
    title: String,
    category: Option<String>,
    priority: String,
    description: Option<String>,
    cost: Option<Decimal>,
    status: String,
    created_by: Option<i64>,
    created_at: NaiveDateTime,
}

#[async_trait]
impl MaintenanceRepository for MySqlStore {
    async fn insert(&self, issue: &NewIssue) -> Result<IssueId, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO maintenance_issues
                (hostel_id, room, title, category, priority, description, cost, status,
                 created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(issue.hostel_id.0)
        .bind(&issue.room)
        .bind(&issue.title)
        .bind(&issue.category)
        .bind(&issue.priority)
        .bind(&issue.description)
        .bind(issue.cost)
        .bind(ISSUE_STATUS_OPEN)
        .bind(issue.created_by.0)
        .bind(issue.created_at)
        .execute(self.pool())
        .await?;

        let id = i64::try_from(result.last_insert_id()).map_err(|_| {
            RepositoryError::Unavailable("maintenance insert id overflows".to_string())
        })?;
        Ok(IssueId(id))
    }

    async fn list(&self, hostel: Option<HostelId>) -> Result<Vec<MaintenanceIssue>, RepositoryError> {
        let mut sql = String::from(
            r#"
            SELECT issue_id, hostel_id, room, title, category, priority, description,
                   CAST(cost AS DECIMAL(12,2)) AS cost, status, created_by, created_at
            FROM maintenance_issues
            WHERE 1=1
            "#,
        );
        if hostel.is_some() {
            sql.push_str(" AND hostel_id = ?");
        }
        sql.push_str(" ORDER BY created_at DESC, issue_id DESC");

        let mut query = sqlx::query_as::<_, IssueRow>(&sql);
        if let Some(hostel) = hostel {
            query = query.bind(hostel.0);
        }

        let rows = query.fetch_all(self.pool()).await?;
        Ok(rows
            .into_iter()
            .map(|row| MaintenanceIssue {
                id: IssueId(row.issue_id),
                hostel_id: HostelId(row.hostel_id),
                room: row.room,
                title: row.title,
                category: row.category,
                priority: row.priority,
                description: row.description,
                cost: row.cost,
                status: row.status,
                created_by: row.created_by.map(UserId),
                created_at: row.created_at,
            })
            .collect())
    }
}
