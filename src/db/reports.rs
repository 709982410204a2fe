use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{unsettled_fee_clause, MySqlStore};
use crate::domain::{HostelId, Role};
use crate::repository::RepositoryError;
use crate::workflows::daily_report::{
    FeeLine, Hostel, PaymentLine, Recipient, ReportSource, StudentCounts,
};

#[derive(sqlx::FromRow)]
struct HostelRow {
    hostel_id: i64,
    hostel_name: String,
}

#[derive(sqlx::FromRow)]
struct CountsRow {
    total: i64,
    active: i64,
    joined_today: i64,
    vacated_today: i64,
    with_room: i64,
}

#[derive(sqlx::FromRow)]
struct FeeRow {
    first_name: Option<String>,
    last_name: Option<String>,
    room_number: Option<String>,
    balance: Option<Decimal>,
    fee_month: Option<String>,
    due_date: Option<NaiveDate>,
    fee_status: Option<String>,
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    first_name: Option<String>,
    last_name: Option<String>,
    room_number: Option<String>,
    amount: Option<Decimal>,
    payment_date: NaiveDate,
    payment_mode_name: Option<String>,
    receipt_number: Option<String>,
}

#[derive(sqlx::FromRow)]
struct OwnerRow {
    email: Option<String>,
    full_name: Option<String>,
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl ReportSource for MySqlStore {
    async fn active_hostels(&self) -> Result<Vec<Hostel>, RepositoryError> {
        let rows: Vec<HostelRow> = sqlx::query_as(
            "SELECT hostel_id, hostel_name FROM hostel_master WHERE is_active = 1 ORDER BY hostel_id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Hostel {
                id: HostelId(row.hostel_id),
                name: row.hostel_name,
            })
            .collect())
    }

    async fn student_counts(
        &self,
        hostel: HostelId,
        day: NaiveDate,
    ) -> Result<StudentCounts, RepositoryError> {
        let row: CountsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(CASE WHEN status = 1 THEN 1 END) AS active,
                COUNT(CASE WHEN DATE(created_at) = ? THEN 1 END) AS joined_today,
                COUNT(CASE WHEN status = 0 AND DATE(updated_at) = ? THEN 1 END) AS vacated_today,
                COUNT(CASE WHEN status = 1 AND room_id IS NOT NULL THEN 1 END) AS with_room
            FROM students
            WHERE hostel_id = ?
            "#,
        )
        .bind(day)
        .bind(day)
        .bind(hostel.0)
        .fetch_one(self.pool())
        .await?;

        Ok(StudentCounts {
            total: count(row.total),
            active: count(row.active),
            joined_today: count(row.joined_today),
            vacated_today: count(row.vacated_today),
            with_room: count(row.with_room),
        })
    }

    async fn unsettled_fees(&self, hostel: HostelId) -> Result<Vec<FeeLine>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT s.first_name, s.last_name, r.room_number,
                   CAST(mf.balance AS DECIMAL(12,2)) AS balance,
                   mf.fee_month, mf.due_date, mf.fee_status
            FROM monthly_fees mf
            JOIN students s ON s.student_id = mf.student_id
            LEFT JOIN rooms r ON r.room_id = s.room_id
            WHERE mf.hostel_id = ? AND {}
            ORDER BY mf.due_date, mf.fee_id
            "#,
            unsettled_fee_clause("mf.fee_status")
        );
        let rows: Vec<FeeRow> = sqlx::query_as(&sql)
            .bind(hostel.0)
            .fetch_all(self.pool())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| FeeLine {
                first_name: row.first_name.unwrap_or_default(),
                last_name: row.last_name.unwrap_or_default(),
                room_number: row.room_number,
                balance: row.balance.unwrap_or_default(),
                period: row.fee_month.unwrap_or_default(),
                due_date: row.due_date,
                status: row.fee_status.unwrap_or_default(),
            })
            .collect())
    }

    async fn payments_on(
        &self,
        hostel: HostelId,
        day: NaiveDate,
    ) -> Result<Vec<PaymentLine>, RepositoryError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT s.first_name, s.last_name, r.room_number,
                   CAST(fp.amount AS DECIMAL(12,2)) AS amount,
                   fp.payment_date, pm.payment_mode_name, fp.receipt_number
            FROM fee_payments fp
            JOIN students s ON s.student_id = fp.student_id
            LEFT JOIN rooms r ON r.room_id = s.room_id
            LEFT JOIN payment_modes pm ON pm.payment_mode_id = fp.payment_mode_id
            WHERE fp.hostel_id = ? AND fp.payment_date = ?
            ORDER BY fp.payment_id
            "#,
        )
        .bind(hostel.0)
        .bind(day)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PaymentLine {
                first_name: row.first_name.unwrap_or_default(),
                last_name: row.last_name.unwrap_or_default(),
                room_number: row.room_number,
                amount: row.amount.unwrap_or_default(),
                payment_date: row.payment_date,
                mode_name: row.payment_mode_name,
                receipt_number: row.receipt_number,
            })
            .collect())
    }

    async fn owners(&self, hostel: HostelId) -> Result<Vec<Recipient>, RepositoryError> {
        let rows: Vec<OwnerRow> = sqlx::query_as(
            "SELECT email, full_name FROM users WHERE hostel_id = ? AND role_id = ? ORDER BY user_id",
        )
        .bind(hostel.0)
        .bind(Role::OWNER_ID)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Recipient {
                email: row.email.unwrap_or_default(),
                name: row.full_name.unwrap_or_default(),
            })
            .collect())
    }
}
