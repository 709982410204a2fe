use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{unsettled_fee_clause, MySqlStore};
use crate::domain::HostelId;
use crate::repository::RepositoryError;
use crate::workflows::dashboard::{DashboardRepository, DueFee, PeriodFeeTotals, RoomLoad};

#[derive(sqlx::FromRow)]
struct TotalsRow {
    total_expected: Decimal,
    total_collected: Decimal,
    total_pending: Decimal,
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    room_id: i64,
    room_type_name: Option<String>,
    description: Option<String>,
    active_students: Option<i64>,
    occupied_beds: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct DueRow {
    fee_id: i64,
    student_id: i64,
    first_name: Option<String>,
    last_name: Option<String>,
    room_number: String,
    amount: Option<Decimal>,
    due_date: Option<NaiveDate>,
    phone: Option<String>,
}

fn beds(value: Option<i64>) -> Option<u32> {
    value.and_then(|count| u32::try_from(count).ok())
}

#[async_trait]
impl DashboardRepository for MySqlStore {
    async fn period_fee_totals(
        &self,
        hostel: HostelId,
        period: &str,
    ) -> Result<PeriodFeeTotals, RepositoryError> {
        let row: TotalsRow = sqlx::query_as(
            r#"
            SELECT
                CAST(COALESCE(SUM(monthly_rent + carry_forward), 0) AS DECIMAL(12,2)) AS total_expected,
                CAST(COALESCE(SUM(paid_amount), 0) AS DECIMAL(12,2)) AS total_collected,
                CAST(COALESCE(SUM(balance), 0) AS DECIMAL(12,2)) AS total_pending
            FROM monthly_fees
            WHERE hostel_id = ? AND fee_month = ?
            "#,
        )
        .bind(hostel.0)
        .bind(period)
        .fetch_one(self.pool())
        .await?;

        Ok(PeriodFeeTotals {
            expected: row.total_expected,
            collected: row.total_collected,
            pending: row.total_pending,
        })
    }

    async fn collected_on(&self, hostel: HostelId, day: NaiveDate) -> Result<Decimal, RepositoryError> {
        let (total,): (Decimal,) = sqlx::query_as(
            r#"
            SELECT CAST(COALESCE(SUM(amount), 0) AS DECIMAL(12,2))
            FROM fee_payments
            WHERE hostel_id = ? AND DATE(payment_date) = ?
            "#,
        )
        .bind(hostel.0)
        .bind(day)
        .fetch_one(self.pool())
        .await?;
        Ok(total)
    }

    async fn rooms(&self, hostel: HostelId) -> Result<Vec<RoomLoad>, RepositoryError> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            r#"
            SELECT r.room_id, rt.room_type_name, rt.description,
                   occupancy.active_students,
                   CAST(r.occupied_beds AS SIGNED) AS occupied_beds
            FROM rooms r
            LEFT JOIN room_types rt ON rt.room_type_id = r.room_type_id
            LEFT JOIN (
                SELECT room_id, COUNT(*) AS active_students
                FROM students
                WHERE hostel_id = ? AND status = 1 AND room_id IS NOT NULL
                GROUP BY room_id
            ) occupancy ON occupancy.room_id = r.room_id
            WHERE r.hostel_id = ?
            ORDER BY r.room_id
            "#,
        )
        .bind(hostel.0)
        .bind(hostel.0)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| RoomLoad {
                room_id: row.room_id,
                room_type_name: row.room_type_name,
                description: row.description,
                active_students: beds(row.active_students),
                occupied_beds: beds(row.occupied_beds).unwrap_or(0),
            })
            .collect())
    }

    async fn due_soon(&self, hostel: HostelId, limit: u32) -> Result<Vec<DueFee>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT mf.fee_id, mf.student_id, s.first_name, s.last_name,
                   COALESCE(r.room_number, 'N/A') AS room_number,
                   CAST(mf.balance AS DECIMAL(12,2)) AS amount,
                   mf.due_date, s.phone
            FROM monthly_fees mf
            JOIN students s ON s.student_id = mf.student_id
            LEFT JOIN rooms r ON r.room_id = s.room_id
            WHERE mf.hostel_id = ? AND s.status = 1 AND {}
            ORDER BY mf.due_date IS NULL, mf.due_date ASC
            LIMIT ?
            "#,
            unsettled_fee_clause("mf.fee_status")
        );
        let rows: Vec<DueRow> = sqlx::query_as(&sql)
            .bind(hostel.0)
            .bind(limit)
            .fetch_all(self.pool())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| DueFee {
                fee_id: row.fee_id,
                student_id: row.student_id,
                first_name: row.first_name.unwrap_or_default(),
                last_name: row.last_name.unwrap_or_default(),
                room_number: row.room_number,
                amount: row.amount.unwrap_or_default(),
                due_date: row.due_date,
                phone: row.phone,
                days_left: None,
            })
            .collect())
    }
}
