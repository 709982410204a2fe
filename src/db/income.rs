use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::MySqlStore;
use crate::domain::HostelId;
use crate::repository::RepositoryError;
use crate::workflows::income::{
    DateRange, ExportLine, IncomeEntry, IncomeId, IncomeRecord, IncomeRepository, OtherLine,
    RentLine, SourceTotal,
};

#[derive(sqlx::FromRow)]
struct RecordRow {
    income_id: i64,
    hostel_id: i64,
    hostel_name: Option<String>,
    income_date: NaiveDate,
    amount: Decimal,
    source: String,
    payment_mode: Option<String>,
    receipt_number: Option<String>,
    description: Option<String>,
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    source: String,
    total_amount: Decimal,
    count: i64,
}

#[derive(sqlx::FromRow)]
struct RentRow {
    payment_id: i64,
    student_id: Option<i64>,
    first_name: Option<String>,
    last_name: Option<String>,
    amount: Decimal,
    payment_date: NaiveDate,
    hour: i64,
}

#[derive(sqlx::FromRow)]
struct OtherRow {
    income_id: i64,
    amount: Decimal,
    income_date: NaiveDate,
    source: String,
    description: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ExportRow {
    income_date: NaiveDate,
    amount: Decimal,
    source: String,
    payment_mode: Option<String>,
    receipt_number: Option<String>,
    description: Option<String>,
}

/// Appends ` AND <column> = ?` when a hostel filter applies.
fn hostel_filter(sql: &mut String, column: &str, hostel: Option<HostelId>) {
    if hostel.is_some() {
        sql.push_str(&format!(" AND {column} = ?"));
    }
}

#[async_trait]
impl IncomeRepository for MySqlStore {
    async fn list(
        &self,
        hostel: Option<HostelId>,
        range: Option<DateRange>,
    ) -> Result<Vec<IncomeRecord>, RepositoryError> {
        let mut sql = String::from(
            r#"
            SELECT i.income_id, i.hostel_id, h.hostel_name, i.income_date,
                   CAST(i.amount AS DECIMAL(12,2)) AS amount, i.source,
                   pm.payment_mode_name AS payment_mode, i.receipt_number, i.description
            FROM income i
            LEFT JOIN hostel_master h ON h.hostel_id = i.hostel_id
            LEFT JOIN payment_modes pm ON pm.payment_mode_id = i.payment_mode_id
            WHERE 1=1
            "#,
        );
        hostel_filter(&mut sql, "i.hostel_id", hostel);
        if range.is_some() {
            sql.push_str(" AND i.income_date BETWEEN ? AND ?");
        }
        sql.push_str(" ORDER BY i.income_date DESC, i.income_id DESC");

        let mut query = sqlx::query_as::<_, RecordRow>(&sql);
        if let Some(hostel) = hostel {
            query = query.bind(hostel.0);
        }
        if let Some(range) = range {
            query = query.bind(range.start).bind(range.end);
        }

        let rows = query.fetch_all(self.pool()).await?;
        Ok(rows
            .into_iter()
            .map(|row| IncomeRecord {
                income_id: IncomeId(row.income_id),
                hostel_id: HostelId(row.hostel_id),
                hostel_name: row.hostel_name,
                income_date: row.income_date,
                amount: row.amount,
                source: row.source,
                payment_mode: row.payment_mode,
                receipt_number: row.receipt_number,
                description: row.description,
            })
            .collect())
    }

    async fn owner_of(&self, id: IncomeId) -> Result<Option<HostelId>, RepositoryError> {
        let owner: Option<(i64,)> =
            sqlx::query_as("SELECT CAST(hostel_id AS SIGNED) FROM income WHERE income_id = ?")
                .bind(id.0)
                .fetch_optional(self.pool())
                .await?;
        Ok(owner.map(|(hostel,)| HostelId(hostel)))
    }

    async fn insert(&self, hostel: HostelId, entry: IncomeEntry) -> Result<IncomeId, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO income
                (hostel_id, income_date, amount, source, payment_mode_id, receipt_number, description)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(hostel.0)
        .bind(entry.income_date)
        .bind(entry.amount)
        .bind(&entry.source)
        .bind(entry.payment_mode_id)
        .bind(&entry.receipt_number)
        .bind(&entry.description)
        .execute(self.pool())
        .await?;

        let id = i64::try_from(result.last_insert_id()).map_err(|_| {
            RepositoryError::Unavailable("income insert id overflows".to_string())
        })?;
        Ok(IncomeId(id))
    }

    async fn update(&self, id: IncomeId, entry: IncomeEntry) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE income
            SET income_date = ?, amount = ?, source = ?, payment_mode_id = ?,
                receipt_number = ?, description = ?, updated_at = NOW()
            WHERE income_id = ?
            "#,
        )
        .bind(entry.income_date)
        .bind(entry.amount)
        .bind(&entry.source)
        .bind(entry.payment_mode_id)
        .bind(&entry.receipt_number)
        .bind(&entry.description)
        .bind(id.0)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 && self.owner_of(id).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: IncomeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM income WHERE income_id = ?")
            .bind(id.0)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn summary(&self, hostel: Option<HostelId>) -> Result<Vec<SourceTotal>, RepositoryError> {
        let mut sql = String::from(
            r#"
            SELECT source,
                   CAST(COALESCE(SUM(amount), 0) AS DECIMAL(12,2)) AS total_amount,
                   COUNT(*) AS count
            FROM income
            WHERE 1=1
            "#,
        );
        hostel_filter(&mut sql, "hostel_id", hostel);
        sql.push_str(" GROUP BY source ORDER BY total_amount DESC");

        let mut query = sqlx::query_as::<_, SummaryRow>(&sql);
        if let Some(hostel) = hostel {
            query = query.bind(hostel.0);
        }

        let rows = query.fetch_all(self.pool()).await?;
        Ok(rows
            .into_iter()
            .map(|row| SourceTotal {
                source: row.source,
                total_amount: row.total_amount,
                count: u64::try_from(row.count).unwrap_or_default(),
            })
            .collect())
    }

    async fn rent_lines(
        &self,
        hostel: Option<HostelId>,
        range: DateRange,
    ) -> Result<Vec<RentLine>, RepositoryError> {
        // DATE columns report hour 0.
        let mut sql = String::from(
            r#"
            SELECT fp.payment_id, s.student_id, s.first_name, s.last_name,
                   CAST(fp.amount AS DECIMAL(12,2)) AS amount,
                   DATE(fp.payment_date) AS payment_date,
                   CAST(HOUR(fp.payment_date) AS SIGNED) AS hour
            FROM fee_payments fp
            LEFT JOIN students s ON s.student_id = fp.student_id
            WHERE DATE(fp.payment_date) BETWEEN ? AND ?
            "#,
        );
        hostel_filter(&mut sql, "s.hostel_id", hostel);

        let mut query = sqlx::query_as::<_, RentRow>(&sql)
            .bind(range.start)
            .bind(range.end);
        if let Some(hostel) = hostel {
            query = query.bind(hostel.0);
        }

        let rows = query.fetch_all(self.pool()).await?;
        Ok(rows
            .into_iter()
            .map(|row| RentLine {
                payment_id: row.payment_id,
                student_id: row.student_id,
                first_name: row.first_name,
                last_name: row.last_name,
                amount: row.amount,
                payment_date: row.payment_date,
                hour: u32::try_from(row.hour).unwrap_or(0),
            })
            .collect())
    }

    async fn other_lines(
        &self,
        hostel: Option<HostelId>,
        range: DateRange,
    ) -> Result<Vec<OtherLine>, RepositoryError> {
        let mut sql = String::from(
            r#"
            SELECT income_id, CAST(amount AS DECIMAL(12,2)) AS amount, income_date,
                   source, description
            FROM income
            WHERE income_date BETWEEN ? AND ?
            "#,
        );
        hostel_filter(&mut sql, "hostel_id", hostel);

        let mut query = sqlx::query_as::<_, OtherRow>(&sql)
            .bind(range.start)
            .bind(range.end);
        if let Some(hostel) = hostel {
            query = query.bind(hostel.0);
        }

        let rows = query.fetch_all(self.pool()).await?;
        Ok(rows
            .into_iter()
            .map(|row| OtherLine {
                income_id: row.income_id,
                amount: row.amount,
                income_date: row.income_date,
                source: row.source,
                description: row.description,
            })
            .collect())
    }

    async fn export_lines(
        &self,
        hostel: Option<HostelId>,
        range: DateRange,
    ) -> Result<Vec<ExportLine>, RepositoryError> {
        let mut sql = String::from(
            r#"
            SELECT i.income_date, CAST(i.amount AS DECIMAL(12,2)) AS amount, i.source,
                   pm.payment_mode_name AS payment_mode, i.receipt_number, i.description
            FROM income i
            LEFT JOIN payment_modes pm ON pm.payment_mode_id = i.payment_mode_id
            WHERE i.income_date BETWEEN ? AND ?
            "#,
        );
        hostel_filter(&mut sql, "i.hostel_id", hostel);
        sql.push_str(" ORDER BY i.income_date ASC, i.income_id ASC");

        let mut query = sqlx::query_as::<_, ExportRow>(&sql)
            .bind(range.start)
            .bind(range.end);
        if let Some(hostel) = hostel {
            query = query.bind(hostel.0);
        }

        let rows = query.fetch_all(self.pool()).await?;
        Ok(rows
            .into_iter()
            .map(|row| ExportLine {
                income_date: row.income_date,
                amount: row.amount,
                source: row.source,
                payment_mode: row.payment_mode,
                receipt_number: row.receipt_number,
                description: row.description,
            })
            .collect())
    }
}
