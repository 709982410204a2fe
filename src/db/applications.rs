use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use super::MySqlStore;
use crate::domain::{HostelId, UserId};
use crate::repository::RepositoryError;
use crate::workflows::applications::domain::ADMISSION_STATUS_UNPAID;
use crate::workflows::applications::{
    Admission, Application, ApplicationId, ApplicationRepository, ApplicationStatus,
    NewApplication, Review, StudentId,
};

const APPLICATION_COLUMNS: &str = "application_id, hostel_id, first_name, last_name, phone, \
     email, date_of_birth, gender, permanent_address, guardian_name, guardian_phone, \
     id_proof_number, status, rejection_reason, submitted_at, reviewed_at, reviewed_by";

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    application_id: i64,
    hostel_id: i64,
    first_name: String,
    last_name: String,
    phone: String,
    email: Option<String>,
    date_of_birth: Option<NaiveDate>,
    gender: Option<String>,
    permanent_address: Option<String>,
    guardian_name: Option<String>,
    guardian_phone: Option<String>,
    id_proof_number: Option<String>,
    status: String,
    rejection_reason: Option<String>,
    submitted_at: NaiveDateTime,
    reviewed_at: Option<NaiveDateTime>,
    reviewed_by: Option<i64>,
}

impl ApplicationRow {
    fn into_application(self) -> Result<Application, RepositoryError> {
        let status = ApplicationStatus::parse(&self.status).ok_or_else(|| {
            RepositoryError::Unavailable(format!(
                "application {} has unknown status '{}'",
                self.application_id, self.status
            ))
        })?;

        Ok(Application {
            application_id: ApplicationId(self.application_id),
            hostel_id: HostelId(self.hostel_id),
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            date_of_birth: self.date_of_birth,
            gender: self.gender.unwrap_or_default(),
            permanent_address: self.permanent_address,
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            id_proof_number: self.id_proof_number,
            status,
            rejection_reason: self.rejection_reason,
            submitted_at: self.submitted_at,
            reviewed_at: self.reviewed_at,
            reviewed_by: self.reviewed_by.map(UserId),
        })
    }
}

fn last_insert_id(id: u64) -> Result<i64, RepositoryError> {
    i64::try_from(id).map_err(|_| RepositoryError::Unavailable(format!("insert id {id} overflows")))
}

#[async_trait]
impl ApplicationRepository for MySqlStore {
    async fn hostel_exists(&self, hostel: HostelId) -> Result<bool, RepositoryError> {
        let found: Option<(i64,)> =
            sqlx::query_as("SELECT CAST(hostel_id AS SIGNED) FROM hostel_master WHERE hostel_id = ?")
                .bind(hostel.0)
                .fetch_optional(self.pool())
                .await?;
        Ok(found.is_some())
    }

    async fn insert(&self, application: NewApplication) -> Result<ApplicationId, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO student_applications
                (hostel_id, first_name, last_name, phone, email, date_of_birth, gender,
                 permanent_address, guardian_name, guardian_phone, id_proof_number,
                 status, submitted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(application.hostel_id.0)
        .bind(&application.first_name)
        .bind(&application.last_name)
        .bind(&application.phone)
        .bind(&application.email)
        .bind(application.date_of_birth)
        .bind(&application.gender)
        .bind(&application.permanent_address)
        .bind(&application.guardian_name)
        .bind(&application.guardian_phone)
        .bind(&application.id_proof_number)
        .bind(ApplicationStatus::Pending.label())
        .bind(application.submitted_at)
        .execute(self.pool())
        .await?;

        Ok(ApplicationId(last_insert_id(result.last_insert_id())?))
    }

    async fn pending(&self, hostel: Option<HostelId>) -> Result<Vec<Application>, RepositoryError> {
        let mut sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM student_applications WHERE status = ?"
        );
        if hostel.is_some() {
            sql.push_str(" AND hostel_id = ?");
        }
        sql.push_str(" ORDER BY submitted_at DESC, application_id DESC");

        let mut query = sqlx::query_as::<_, ApplicationRow>(&sql).bind(ApplicationStatus::Pending.label());
        if let Some(hostel) = hostel {
            query = query.bind(hostel.0);
        }

        query
            .fetch_all(self.pool())
            .await?
            .into_iter()
            .map(ApplicationRow::into_application)
            .collect()
    }

    async fn fetch(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM student_applications WHERE application_id = ?"
        );
        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id.0)
            .fetch_optional(self.pool())
            .await?
            .map(ApplicationRow::into_application)
            .transpose()
    }

    async fn approve(
        &self,
        application: &Application,
        admission: Admission,
        review: Review,
    ) -> Result<StudentId, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let claimed = sqlx::query(
            r#"
            UPDATE student_applications
            SET status = ?, reviewed_at = ?, reviewed_by = ?
            WHERE application_id = ? AND status = ?
            "#,
        )
        .bind(ApplicationStatus::Approved.label())
        .bind(review.reviewed_at)
        .bind(review.reviewer.0)
        .bind(application.application_id.0)
        .bind(ApplicationStatus::Pending.label())
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::Conflict);
        }

        let student = sqlx::query(
            r#"
            INSERT INTO students
                (hostel_id, first_name, last_name, phone, email, date_of_birth, gender,
                 permanent_address, guardian_name, guardian_phone, id_proof_number,
                 room_id, monthly_rent, admission_date, admission_fee, admission_status,
                 status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(application.hostel_id.0)
        .bind(&application.first_name)
        .bind(&application.last_name)
        .bind(&application.phone)
        .bind(&application.email)
        .bind(application.date_of_birth)
        .bind(&application.gender)
        .bind(&application.permanent_address)
        .bind(&application.guardian_name)
        .bind(&application.guardian_phone)
        .bind(&application.id_proof_number)
        .bind(admission.room_id)
        .bind(admission.monthly_rent)
        .bind(admission.admitted_on)
        .bind(admission.admission_fee)
        .bind(ADMISSION_STATUS_UNPAID)
        .bind(review.reviewed_at)
        .bind(review.reviewed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(StudentId(last_insert_id(student.last_insert_id())?))
    }

    async fn reject(
        &self,
        id: ApplicationId,
        reason: Option<String>,
        review: Review,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE student_applications
            SET status = ?, rejection_reason = ?, reviewed_at = ?, reviewed_by = ?
            WHERE application_id = ? AND status = ?
            "#,
        )
        .bind(ApplicationStatus::Rejected.label())
        .bind(reason)
        .bind(review.reviewed_at)
        .bind(review.reviewer.0)
        .bind(id.0)
        .bind(ApplicationStatus::Pending.label())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict);
        }
        Ok(())
    }
}
