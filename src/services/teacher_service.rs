use crate::dto::teacher_dto::SignupPayload;
use crate::error::{Error, Result};
use crate::models::teacher::{Teacher, TeacherStatus};
use crate::services::parent_service::ParentService;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct TeacherService {
    pool: PgPool,
    parents: ParentService,
}

impl TeacherService {
    pub fn new(pool: PgPool, parents: ParentService) -> Self {
        Self { pool, parents }
    }

    pub async fn create(&self, payload: SignupPayload, password_hash: String) -> Result<Teacher> {
        let exists = sqlx::query("SELECT id FROM teachers WHERE email = $1")
            .bind(&payload.email)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_some() {
            return Err(Error::BadRequest("Email already registered".to_string()));
        }

        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            INSERT INTO teachers (full_name, email, phone, password_hash, address, latitude, longitude, grade, subjects, agreement_accepted, cv_url, certificates)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, full_name, email, phone, password_hash, address, latitude, longitude, grade, subjects, agreement_accepted, cv_url, certificates, status, created_at, updated_at
            "#,
        )
        .bind(payload.full_name)
        .bind(payload.email)
        .bind(payload.phone)
        .bind(password_hash)
        .bind(payload.address)
        .bind(payload.latitude)
        .bind(payload.longitude)
        .bind(payload.grade)
        .bind(payload.subjects)
        .bind(payload.agreement_accepted)
        .bind(payload.cv_url)
        .bind(payload.certificates)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db) = &err {
                if db.is_unique_violation() {
                    return Error::BadRequest("Email already registered".to_string());
                }
            }
            err.into()
        })?;

        Ok(teacher)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Teacher> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, full_name, email, phone, password_hash, address, latitude, longitude, grade, subjects, agreement_accepted, cv_url, certificates, status, created_at, updated_at
            FROM teachers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Teacher not found".to_string()))?;

        Ok(teacher)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Teacher>> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, full_name, email, phone, password_hash, address, latitude, longitude, grade, subjects, agreement_accepted, cv_url, certificates, status, created_at, updated_at
            FROM teachers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(teacher)
    }

    pub async fn list_all(&self) -> Result<Vec<Teacher>> {
        let teachers = sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, full_name, email, phone, password_hash, address, latitude, longitude, grade, subjects, agreement_accepted, cv_url, certificates, status, created_at, updated_at
            FROM teachers
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(teachers)
    }

    pub async fn list_by_status(&self, status: TeacherStatus) -> Result<Vec<Teacher>> {
        let teachers = sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, full_name, email, phone, password_hash, address, latitude, longitude, grade, subjects, agreement_accepted, cv_url, certificates, status, created_at, updated_at
            FROM teachers
            WHERE status = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(teachers)
    }

    /// Admin review of a direct signup. The target set is {approved,
    /// rejected}; there is no route back to pending.
    pub async fn set_status(&self, id: Uuid, status: TeacherStatus) -> Result<Teacher> {
        if !status.is_admin_decision() {
            return Err(Error::InvalidStatus(format!(
                "teacher status cannot be set to '{}'",
                status.as_str()
            )));
        }
        self.write_status(id, status).await
    }

    /// Accepts a teacher against a vacancy: the profile moves to approved and
    /// the linked parent request, when given, is cascaded to `done`. The
    /// teacher update is the system of record; a failed cascade is logged and
    /// never rolls it back.
    pub async fn accept_application(
        &self,
        teacher_id: Uuid,
        vacancy_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<Teacher> {
        let teacher = self.write_status(teacher_id, TeacherStatus::Approved).await?;

        if let Some(parent_id) = parent_id {
            self.cascade_accept(parent_id, teacher_id, vacancy_id).await;
        }

        Ok(teacher)
    }

    /// Rejects a teacher against a vacancy: the profile moves to rejected and
    /// the linked parent request, when given, takes one more rejection, which
    /// may close it as not_done.
    pub async fn reject_application(
        &self,
        teacher_id: Uuid,
        vacancy_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<Teacher> {
        let teacher = self.write_status(teacher_id, TeacherStatus::Rejected).await?;

        if let Some(parent_id) = parent_id {
            self.cascade_reject(parent_id, teacher_id, vacancy_id).await;
        }

        Ok(teacher)
    }

    async fn write_status(&self, id: Uuid, status: TeacherStatus) -> Result<Teacher> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            UPDATE teachers
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, full_name, email, phone, password_hash, address, latitude, longitude, grade, subjects, agreement_accepted, cv_url, certificates, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Teacher not found".to_string()))?;

        Ok(teacher)
    }

    async fn cascade_accept(&self, parent_id: Uuid, teacher_id: Uuid, vacancy_id: Uuid) {
        match self.parents.mark_done(parent_id, teacher_id, vacancy_id).await {
            Ok(parent) => {
                tracing::info!(
                    parent_id = %parent.id,
                    teacher_id = %teacher_id,
                    "parent request marked done by accept cascade"
                );
            }
            Err(Error::NotFound(_)) => {
                tracing::warn!(parent_id = %parent_id, "accept cascade: parent request not found");
            }
            Err(err) => {
                tracing::error!(
                    parent_id = %parent_id,
                    error = %err,
                    "accept cascade failed; teacher status already committed"
                );
            }
        }
    }

    async fn cascade_reject(&self, parent_id: Uuid, teacher_id: Uuid, vacancy_id: Uuid) {
        match self.parents.record_rejection(parent_id).await {
            Ok(parent) => {
                tracing::info!(
                    parent_id = %parent.id,
                    teacher_id = %teacher_id,
                    vacancy_id = %vacancy_id,
                    rejected_count = parent.rejected_count,
                    status = %parent.status,
                    "rejection recorded on parent request"
                );
            }
            Err(Error::NotFound(_)) => {
                tracing::warn!(parent_id = %parent_id, "reject cascade: parent request not found");
            }
            Err(err) => {
                tracing::error!(
                    parent_id = %parent_id,
                    error = %err,
                    "reject cascade failed; teacher status already committed"
                );
            }
        }
    }
}
