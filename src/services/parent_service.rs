use crate::dto::parent_dto::SubmitParentPayload;
use crate::error::{Error, Result};
use crate::models::parent::{ParentRequest, ParentStatus};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ParentService {
    pool: PgPool,
    rejection_limit: i32,
}

impl ParentService {
    pub fn new(pool: PgPool, rejection_limit: i32) -> Self {
        Self {
            pool,
            rejection_limit,
        }
    }

    /// Stores a new request with the next sequential application number.
    /// The subselect keeps numbering gapless under the single-writer
    /// assumption of the admin dashboard.
    pub async fn submit(&self, payload: SubmitParentPayload) -> Result<ParentRequest> {
        let parent = sqlx::query_as::<_, ParentRequest>(
            r#"
            INSERT INTO parents (application_number, parent_name, phone, address, student_name, grade, subjects, preferred_time)
            VALUES ((SELECT COALESCE(MAX(application_number), 0) + 1 FROM parents), $1, $2, $3, $4, $5, $6, $7)
            RETURNING id, application_number, parent_name, phone, address, student_name, grade, subjects, preferred_time, submission_date, status, vacancy_id, rejected_count, vacancy_created_at, accepted_teacher_id
            "#,
        )
        .bind(payload.parent_name)
        .bind(payload.phone)
        .bind(payload.address)
        .bind(payload.student_name)
        .bind(payload.grade)
        .bind(payload.subjects)
        .bind(payload.preferred_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(parent)
    }

    pub async fn list_all(&self) -> Result<Vec<ParentRequest>> {
        let items = sqlx::query_as::<_, ParentRequest>(
            r#"
            SELECT id, application_number, parent_name, phone, address, student_name, grade, subjects, preferred_time, submission_date, status, vacancy_id, rejected_count, vacancy_created_at, accepted_teacher_id
            FROM parents
            ORDER BY submission_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ParentRequest> {
        let parent = sqlx::query_as::<_, ParentRequest>(
            r#"
            SELECT id, application_number, parent_name, phone, address, student_name, grade, subjects, preferred_time, submission_date, status, vacancy_id, rejected_count, vacancy_created_at, accepted_teacher_id
            FROM parents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Parent application not found".to_string()))?;

        Ok(parent)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM parents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Parent application not found".to_string()));
        }
        Ok(())
    }

    /// Moves a request to the given status. The `pending` target is the
    /// convert-to-vacancy transition: it is legal only from `new`, stamps the
    /// start of the pending phase, and converting an already-converted
    /// request is an idempotent no-op that returns the record unchanged.
    pub async fn update_status(&self, id: Uuid, status: ParentStatus) -> Result<ParentRequest> {
        if status == ParentStatus::Pending {
            let converted = sqlx::query_as::<_, ParentRequest>(
                r#"
                UPDATE parents
                SET status = 'pending', vacancy_created_at = NOW()
                WHERE id = $1 AND status = 'new'
                RETURNING id, application_number, parent_name, phone, address, student_name, grade, subjects, preferred_time, submission_date, status, vacancy_id, rejected_count, vacancy_created_at, accepted_teacher_id
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            return match converted {
                Some(parent) => Ok(parent),
                // Already past `new`; report the current state instead of failing.
                None => self.get_by_id(id).await,
            };
        }

        let parent = sqlx::query_as::<_, ParentRequest>(
            r#"
            UPDATE parents
            SET status = $2
            WHERE id = $1
            RETURNING id, application_number, parent_name, phone, address, student_name, grade, subjects, preferred_time, submission_date, status, vacancy_id, rejected_count, vacancy_created_at, accepted_teacher_id
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Parent application not found".to_string()))?;

        Ok(parent)
    }

    /// Read-modify-write of the rejection counter on one request. The
    /// threshold rule lives in [`ParentRequest::register_rejection`]; races
    /// between concurrent admin rejections are bounded by the per-row update
    /// and are acceptable for a single-operator dashboard.
    pub async fn record_rejection(&self, id: Uuid) -> Result<ParentRequest> {
        let mut parent = self.get_by_id(id).await?;
        parent.register_rejection(self.rejection_limit);

        sqlx::query("UPDATE parents SET rejected_count = $2, status = $3 WHERE id = $1")
            .bind(id)
            .bind(parent.rejected_count)
            .bind(&parent.status)
            .execute(&self.pool)
            .await?;

        Ok(parent)
    }

    /// Accept-side cascade target: the request is fulfilled by this teacher
    /// on this vacancy. Forcibly moves to `done`, whatever the current state.
    pub async fn mark_done(
        &self,
        id: Uuid,
        teacher_id: Uuid,
        vacancy_id: Uuid,
    ) -> Result<ParentRequest> {
        let parent = sqlx::query_as::<_, ParentRequest>(
            r#"
            UPDATE parents
            SET status = 'done', accepted_teacher_id = $2, vacancy_id = $3
            WHERE id = $1
            RETURNING id, application_number, parent_name, phone, address, student_name, grade, subjects, preferred_time, submission_date, status, vacancy_id, rejected_count, vacancy_created_at, accepted_teacher_id
            "#,
        )
        .bind(id)
        .bind(teacher_id)
        .bind(vacancy_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Parent application not found".to_string()))?;

        Ok(parent)
    }
}
