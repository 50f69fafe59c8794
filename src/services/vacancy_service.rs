use crate::dto::vacancy_dto::{
    ApplicantSummary, CreateVacancyPayload, TeacherApplicationView, UpdateVacancyPayload,
    VacancySummary,
};
use crate::error::{Error, Result};
use crate::models::vacancy::{ApplicationStatus, Vacancy, VacancyApplication, VacancyStatus};
use sqlx::{PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone)]
pub struct VacancyService {
    pool: PgPool,
    capacity: i64,
}

impl VacancyService {
    pub fn new(pool: PgPool, capacity: i64) -> Self {
        Self { pool, capacity }
    }

    pub async fn create(&self, created_by: Uuid, payload: CreateVacancyPayload) -> Result<Vacancy> {
        let vacancy = sqlx::query_as::<_, Vacancy>(
            r#"
            INSERT INTO vacancies (title, subject, description, requirements, salary, featured, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, subject, description, requirements, salary, status, featured, created_by, applications, created_at, updated_at
            "#,
        )
        .bind(payload.title)
        .bind(payload.subject)
        .bind(payload.description)
        .bind(payload.requirements)
        .bind(payload.salary)
        .bind(payload.featured)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(vacancy)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateVacancyPayload) -> Result<Vacancy> {
        let vacancy = sqlx::query_as::<_, Vacancy>(
            r#"
            UPDATE vacancies
            SET
                title = COALESCE($2, title),
                subject = COALESCE($3, subject),
                description = COALESCE($4, description),
                requirements = COALESCE($5, requirements),
                salary = COALESCE($6, salary),
                featured = COALESCE($7, featured),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, subject, description, requirements, salary, status, featured, created_by, applications, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(payload.title)
        .bind(payload.subject)
        .bind(payload.description)
        .bind(payload.requirements)
        .bind(payload.salary)
        .bind(payload.featured)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Vacancy not found".to_string()))?;

        Ok(vacancy)
    }

    pub async fn set_status(&self, id: Uuid, status: VacancyStatus) -> Result<Vacancy> {
        let vacancy = sqlx::query_as::<_, Vacancy>(
            r#"
            UPDATE vacancies
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, subject, description, requirements, salary, status, featured, created_by, applications, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Vacancy not found".to_string()))?;

        Ok(vacancy)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM vacancies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Vacancy not found".to_string()));
        }
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Vacancy> {
        let vacancy = sqlx::query_as::<_, Vacancy>(
            r#"
            SELECT id, title, subject, description, requirements, salary, status, featured, created_by, applications, created_at, updated_at
            FROM vacancies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Vacancy not found".to_string()))?;

        Ok(vacancy)
    }

    pub async fn list(&self) -> Result<Vec<Vacancy>> {
        let items = sqlx::query_as::<_, Vacancy>(
            r#"
            SELECT id, title, subject, description, requirements, salary, status, featured, created_by, applications, created_at, updated_at
            FROM vacancies
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Open, featured postings shown to visiting teachers.
    pub async fn list_featured(&self) -> Result<Vec<Vacancy>> {
        let items = sqlx::query_as::<_, Vacancy>(
            r#"
            SELECT id, title, subject, description, requirements, salary, status, featured, created_by, applications, created_at, updated_at
            FROM vacancies
            WHERE status = 'open' AND featured = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Admits a teacher's application under the capacity and no-duplicate
    /// constraints. The check-and-append is ONE conditional UPDATE so that two
    /// concurrent applicants can never both slip past the cap; a losing
    /// statement matches zero rows and we classify the refusal afterwards.
    pub async fn apply_to_vacancy(
        &self,
        vacancy_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<(Vacancy, VacancyApplication)> {
        let application = VacancyApplication::new(teacher_id);
        let duplicate_probe = serde_json::json!([{ "teacher_id": teacher_id }]);
        let element = serde_json::to_value([&application])?;

        let updated = sqlx::query_as::<_, Vacancy>(
            r#"
            UPDATE vacancies
            SET applications = applications || $3, updated_at = NOW()
            WHERE id = $1
              AND NOT (applications @> $2)
              AND jsonb_array_length(applications) < $4
            RETURNING id, title, subject, description, requirements, salary, status, featured, created_by, applications, created_at, updated_at
            "#,
        )
        .bind(vacancy_id)
        .bind(&duplicate_probe)
        .bind(&element)
        .bind(self.capacity)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(vacancy) = updated {
            return Ok((vacancy, application));
        }

        // The conditional update matched nothing; find out why.
        let existing = sqlx::query_as::<_, Vacancy>(
            r#"
            SELECT id, title, subject, description, requirements, salary, status, featured, created_by, applications, created_at, updated_at
            FROM vacancies
            WHERE id = $1
            "#,
        )
        .bind(vacancy_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(vacancy) = existing else {
            return Err(Error::NotFound("Vacancy not found".to_string()));
        };
        if vacancy.application_for(teacher_id).is_some() {
            return Err(Error::DuplicateApplication(
                "You have already applied for this vacancy".to_string(),
            ));
        }
        if vacancy.applications.len() as i64 >= self.capacity {
            return Err(Error::CapacityExceeded(
                "This vacancy has reached maximum applications".to_string(),
            ));
        }
        Err(Error::Internal("Unable to submit application".to_string()))
    }

    /// Positional status update of one embedded application.
    pub async fn set_application_status(
        &self,
        vacancy_id: Uuid,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Vacancy> {
        let existence_probe = serde_json::json!([{ "id": application_id }]);
        let vacancy = sqlx::query_as::<_, Vacancy>(
            r#"
            UPDATE vacancies
            SET applications = (
                    SELECT COALESCE(
                        jsonb_agg(
                            CASE WHEN elem->>'id' = $2::text
                                 THEN jsonb_set(elem, '{status}', to_jsonb($3::text))
                                 ELSE elem
                            END
                        ),
                        '[]'::jsonb
                    )
                    FROM jsonb_array_elements(applications) AS elem
                ),
                updated_at = NOW()
            WHERE id = $1
              AND applications @> $4
            RETURNING id, title, subject, description, requirements, salary, status, featured, created_by, applications, created_at, updated_at
            "#,
        )
        .bind(vacancy_id)
        .bind(application_id)
        .bind(status.as_str())
        .bind(&existence_probe)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Vacancy or application not found".to_string()))?;

        Ok(vacancy)
    }

    /// Embedded applications joined with each applicant's public profile.
    pub async fn applicants(&self, vacancy_id: Uuid) -> Result<Vec<ApplicantSummary>> {
        self.get_by_id(vacancy_id).await?;

        let rows = sqlx::query(
            r#"
            SELECT app->>'id' AS application_id,
                   t.id AS teacher_id,
                   t.full_name,
                   t.email,
                   t.phone,
                   t.subjects,
                   t.cv_url,
                   app->>'status' AS status,
                   (app->>'applied_at')::timestamptz AS applied_at
            FROM vacancies v
            CROSS JOIN LATERAL jsonb_array_elements(v.applications) AS app
            JOIN teachers t ON t.id = (app->>'teacher_id')::uuid
            WHERE v.id = $1
            ORDER BY (app->>'applied_at')::timestamptz DESC
            "#,
        )
        .bind(vacancy_id)
        .fetch_all(&self.pool)
        .await?;

        let mut applicants = Vec::with_capacity(rows.len());
        for row in rows {
            let application_id: String = row.try_get("application_id")?;
            let status: String = row.try_get("status")?;
            applicants.push(ApplicantSummary {
                application_id: Uuid::parse_str(&application_id)
                    .map_err(|e| Error::Internal(format!("corrupt application id: {}", e)))?,
                teacher_id: row.try_get("teacher_id")?,
                full_name: row.try_get("full_name")?,
                email: row.try_get("email")?,
                phone: row.try_get("phone")?,
                subjects: row.try_get("subjects")?,
                cv_url: row.try_get("cv_url")?,
                status: ApplicationStatus::from_str(&status)?,
                applied_at: row.try_get("applied_at")?,
            });
        }
        Ok(applicants)
    }

    /// All applications one teacher has standing anywhere, newest first.
    pub async fn applications_for_teacher(
        &self,
        teacher_id: Uuid,
    ) -> Result<Vec<TeacherApplicationView>> {
        let rows = sqlx::query(
            r#"
            SELECT v.id AS vacancy_id,
                   v.title,
                   v.subject,
                   v.description,
                   v.requirements,
                   v.salary,
                   v.status AS vacancy_status,
                   app->>'id' AS application_id,
                   app->>'status' AS application_status,
                   (app->>'applied_at')::timestamptz AS applied_at
            FROM vacancies v
            CROSS JOIN LATERAL jsonb_array_elements(v.applications) AS app
            WHERE (app->>'teacher_id')::uuid = $1
            ORDER BY (app->>'applied_at')::timestamptz DESC
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let application_id: String = row.try_get("application_id")?;
            let application_status: String = row.try_get("application_status")?;
            views.push(TeacherApplicationView {
                id: Uuid::parse_str(&application_id)
                    .map_err(|e| Error::Internal(format!("corrupt application id: {}", e)))?,
                vacancy: VacancySummary {
                    id: row.try_get("vacancy_id")?,
                    title: row.try_get("title")?,
                    subject: row.try_get("subject")?,
                    description: row.try_get("description")?,
                    requirements: row.try_get("requirements")?,
                    salary: row.try_get("salary")?,
                    status: row.try_get("vacancy_status")?,
                },
                status: ApplicationStatus::from_str(&application_status)?,
                applied_at: row.try_get("applied_at")?,
            });
        }
        Ok(views)
    }
}
