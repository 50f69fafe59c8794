use crate::dto::admin_dto::DashboardStats;
use crate::error::{Error, Result};
use crate::models::admin::Admin;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, name, password_hash, created_at FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Seeds the first dashboard account when none exists yet.
    pub async fn ensure_admin(&self, email: &str, password_hash: &str) -> Result<()> {
        let res = sqlx::query(
            r#"
            INSERT INTO admins (email, name, password_hash)
            VALUES ($1, 'Administrator', $2)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() > 0 {
            tracing::info!(email = %email, "seeded initial admin account");
        }
        Ok(())
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let total_applications: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM teachers WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;
        let active_vacancies: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM vacancies WHERE status = 'open'")
                .fetch_one(&self.pool)
                .await?;
        let approved_teachers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM teachers WHERE status = 'approved'")
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStats {
            total_applications,
            active_vacancies,
            approved_teachers,
        })
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Admin> {
        let Some(admin) = self.get_by_email(email).await? else {
            return Err(Error::Unauthorized("Invalid credentials".to_string()));
        };
        let ok = crate::utils::crypto::verify_password(password, &admin.password_hash)
            .map_err(|e| Error::Internal(format!("password verification failed: {}", e)))?;
        if !ok {
            return Err(Error::Unauthorized("Invalid credentials".to_string()));
        }
        Ok(admin)
    }
}
