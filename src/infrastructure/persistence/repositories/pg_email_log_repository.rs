use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{EmailLogRepository, RepositoryError};
use crate::domain::{EmailLog, EmailStatus};
use crate::infrastructure::persistence::pg_pool::map_sqlx_error;

pub struct PgEmailLogRepository {
    pool: PgPool,
}

impl PgEmailLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailLogRepository for PgEmailLogRepository {
    #[instrument(skip(self, log), fields(log_id = %log.id, status = %log.status))]
    async fn insert(&self, log: &EmailLog) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO email_logs (id, email, subject, content, kind, status, error, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(log.id)
        .bind(&log.email)
        .bind(&log.subject)
        .bind(&log.content)
        .bind(&log.kind)
        .bind(log.status.as_str())
        .bind(&log.error)
        .bind(log.created_at)
        .bind(log.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip(self, error), fields(log_id = %id, status = %status))]
    async fn update_status(
        &self,
        id: Uuid,
        status: EmailStatus,
        error: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE email_logs
            SET status = $2, error = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(error)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
