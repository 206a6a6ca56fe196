use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use crate::application::ports::{PasswordResetRepository, RepositoryError};
use crate::domain::{PasswordResetToken, UserId};
use crate::infrastructure::persistence::pg_pool::map_sqlx_error;

pub struct PgPasswordResetRepository {
    pool: PgPool,
}

impl PgPasswordResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ResetRow {
    token: String,
    user_id: String,
    email: String,
    expires_at: DateTime<Utc>,
    used: bool,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl PasswordResetRepository for PgPasswordResetRepository {
    #[instrument(skip(self, token), fields(user_id = %token.user_id))]
    async fn create(&self, token: &PasswordResetToken) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (token, user_id, email, expires_at, used, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id.as_str())
        .bind(&token.email)
        .bind(token.expires_at)
        .bind(token.used)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip_all)]
    async fn find(&self, token: &str) -> Result<Option<PasswordResetToken>, RepositoryError> {
        let row: Option<ResetRow> = sqlx::query_as(
            r#"
            SELECT token, user_id, email, expires_at, used, created_at
            FROM password_reset_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| PasswordResetToken {
            token: r.token,
            user_id: UserId::from_raw(r.user_id),
            email: r.email,
            expires_at: r.expires_at,
            used: r.used,
            created_at: r.created_at,
        }))
    }

    #[instrument(skip_all)]
    async fn mark_used(&self, token: &str, now: DateTime<Utc>) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE password_reset_tokens
            SET used = TRUE
            WHERE token = $1 AND used = FALSE AND expires_at > $2
            "#,
        )
        .bind(token)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }
}
