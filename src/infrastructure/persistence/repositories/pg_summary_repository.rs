use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, SummaryRepository};
use crate::domain::DocSummary;
use crate::infrastructure::persistence::pg_pool::map_sqlx_error;

pub struct PgSummaryRepository {
    pool: PgPool,
}

impl PgSummaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SummaryRepository for PgSummaryRepository {
    #[instrument(skip(self, summary), fields(user_id = %summary.user_id, collection = %summary.collection_name))]
    async fn save(&self, summary: &DocSummary) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO doc_summaries (id, user_id, filename, collection_name, summary, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(summary.user_id.as_str())
        .bind(&summary.filename)
        .bind(summary.collection_name.as_str())
        .bind(&summary.summary)
        .bind(summary.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
