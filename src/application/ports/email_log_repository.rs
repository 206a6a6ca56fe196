use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;
use crate::domain::{EmailLog, EmailStatus};

#[async_trait]
pub trait EmailLogRepository: Send + Sync {
    async fn insert(&self, log: &EmailLog) -> Result<(), RepositoryError>;

    async fn update_status(
        &self,
        id: Uuid,
        status: EmailStatus,
        error: Option<&str>,
    ) -> Result<(), RepositoryError>;
}
