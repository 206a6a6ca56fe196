use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::DocSummary;

#[async_trait]
pub trait SummaryRepository: Send + Sync {
    async fn save(&self, summary: &DocSummary) -> Result<(), RepositoryError>;
}
