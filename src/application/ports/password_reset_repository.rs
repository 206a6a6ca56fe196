use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::domain::PasswordResetToken;

#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    async fn create(&self, token: &PasswordResetToken) -> Result<(), RepositoryError>;

    async fn find(&self, token: &str) -> Result<Option<PasswordResetToken>, RepositoryError>;

    /// Atomically spends an unused token that has not expired at `now`.
    /// Returns `false` when nothing was claimed.
    async fn mark_used(&self, token: &str, now: DateTime<Utc>) -> Result<bool, RepositoryError>;
}
