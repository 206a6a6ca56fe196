use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{User, UserId};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    async fn update_password(
        &self,
        id: &UserId,
        hashed_password: &str,
    ) -> Result<(), RepositoryError>;
}
