/// Failure of any Postgres-backed repository.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database unreachable: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("record not found: {0}")]
    NotFound(String),
    /// A unique key (e.g. a user's email) already exists.
    #[error("duplicate record: {0}")]
    ConstraintViolation(String),
    #[error("migration failed: {0}")]
    MigrationFailed(String),
}
