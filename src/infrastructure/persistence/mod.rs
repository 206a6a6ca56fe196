mod pg_pool;
mod repositories;
mod vector_store;

pub use pg_pool::{create_pool, run_migrations};
pub use repositories::{
    MockChatRepository, MockEmailLogRepository, MockPasswordResetRepository,
    MockSummaryRepository, MockUserRepository, PgChatRepository, PgEmailLogRepository,
    PgPasswordResetRepository, PgSummaryRepository, PgUserRepository,
};
pub use vector_store::{MockVectorStore, QdrantAdapter};
