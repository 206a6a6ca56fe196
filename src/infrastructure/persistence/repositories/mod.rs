mod mock_repository;
mod pg_chat_repository;
mod pg_email_log_repository;
mod pg_password_reset_repository;
mod pg_summary_repository;
mod pg_user_repository;

pub use mock_repository::{
    MockChatRepository, MockEmailLogRepository, MockPasswordResetRepository,
    MockSummaryRepository, MockUserRepository,
};
pub use pg_chat_repository::PgChatRepository;
pub use pg_email_log_repository::PgEmailLogRepository;
pub use pg_password_reset_repository::PgPasswordResetRepository;
pub use pg_summary_repository::PgSummaryRepository;
pub use pg_user_repository::PgUserRepository;
