mod chat_repository;
mod collection_config;
mod credentials;
mod email_log_repository;
mod embedder;
mod file_loader;
mod llm_client;
mod mailer;
mod password_reset_repository;
mod repository_error;
mod search_result;
mod summary_repository;
mod text_splitter;
mod user_repository;
mod vector_store;
mod vector_store_error;

pub use chat_repository::ChatRepository;
pub use collection_config::{CollectionConfig, DistanceMetric, PayloadFieldType, PayloadIndex};
pub use credentials::{AccessClaims, PasswordHasher, TokenError, TokenService};
pub use email_log_repository::EmailLogRepository;
pub use embedder::{Embedder, EmbedderError};
pub use file_loader::{FileLoader, FileLoaderError};
pub use llm_client::{LlmClient, LlmClientError, ToolDefinition};
pub use mailer::{Mailer, MailerError};
pub use password_reset_repository::PasswordResetRepository;
pub use repository_error::RepositoryError;
pub use search_result::{SearchResult, StoredDocument};
pub use summary_repository::SummaryRepository;
pub use text_splitter::{TextSplitter, TextSplitterError};
pub use user_repository::UserRepository;
pub use vector_store::VectorStore;
pub use vector_store_error::VectorStoreError;
