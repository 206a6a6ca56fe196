mod chat_message;
mod chat_record;
mod chunk;
mod collection_name;
mod doc_summary;
mod email_log;
mod embedding;
mod feedback;
mod password_reset;
mod user;

pub use chat_message::{ChatMessage, MessageRole, ToolCall};
pub use chat_record::{ChatRecord, ChatRecordId};
pub use chunk::{Chunk, ChunkId, Page};
pub use collection_name::{CollectionName, safe_filename};
pub use doc_summary::DocSummary;
pub use email_log::{EmailLog, EmailStatus};
pub use embedding::Embedding;
pub use feedback::Feedback;
pub use password_reset::PasswordResetToken;
pub use user::{User, UserId, UserPublic};
