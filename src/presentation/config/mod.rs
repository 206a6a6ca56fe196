mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AgentSettings, AuthSettings, ChunkingSettings, CorsSettings, DatabaseSettings,
    EmbeddingsSettings, LlmSettings, LoggingSettings, QdrantSettings, ServerSettings, Settings,
    SmtpConfig, UploadSettings,
};
