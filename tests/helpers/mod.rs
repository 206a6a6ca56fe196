#![allow(dead_code)]

pub mod test_postgres;

use std::sync::Arc;

use serde_json::{Map, Value};

use neurodesk::application::ports::{Embedder, StoredDocument};
use neurodesk::application::services::{
    AgentConfig, AgentService, AuthService, EmailService, FeedbackService, HistoryService,
    IngestionService, RetrievalTools, SearchService,
};
use neurodesk::domain::Embedding;
use neurodesk::infrastructure::auth::{Argon2PasswordHasher, JwtTokenService};
use neurodesk::infrastructure::email::MockMailer;
use neurodesk::infrastructure::llm::{MockEmbedder, MockLlmClient};
use neurodesk::infrastructure::persistence::{
    MockChatRepository, MockEmailLogRepository, MockPasswordResetRepository,
    MockSummaryRepository, MockUserRepository, MockVectorStore,
};
use neurodesk::infrastructure::text_processing::{MockFileLoader, RecursiveCharacterSplitter};
use neurodesk::presentation::{AppState, Settings};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Every service wired to in-memory adapters, with handles kept for assertions.
pub struct TestApp {
    pub state: AppState,
    pub llm: Arc<MockLlmClient>,
    pub vector_store: Arc<MockVectorStore>,
    pub chats: Arc<MockChatRepository>,
    pub users: Arc<MockUserRepository>,
    pub reset_tokens: Arc<MockPasswordResetRepository>,
    pub summaries: Arc<MockSummaryRepository>,
    pub email_logs: Arc<MockEmailLogRepository>,
    pub mailer: Arc<MockMailer>,
}

impl TestApp {
    pub fn new(llm: MockLlmClient, vector_store: MockVectorStore) -> Self {
        let llm = Arc::new(llm);
        let vector_store = Arc::new(vector_store);
        let embedder = Arc::new(MockEmbedder);
        let chats = Arc::new(MockChatRepository::new());
        let users = Arc::new(MockUserRepository::new());
        let reset_tokens = Arc::new(MockPasswordResetRepository::new());
        let summaries = Arc::new(MockSummaryRepository::new());
        let email_logs = Arc::new(MockEmailLogRepository::new());
        let mailer = Arc::new(MockMailer::new());

        let email_service = Arc::new(EmailService::new(mailer.clone(), email_logs.clone()));
        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            reset_tokens.clone(),
            Arc::new(Argon2PasswordHasher::new()),
            Arc::new(
                JwtTokenService::new(TEST_JWT_SECRET, "HS256", 24).expect("valid jwt settings"),
            ),
            email_service,
        ));
        let search_service = Arc::new(SearchService::new(embedder.clone(), vector_store.clone()));
        let feedback_service = Arc::new(FeedbackService::new(
            chats.clone(),
            embedder.clone(),
            vector_store.clone(),
        ));
        let agent_service = Arc::new(AgentService::new(
            llm.clone(),
            chats.clone(),
            feedback_service.clone(),
            RetrievalTools::new(search_service.clone(), 5),
            AgentConfig::default(),
        ));
        let history_service = Arc::new(HistoryService::new(chats.clone()));
        let ingestion_service = Arc::new(IngestionService::new(
            Arc::new(MockFileLoader),
            Arc::new(RecursiveCharacterSplitter::new(200, 20).expect("valid splitter")),
            embedder,
            vector_store.clone(),
            llm.clone(),
            summaries.clone(),
            TEST_MAX_UPLOAD_BYTES,
        ));

        let mut settings = Settings::default();
        settings.upload.max_upload_bytes = TEST_MAX_UPLOAD_BYTES;

        Self {
            state: AppState {
                auth_service,
                ingestion_service,
                search_service,
                agent_service,
                feedback_service,
                history_service,
                settings,
            },
            llm,
            vector_store,
            chats,
            users,
            reset_tokens,
            summaries,
            email_logs,
            mailer,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(MockLlmClient::new(), MockVectorStore::new())
    }
}

/// A stored chunk embedded the same way `MockEmbedder` embeds queries.
pub async fn document(text: &str, page: u64) -> (StoredDocument, Embedding) {
    let mut metadata = Map::new();
    metadata.insert("page".to_string(), Value::from(page));
    metadata.insert("source".to_string(), Value::from("test.pdf"));
    let embedding = MockEmbedder.embed(text).await.expect("mock embed");
    (StoredDocument::new(text.to_string(), metadata), embedding)
}

pub async fn documents(texts: &[&str]) -> Vec<(StoredDocument, Embedding)> {
    let mut out = Vec::new();
    for (i, text) in texts.iter().enumerate() {
        out.push(document(text, i as u64 + 1).await);
    }
    out
}
