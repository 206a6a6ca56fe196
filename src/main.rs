use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use neurodesk::application::services::{
    AgentConfig, AgentService, AuthService, EmailService, FeedbackService, HistoryService,
    IngestionService, RetrievalTools, SearchService,
};
use neurodesk::infrastructure::auth::{Argon2PasswordHasher, JwtTokenService};
use neurodesk::infrastructure::email::{SmtpMailer, SmtpSettings};
use neurodesk::infrastructure::llm::{OpenAiChatClient, OpenAiEmbedder};
use neurodesk::infrastructure::observability::{TracingConfig, init_tracing};
use neurodesk::infrastructure::persistence::{
    PgChatRepository, PgEmailLogRepository, PgPasswordResetRepository, PgSummaryRepository,
    PgUserRepository, QdrantAdapter, create_pool, run_migrations,
};
use neurodesk::infrastructure::text_processing::{PdfAdapter, RecursiveCharacterSplitter};
use neurodesk::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(&TracingConfig::new(
        environment.as_str(),
        settings.logging.json,
    ));

    let pool = create_pool(&settings.database.url, settings.database.max_connections)
        .await
        .context("Failed to connect to Postgres")?;
    if settings.database.run_migrations {
        run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let vector_store = Arc::new(
        QdrantAdapter::new(&settings.qdrant.url, settings.qdrant.api_key.clone())
            .context("Failed to connect to Qdrant")?,
    );

    let embedder = Arc::new(
        OpenAiEmbedder::with_base_url(
            settings.embeddings.base_url.clone(),
            settings.embeddings.api_key.clone(),
            settings.embeddings.model.clone(),
        )
        .with_dimensions(settings.embeddings.dimensions),
    );
    let llm_client = Arc::new(
        OpenAiChatClient::with_base_url(
            settings.llm.base_url.clone(),
            settings.llm.api_key.clone(),
            settings.llm.chat_model.clone(),
        )
        .with_sampling(settings.llm.temperature, settings.llm.max_tokens),
    );

    let text_splitter = Arc::new(
        RecursiveCharacterSplitter::new(
            settings.chunking.chunk_size,
            settings.chunking.chunk_overlap,
        )
        .context("Invalid chunking configuration")?,
    );

    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
    let reset_repository = Arc::new(PgPasswordResetRepository::new(pool.clone()));
    let chat_repository = Arc::new(PgChatRepository::new(pool.clone()));
    let summary_repository = Arc::new(PgSummaryRepository::new(pool.clone()));
    let email_log_repository = Arc::new(PgEmailLogRepository::new(pool));

    let mailer = Arc::new(SmtpMailer::new(SmtpSettings {
        host: settings.smtp.host.clone(),
        port: settings.smtp.port,
        username: settings.smtp.username.clone(),
        password: settings.smtp.password.clone(),
        from: settings.smtp.from.clone(),
    }));
    let email_service = Arc::new(EmailService::new(mailer, email_log_repository));

    let token_service = Arc::new(
        JwtTokenService::new(
            &settings.auth.jwt_secret,
            &settings.auth.jwt_algorithm,
            settings.auth.access_token_ttl_hours,
        )
        .context("Invalid JWT configuration")?,
    );
    let auth_service = Arc::new(AuthService::new(
        user_repository,
        reset_repository,
        Arc::new(Argon2PasswordHasher::new()),
        token_service,
        email_service,
    ));

    let search_service = Arc::new(SearchService::new(
        embedder.clone(),
        vector_store.clone(),
    ));
    let feedback_service = Arc::new(FeedbackService::new(
        chat_repository.clone(),
        embedder.clone(),
        vector_store.clone(),
    ));
    let agent_service = Arc::new(AgentService::new(
        llm_client.clone(),
        chat_repository.clone(),
        feedback_service.clone(),
        RetrievalTools::new(search_service.clone(), settings.agent.default_n_results),
        AgentConfig {
            max_tool_rounds: settings.agent.max_tool_rounds,
            max_history_records: settings.agent.max_history_records,
            max_history_tokens: settings.agent.max_history_tokens,
            feedback_examples: settings.agent.feedback_examples,
        },
    ));
    let history_service = Arc::new(HistoryService::new(chat_repository));
    let ingestion_service = Arc::new(IngestionService::new(
        Arc::new(PdfAdapter::new()),
        text_splitter,
        embedder,
        vector_store,
        llm_client,
        summary_repository,
        settings.upload.max_upload_bytes,
    ));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        auth_service,
        ingestion_service,
        search_service,
        agent_service,
        feedback_service,
        history_service,
        settings,
    };
    let router = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
