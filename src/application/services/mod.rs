pub mod agent;
mod auth_service;
mod email_service;
mod feedback_service;
mod history_service;
mod ingestion_service;
mod search_service;
mod token_counter;

pub use agent::{AgentAnswer, AgentConfig, AgentError, AgentService, RetrievalTools};
pub use auth_service::{
    AuthError, AuthService, CurrentUser, LoginResult, RESET_REQUESTED_MESSAGE, SignupRequest,
};
pub use email_service::EmailService;
pub use feedback_service::{FEEDBACK_COLLECTION, FeedbackError, FeedbackRequest, FeedbackService};
pub use history_service::{HistoryError, HistoryMessage, HistoryPage, HistoryService};
pub use ingestion_service::{IngestionError, IngestionReport, IngestionService};
pub use search_service::{
    CollectionInfo, CollectionPage, MAX_N_RESULTS, SearchError, SearchHit, SearchService,
    merge_ranked,
};
pub use token_counter::count_tokens;
