use std::sync::Arc;

use crate::application::services::{
    AgentService, AuthService, FeedbackService, HistoryService, IngestionService, SearchService,
};
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub ingestion_service: Arc<IngestionService>,
    pub search_service: Arc<SearchService>,
    pub agent_service: Arc<AgentService>,
    pub feedback_service: Arc<FeedbackService>,
    pub history_service: Arc<HistoryService>,
    pub settings: Settings,
}
