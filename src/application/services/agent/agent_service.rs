use std::sync::Arc;

use super::system_prompt::{build_system_prompt, feedback_instructions};
use super::tools::RetrievalTools;
use crate::application::ports::{ChatRepository, LlmClient, LlmClientError};
use crate::application::services::{FeedbackService, count_tokens};
use crate::domain::{ChatMessage, ChatRecord, CollectionName, UserId};

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub max_tool_rounds: usize,
    pub max_history_records: usize,
    pub max_history_tokens: usize,
    pub feedback_examples: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 5,
            max_history_records: 20,
            max_history_tokens: 4000,
            feedback_examples: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentAnswer {
    pub answer: String,
    pub retrieved_documents: Option<String>,
    pub tool_rounds: usize,
}

/// Conversation state for a single `ask`.
struct AgentState<'a> {
    user_id: &'a UserId,
    collection: Option<&'a CollectionName>,
    messages: Vec<ChatMessage>,
    last_tool_output: Option<String>,
}

pub struct AgentService {
    llm_client: Arc<dyn LlmClient>,
    chat_repository: Arc<dyn ChatRepository>,
    feedback_service: Arc<FeedbackService>,
    tools: RetrievalTools,
    config: AgentConfig,
}

impl AgentService {
    pub fn new(
        llm_client: Arc<dyn LlmClient>,
        chat_repository: Arc<dyn ChatRepository>,
        feedback_service: Arc<FeedbackService>,
        tools: RetrievalTools,
        config: AgentConfig,
    ) -> Self {
        Self {
            llm_client,
            chat_repository,
            feedback_service,
            tools,
            config,
        }
    }

    #[tracing::instrument(
        skip(self, query),
        fields(user_id = %user_id, collection = ?collection.map(CollectionName::as_str))
    )]
    pub async fn ask(
        &self,
        user_id: &UserId,
        query: &str,
        collection: Option<&CollectionName>,
    ) -> Result<AgentAnswer, AgentError> {
        if let Some(collection) = collection
            && !collection.is_owned_by(user_id)
        {
            tracing::warn!(collection = %collection, "Access denied to collection");
            return Err(AgentError::AccessDenied);
        }

        tracing::info!(query_len = query.len(), "Agent invoked");

        let mut state = AgentState {
            user_id,
            collection,
            messages: self.load_history(user_id, collection).await,
            last_tool_output: None,
        };
        state.messages.push(ChatMessage::User(query.to_string()));

        let tool_definitions = self.tools.definitions(collection);
        let tool_names: Vec<&str> = tool_definitions.iter().map(|t| t.name.as_str()).collect();
        let extra = self.feedback_context(query).await;
        let system = ChatMessage::System(build_system_prompt(
            user_id,
            collection,
            &tool_names,
            &extra,
        ));

        let mut rounds = 0;
        let answer = loop {
            let mut conversation = Vec::with_capacity(state.messages.len() + 1);
            conversation.push(system.clone());
            conversation.extend(state.messages.iter().cloned());

            let reply = self.llm_client.chat(&conversation, &tool_definitions).await?;
            let calls = reply.tool_calls().to_vec();
            if calls.is_empty() {
                break reply.content().to_string();
            }

            if rounds >= self.config.max_tool_rounds {
                tracing::warn!(rounds, "Tool round limit reached");
                return Err(AgentError::ToolRoundLimit(self.config.max_tool_rounds));
            }
            rounds += 1;
            tracing::debug!(round = rounds, calls = calls.len(), "Executing tool calls");

            state.messages.push(reply);
            for call in &calls {
                let output = self
                    .tools
                    .execute(state.user_id, state.collection, call)
                    .await;
                state.last_tool_output = Some(output.clone());
                state.messages.push(ChatMessage::Tool {
                    tool_call_id: call.id.clone(),
                    name: call.name.clone(),
                    content: output,
                });
            }
        };

        self.persist(&state, query, &answer).await;

        tracing::info!(tool_rounds = rounds, "Agent answered");
        Ok(AgentAnswer {
            answer,
            retrieved_documents: state.last_tool_output,
            tool_rounds: rounds,
        })
    }

    async fn load_history(
        &self,
        user_id: &UserId,
        collection: Option<&CollectionName>,
    ) -> Vec<ChatMessage> {
        let records = match self
            .chat_repository
            .recent(user_id, collection, self.config.max_history_records)
            .await
        {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Chat history unavailable, continuing without it");
                return Vec::new();
            }
        };

        let pairs: Vec<(usize, [ChatMessage; 2])> = records
            .into_iter()
            .map(|r| {
                let tokens = count_tokens(&r.query) + count_tokens(&r.llm_response);
                (
                    tokens,
                    [
                        ChatMessage::User(r.query),
                        ChatMessage::assistant(r.llm_response),
                    ],
                )
            })
            .collect();

        let token_counts: Vec<usize> = pairs.iter().map(|(tokens, _)| *tokens).collect();
        let start = history_start(&token_counts, self.config.max_history_tokens);
        tracing::debug!(loaded = pairs.len(), dropped = start, "Chat history loaded");

        pairs
            .into_iter()
            .skip(start)
            .flat_map(|(_, pair)| pair)
            .collect()
    }

    async fn feedback_context(&self, query: &str) -> String {
        match self
            .feedback_service
            .similar_feedback(query, self.config.feedback_examples)
            .await
        {
            Ok(examples) => feedback_instructions(&examples),
            Err(e) => {
                tracing::warn!(error = %e, "Feedback lookup failed, continuing without it");
                String::new()
            }
        }
    }

    async fn persist(&self, state: &AgentState<'_>, query: &str, answer: &str) {
        let record = ChatRecord::new(
            state.user_id.clone(),
            state.collection.cloned(),
            query.to_string(),
            state.last_tool_output.clone(),
            answer.to_string(),
        );
        if let Err(e) = self.chat_repository.save(&record).await {
            tracing::error!(error = %e, "Failed to persist chat record");
        }
    }
}

/// Index of the oldest exchange that still fits in `budget` tokens when keeping
/// the newest exchanges first.
fn history_start(token_counts: &[usize], budget: usize) -> usize {
    let mut used = 0;
    for (i, tokens) in token_counts.iter().enumerate().rev() {
        used += tokens;
        if used > budget {
            return i + 1;
        }
    }
    0
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Access denied to this collection")]
    AccessDenied,
    #[error("agent exceeded {0} tool rounds without answering")]
    ToolRoundLimit(usize),
    #[error("llm: {0}")]
    Llm(#[from] LlmClientError),
}
