use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{LlmClient, LlmClientError, ToolDefinition};
use crate::domain::ChatMessage;

/// Replays queued assistant replies and records every conversation it was sent.
/// When the queue runs dry it answers with a fixed text.
#[derive(Default)]
pub struct MockLlmClient {
    replies: Mutex<VecDeque<ChatMessage>>,
    requests: Mutex<Vec<(Vec<ChatMessage>, Vec<String>)>>,
    fail_completions: bool,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = ChatMessage>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn failing_completions() -> Self {
        Self {
            fail_completions: true,
            ..Self::default()
        }
    }

    /// Conversations received by `chat`, each with the offered tool names.
    pub fn requests(&self) -> Vec<(Vec<ChatMessage>, Vec<String>)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage, LlmClientError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((
                messages.to_vec(),
                tools.iter().map(|t| t.name.clone()).collect(),
            ));
        }

        let next = self
            .replies
            .lock()
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?
            .pop_front();
        Ok(next.unwrap_or_else(|| ChatMessage::assistant("Mock answer")))
    }

    async fn complete(&self, _prompt: &str) -> Result<String, LlmClientError> {
        if self.fail_completions {
            return Err(LlmClientError::ApiRequestFailed("mock failure".to_string()));
        }
        Ok("Mock summary".to_string())
    }
}
