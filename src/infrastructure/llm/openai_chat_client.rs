use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::ports::{LlmClient, LlmClientError, ToolDefinition};
use crate::domain::{ChatMessage, ToolCall};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat completions client for OpenAI and API-compatible servers.
pub struct OpenAiChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<usize>,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction<'a>,
}

#[derive(Serialize)]
struct WireFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

fn function_kind() -> String {
    "function".to_string()
}

impl OpenAiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(OPENAI_BASE_URL.to_string(), api_key, model)
    }

    pub fn with_base_url(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            temperature: 0.0,
            max_tokens: None,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: Option<usize>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    async fn send(&self, body: &ChatCompletionRequest<'_>) -> Result<ResponseMessage, LlmClientError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))
    }
}

#[async_trait]
impl LlmClient for OpenAiChatClient {
    #[tracing::instrument(skip_all, fields(model = %self.model, messages = messages.len(), tools = tools.len()))]
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage, LlmClientError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: messages.iter().map(to_wire).collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: tools
                .iter()
                .map(|t| WireTool {
                    kind: "function",
                    function: WireFunction {
                        name: &t.name,
                        description: &t.description,
                        parameters: &t.parameters,
                    },
                })
                .collect(),
        };

        let message = self.send(&body).await?;
        let tool_calls: Vec<ToolCall> = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(from_wire_call)
            .collect();

        tracing::debug!(tool_calls = tool_calls.len(), "Chat completion received");
        Ok(ChatMessage::Assistant {
            content: message.content.unwrap_or_default(),
            tool_calls,
        })
    }

    #[tracing::instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![to_wire(&ChatMessage::User(prompt.to_string()))],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: Vec::new(),
        };

        self.send(&body)
            .await?
            .content
            .ok_or_else(|| LlmClientError::InvalidResponse("missing content".to_string()))
    }
}

fn to_wire(message: &ChatMessage) -> WireMessage {
    let role = message.role().as_str();
    match message {
        ChatMessage::System(content) | ChatMessage::User(content) => WireMessage {
            role,
            content: Some(content.clone()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        },
        ChatMessage::Assistant {
            content,
            tool_calls,
        } => WireMessage {
            role,
            content: (!content.is_empty() || tool_calls.is_empty()).then(|| content.clone()),
            tool_calls: tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: call.id.clone(),
                    kind: function_kind(),
                    function: WireFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.to_string(),
                    },
                })
                .collect(),
            tool_call_id: None,
        },
        ChatMessage::Tool {
            tool_call_id,
            content,
            ..
        } => WireMessage {
            role,
            content: Some(content.clone()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.clone()),
        },
    }
}

fn from_wire_call(call: WireToolCall) -> ToolCall {
    let arguments = if call.function.arguments.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(&call.function.arguments)
            .unwrap_or(Value::String(call.function.arguments))
    };

    ToolCall {
        id: call.id,
        name: call.function.name,
        arguments,
    }
}
