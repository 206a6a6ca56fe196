use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use neurodesk::application::ports::{LlmClient, LlmClientError, ToolDefinition};
use neurodesk::domain::{ChatMessage, ToolCall};
use neurodesk::infrastructure::llm::OpenAiChatClient;

fn client(server: &MockServer) -> OpenAiChatClient {
    OpenAiChatClient::with_base_url(
        format!("{}/v1/", server.uri()),
        "sk-test".to_string(),
        "gpt-4o-mini".to_string(),
    )
}

fn search_tool() -> ToolDefinition {
    ToolDefinition {
        name: "search_in_collection".to_string(),
        description: "Search one collection".to_string(),
        parameters: json!({"type": "object", "properties": {"query": {"type": "string"}}}),
    }
}

#[tokio::test]
async fn given_tool_call_response_when_chatting_then_calls_are_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "tools": [{"type": "function", "function": {"name": "search_in_collection"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "search_in_collection",
                            "arguments": "{\"query\":\"ownership\"}"
                        }
                    }]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client(&server)
        .chat(
            &[
                ChatMessage::System("be helpful".to_string()),
                ChatMessage::User("what is ownership?".to_string()),
            ],
            &[search_tool()],
        )
        .await
        .expect("chat should succeed");

    assert_eq!(reply.content(), "");
    assert_eq!(
        reply.tool_calls(),
        &[ToolCall {
            id: "call_1".to_string(),
            name: "search_in_collection".to_string(),
            arguments: json!({"query": "ownership"}),
        }]
    );
}

#[tokio::test]
async fn given_tool_results_in_history_when_chatting_then_they_are_sent_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "user", "content": "q"},
                {"role": "assistant", "tool_calls": [{"id": "call_1", "type": "function"}]},
                {"role": "tool", "tool_call_id": "call_1", "content": "[]"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Nothing found."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client(&server)
        .chat(
            &[
                ChatMessage::User("q".to_string()),
                ChatMessage::Assistant {
                    content: String::new(),
                    tool_calls: vec![ToolCall {
                        id: "call_1".to_string(),
                        name: "search_in_collection".to_string(),
                        arguments: json!({"query": "q"}),
                    }],
                },
                ChatMessage::Tool {
                    tool_call_id: "call_1".to_string(),
                    name: "search_in_collection".to_string(),
                    content: "[]".to_string(),
                },
            ],
            &[],
        )
        .await
        .expect("chat should succeed");

    assert_eq!(reply.content(), "Nothing found.");
    assert!(reply.tool_calls().is_empty());
}

#[tokio::test]
async fn given_rate_limit_when_completing_then_rate_limited_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = client(&server).complete("summarize").await;

    assert!(matches!(result, Err(LlmClientError::RateLimited)));
}

#[tokio::test]
async fn given_server_error_when_completing_then_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client(&server).complete("summarize").await;

    assert!(matches!(result, Err(LlmClientError::ApiRequestFailed(msg)) if msg.contains("boom")));
}

#[tokio::test]
async fn given_plain_answer_when_completing_then_content_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "summarize"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "A short summary."}}]
        })))
        .mount(&server)
        .await;

    let summary = client(&server)
        .complete("summarize")
        .await
        .expect("completion should succeed");

    assert_eq!(summary, "A short summary.");
}
