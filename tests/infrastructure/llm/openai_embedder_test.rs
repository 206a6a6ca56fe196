use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use neurodesk::application::ports::{Embedder, EmbedderError};
use neurodesk::infrastructure::llm::OpenAiEmbedder;

fn embedder(server: &MockServer) -> OpenAiEmbedder {
    OpenAiEmbedder::with_base_url(
        server.uri(),
        "sk-test".to_string(),
        "text-embedding-3-small".to_string(),
    )
}

#[tokio::test]
async fn given_out_of_order_response_when_embedding_batch_then_vectors_follow_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({
            "model": "text-embedding-3-small",
            "input": ["first", "second"],
            "dimensions": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"index": 1, "embedding": [0.0, 1.0]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embeddings = embedder(&server)
        .with_dimensions(Some(2))
        .embed_batch(&["first", "second"])
        .await
        .expect("embedding should succeed");

    assert_eq!(embeddings.len(), 2);
    assert_eq!(embeddings[0].values, vec![1.0, 0.0]);
    assert_eq!(embeddings[1].values, vec![0.0, 1.0]);
}

#[tokio::test]
async fn given_empty_batch_when_embedding_then_no_request_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let embeddings = embedder(&server)
        .embed_batch(&[])
        .await
        .expect("empty batch should succeed");

    assert!(embeddings.is_empty());
}

#[tokio::test]
async fn given_short_response_when_embedding_then_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": [1.0]}]
        })))
        .mount(&server)
        .await;

    let result = embedder(&server).embed_batch(&["a", "b"]).await;

    assert!(matches!(result, Err(EmbedderError::InvalidResponse(_))));
}

#[tokio::test]
async fn given_unauthorized_when_embedding_then_api_request_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let result = embedder(&server).embed("text").await;

    assert!(
        matches!(result, Err(EmbedderError::ApiRequestFailed(msg)) if msg.contains("invalid api key"))
    );
}
