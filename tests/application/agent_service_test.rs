use std::sync::Arc;

use serde_json::json;

use neurodesk::application::ports::ChatRepository;
use neurodesk::application::services::agent::{
    SEARCH_ACROSS_USER_COLLECTIONS, SEARCH_IN_COLLECTION,
};
use neurodesk::application::services::{
    AgentConfig, AgentError, AgentService, FEEDBACK_COLLECTION, FeedbackService, RetrievalTools,
    SearchService,
};
use neurodesk::domain::{ChatMessage, ChatRecord, CollectionName, ToolCall, UserId};
use neurodesk::infrastructure::llm::{MockEmbedder, MockLlmClient};
use neurodesk::infrastructure::persistence::{MockChatRepository, MockVectorStore};

use crate::helpers::{TestApp, documents};

fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> ChatMessage {
    ChatMessage::Assistant {
        content: String::new(),
        tool_calls: vec![ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        }],
    }
}

async fn store() -> MockVectorStore {
    MockVectorStore::new()
        .with_collection(
            "user_u1_doc_alpha",
            documents(&["rust ownership rules", "borrow checker basics"]).await,
        )
        .with_collection("user_u2_doc_gamma", documents(&["private notes"]).await)
}

#[tokio::test]
async fn given_model_requests_search_when_asking_then_tool_output_feeds_final_answer() {
    let llm = MockLlmClient::with_replies([
        tool_call(
            "call_1",
            SEARCH_IN_COLLECTION,
            json!({"query": "rust ownership rules", "collection_name": "user_u1_doc_alpha"}),
        ),
        ChatMessage::assistant("Ownership moves values."),
    ]);
    let app = TestApp::new(llm, store().await);
    let user = UserId::from_raw("u1");

    let answer = app
        .state
        .agent_service
        .ask(&user, "What is ownership?", None)
        .await
        .expect("agent should answer");

    assert_eq!(answer.answer, "Ownership moves values.");
    assert_eq!(answer.tool_rounds, 1);
    let retrieved = answer.retrieved_documents.expect("tool output recorded");
    assert!(retrieved.contains("rust ownership rules"));

    let requests = app.llm.requests();
    assert_eq!(requests.len(), 2);
    let (second, _) = &requests[1];
    assert!(matches!(second.first(), Some(ChatMessage::System(_))));
    assert!(matches!(
        second.last(),
        Some(ChatMessage::Tool { tool_call_id, .. }) if tool_call_id == "call_1"
    ));

    let records = app.chats.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].query, "What is ownership?");
    assert_eq!(records[0].llm_response, "Ownership moves values.");
    assert!(records[0].collection_name.is_none());
    assert_eq!(records[0].retrieved_documents.as_deref(), Some(retrieved.as_str()));
}

#[tokio::test]
async fn given_unscoped_ask_when_calling_model_then_both_search_tools_are_offered() {
    let app = TestApp::new(MockLlmClient::new(), store().await);

    let answer = app
        .state
        .agent_service
        .ask(&UserId::from_raw("u1"), "hello", None)
        .await
        .expect("agent should answer");

    assert_eq!(answer.answer, "Mock answer");
    assert!(answer.retrieved_documents.is_none());
    let (_, tools) = &app.llm.requests()[0];
    assert_eq!(
        tools,
        &vec![
            SEARCH_IN_COLLECTION.to_string(),
            SEARCH_ACROSS_USER_COLLECTIONS.to_string()
        ]
    );
}

#[tokio::test]
async fn given_scoped_ask_when_calling_model_then_only_collection_search_is_offered() {
    let app = TestApp::new(MockLlmClient::new(), store().await);
    let collection = CollectionName::from_raw("user_u1_doc_alpha");

    app.state
        .agent_service
        .ask(&UserId::from_raw("u1"), "hello", Some(&collection))
        .await
        .expect("agent should answer");

    let (messages, tools) = &app.llm.requests()[0];
    assert_eq!(tools, &vec![SEARCH_IN_COLLECTION.to_string()]);
    assert!(messages[0].content().contains("user_u1_doc_alpha"));
    assert_eq!(
        app.chats.records()[0].collection_name.as_ref(),
        Some(&collection)
    );
}

#[tokio::test]
async fn given_foreign_collection_when_asking_then_access_is_denied_before_model_call() {
    let app = TestApp::new(MockLlmClient::new(), store().await);

    let result = app
        .state
        .agent_service
        .ask(
            &UserId::from_raw("u1"),
            "show me",
            Some(&CollectionName::from_raw("user_u2_doc_gamma")),
        )
        .await;

    assert!(matches!(result, Err(AgentError::AccessDenied)));
    assert!(app.llm.requests().is_empty());
    assert!(app.chats.records().is_empty());
}

#[tokio::test]
async fn given_scoped_ask_when_model_targets_other_collection_then_search_stays_in_scope() {
    let llm = MockLlmClient::with_replies([
        tool_call(
            "call_1",
            SEARCH_IN_COLLECTION,
            json!({"query": "private notes", "collection_name": "user_u2_doc_gamma"}),
        ),
        ChatMessage::assistant("done"),
    ]);
    let app = TestApp::new(llm, store().await);
    let collection = CollectionName::from_raw("user_u1_doc_alpha");

    let answer = app
        .state
        .agent_service
        .ask(&UserId::from_raw("u1"), "notes?", Some(&collection))
        .await
        .expect("agent should answer");

    let retrieved = answer.retrieved_documents.expect("tool output recorded");
    assert!(retrieved.contains("user_u1_doc_alpha"));
    assert!(!retrieved.contains("private notes"));
}

#[tokio::test]
async fn given_scoped_ask_when_model_calls_cross_collection_search_then_tool_is_not_found() {
    let llm = MockLlmClient::with_replies([
        tool_call("call_1", SEARCH_ACROSS_USER_COLLECTIONS, json!({"query": "x"})),
        ChatMessage::assistant("done"),
    ]);
    let app = TestApp::new(llm, store().await);

    let answer = app
        .state
        .agent_service
        .ask(
            &UserId::from_raw("u1"),
            "x",
            Some(&CollectionName::from_raw("user_u1_doc_alpha")),
        )
        .await
        .expect("agent should answer");

    assert_eq!(
        answer.retrieved_documents.as_deref(),
        Some("Tool search_across_user_collections not found")
    );
}

#[tokio::test]
async fn given_unknown_tool_when_asking_then_model_sees_not_found_message() {
    let llm = MockLlmClient::with_replies([
        tool_call("call_9", "delete_everything", json!({})),
        ChatMessage::assistant("I cannot do that."),
    ]);
    let app = TestApp::new(llm, store().await);

    let answer = app
        .state
        .agent_service
        .ask(&UserId::from_raw("u1"), "wipe it", None)
        .await
        .expect("agent should answer");

    assert_eq!(answer.answer, "I cannot do that.");
    let (second, _) = &app.llm.requests()[1];
    assert_eq!(
        second.last().map(ChatMessage::content),
        Some("Tool delete_everything not found")
    );
}

#[tokio::test]
async fn given_failing_tool_when_asking_then_error_is_reported_to_model() {
    let llm = MockLlmClient::with_replies([
        tool_call(
            "call_1",
            SEARCH_IN_COLLECTION,
            json!({"query": "q", "collection_name": "user_u2_doc_gamma"}),
        ),
        ChatMessage::assistant("sorry"),
    ]);
    let app = TestApp::new(llm, store().await);

    let answer = app
        .state
        .agent_service
        .ask(&UserId::from_raw("u1"), "q", None)
        .await
        .expect("agent should answer");

    let output = answer.retrieved_documents.expect("tool output recorded");
    assert!(output.starts_with("Tool search_in_collection failed:"));
}

#[tokio::test]
async fn given_model_never_stops_calling_tools_when_asking_then_round_limit_is_enforced() {
    let replies = (0..10).map(|i| {
        tool_call(
            &format!("call_{i}"),
            SEARCH_ACROSS_USER_COLLECTIONS,
            json!({"query": "loop"}),
        )
    });
    let app = TestApp::new(MockLlmClient::with_replies(replies), store().await);

    let result = app
        .state
        .agent_service
        .ask(&UserId::from_raw("u1"), "loop forever", None)
        .await;

    assert!(matches!(result, Err(AgentError::ToolRoundLimit(5))));
    assert_eq!(app.llm.requests().len(), 6);
    assert!(app.chats.records().is_empty());
}

#[tokio::test]
async fn given_previous_chats_when_asking_then_history_precedes_new_question() {
    let app = TestApp::new(MockLlmClient::new(), store().await);
    let user = UserId::from_raw("u1");
    app.chats
        .save(&ChatRecord::new(
            user.clone(),
            None,
            "first question".to_string(),
            None,
            "first answer".to_string(),
        ))
        .await
        .expect("save");
    app.chats
        .save(&ChatRecord::new(
            user.clone(),
            Some(CollectionName::from_raw("user_u1_doc_alpha")),
            "scoped question".to_string(),
            None,
            "scoped answer".to_string(),
        ))
        .await
        .expect("save");

    app.state
        .agent_service
        .ask(&user, "second question", None)
        .await
        .expect("agent should answer");

    let (messages, _) = &app.llm.requests()[0];
    let contents: Vec<&str> = messages.iter().skip(1).map(ChatMessage::content).collect();
    assert_eq!(
        contents,
        vec!["first question", "first answer", "second question"]
    );
}

#[tokio::test]
async fn given_stored_feedback_when_asking_then_system_prompt_includes_it() {
    let store = store()
        .await
        .with_collection(FEEDBACK_COLLECTION, documents(&["User ID: u1\nInput: hi"]).await);
    let app = TestApp::new(MockLlmClient::new(), store);

    app.state
        .agent_service
        .ask(&UserId::from_raw("u1"), "hi", None)
        .await
        .expect("agent should answer");

    let (messages, _) = &app.llm.requests()[0];
    let system = messages[0].content();
    assert!(system.contains("Feedback: User ID: u1\nInput: hi"));
}

#[tokio::test]
async fn given_unavailable_chat_history_when_asking_then_agent_still_answers() {
    let llm = Arc::new(MockLlmClient::new());
    let chats = Arc::new(MockChatRepository::failing_history());
    let vector_store = Arc::new(store().await);
    let search = Arc::new(SearchService::new(Arc::new(MockEmbedder), vector_store.clone()));
    let agent = AgentService::new(
        llm.clone(),
        chats.clone(),
        Arc::new(FeedbackService::new(
            chats.clone(),
            Arc::new(MockEmbedder),
            vector_store,
        )),
        RetrievalTools::new(search, 5),
        AgentConfig::default(),
    );

    let answer = agent
        .ask(&UserId::from_raw("u1"), "still there?", None)
        .await
        .expect("agent should answer without history");

    assert_eq!(answer.answer, "Mock answer");
    let (messages, _) = &llm.requests()[0];
    let contents: Vec<&str> = messages.iter().skip(1).map(ChatMessage::content).collect();
    assert_eq!(contents, vec!["still there?"]);
    assert_eq!(chats.records().len(), 1);
}
