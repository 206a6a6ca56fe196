use neurodesk::application::ports::ChatRepository;
use neurodesk::application::services::{FEEDBACK_COLLECTION, FeedbackError, FeedbackRequest};
use neurodesk::domain::{ChatRecord, ChatRecordId, UserId};

use crate::helpers::TestApp;

async fn app_with_chats(user: &UserId) -> (TestApp, ChatRecord, ChatRecord) {
    let app = TestApp::with_defaults();
    let older = ChatRecord::new(
        user.clone(),
        None,
        "what is rust?".to_string(),
        None,
        "a language".to_string(),
    );
    let mut newer = ChatRecord::new(
        user.clone(),
        None,
        "what is tokio?".to_string(),
        None,
        "a runtime".to_string(),
    );
    newer.created_at = older.created_at + chrono::Duration::seconds(1);
    app.chats.save(&older).await.expect("save");
    app.chats.save(&newer).await.expect("save");
    (app, older, newer)
}

#[tokio::test]
async fn given_no_target_when_recording_feedback_then_latest_chat_is_used() {
    let user = UserId::from_raw("u1");
    let (app, _, newer) = app_with_chats(&user).await;

    let feedback = app
        .state
        .feedback_service
        .record_feedback(
            &user,
            FeedbackRequest {
                is_positive: true,
                ..FeedbackRequest::default()
            },
        )
        .await
        .expect("feedback should be stored");

    assert_eq!(feedback.input, newer.query);
    assert_eq!(feedback.output, newer.llm_response);

    let stored = app.vector_store.documents(FEEDBACK_COLLECTION);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].metadata["type"], "feedback");
    assert_eq!(stored[0].metadata["user_id"], "u1");
    assert_eq!(stored[0].metadata["is_positive"], true);
    assert!(stored[0].text.contains("Is Feedback Positive: True"));
}

#[tokio::test]
async fn given_chat_id_when_recording_feedback_then_that_chat_is_used() {
    let user = UserId::from_raw("u1");
    let (app, older, _) = app_with_chats(&user).await;

    let feedback = app
        .state
        .feedback_service
        .record_feedback(
            &user,
            FeedbackRequest {
                is_positive: false,
                chat_id: Some(older.id),
                comments: Some("too short".to_string()),
                ..FeedbackRequest::default()
            },
        )
        .await
        .expect("feedback should be stored");

    assert_eq!(feedback.input, "what is rust?");
    assert_eq!(feedback.comments.as_deref(), Some("too short"));
}

#[tokio::test]
async fn given_query_when_recording_feedback_then_matching_chat_is_used() {
    let user = UserId::from_raw("u1");
    let (app, _, _) = app_with_chats(&user).await;

    let feedback = app
        .state
        .feedback_service
        .record_feedback(
            &user,
            FeedbackRequest {
                is_positive: true,
                query: Some("what is rust?".to_string()),
                ..FeedbackRequest::default()
            },
        )
        .await
        .expect("feedback should be stored");

    assert_eq!(feedback.output, "a language");
}

#[tokio::test]
async fn given_other_users_chat_id_when_recording_feedback_then_chat_not_found() {
    let owner = UserId::from_raw("u1");
    let (app, older, _) = app_with_chats(&owner).await;

    let result = app
        .state
        .feedback_service
        .record_feedback(
            &UserId::from_raw("u2"),
            FeedbackRequest {
                is_positive: true,
                chat_id: Some(older.id),
                ..FeedbackRequest::default()
            },
        )
        .await;

    assert!(matches!(result, Err(FeedbackError::ChatNotFound)));
    assert!(app.vector_store.documents(FEEDBACK_COLLECTION).is_empty());
}

#[tokio::test]
async fn given_unknown_chat_id_when_recording_feedback_then_chat_not_found() {
    let user = UserId::from_raw("u1");
    let (app, _, _) = app_with_chats(&user).await;

    let result = app
        .state
        .feedback_service
        .record_feedback(
            &user,
            FeedbackRequest {
                is_positive: true,
                chat_id: Some(ChatRecordId::new()),
                ..FeedbackRequest::default()
            },
        )
        .await;

    assert!(matches!(result, Err(FeedbackError::ChatNotFound)));
}

#[tokio::test]
async fn given_no_feedback_collection_when_looking_up_similar_then_returns_empty() {
    let app = TestApp::with_defaults();

    let similar = app
        .state
        .feedback_service
        .similar_feedback("anything", 5)
        .await
        .expect("lookup should succeed");

    assert!(similar.is_empty());
}

#[tokio::test]
async fn given_recorded_feedback_when_looking_up_similar_then_it_is_returned() {
    let user = UserId::from_raw("u1");
    let (app, _, _) = app_with_chats(&user).await;
    app.state
        .feedback_service
        .record_feedback(
            &user,
            FeedbackRequest {
                is_positive: true,
                ..FeedbackRequest::default()
            },
        )
        .await
        .expect("feedback should be stored");

    let similar = app
        .state
        .feedback_service
        .similar_feedback("what is tokio?", 5)
        .await
        .expect("lookup should succeed");

    assert_eq!(similar.len(), 1);
    assert!(similar[0].contains("Input: what is tokio?"));
}
