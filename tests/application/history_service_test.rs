use chrono::{Duration, Utc};

use neurodesk::application::ports::ChatRepository;
use neurodesk::application::services::HistoryError;
use neurodesk::domain::{ChatRecord, CollectionName, UserId};

use crate::helpers::TestApp;

async fn app_with_history(user: &UserId, collection: &CollectionName, count: i64) -> TestApp {
    let app = TestApp::with_defaults();
    let base = Utc::now() - Duration::minutes(count);
    for i in 0..count {
        let mut record = ChatRecord::new(
            user.clone(),
            Some(collection.clone()),
            format!("question {i}"),
            None,
            format!("answer {i}"),
        );
        record.created_at = base + Duration::minutes(i);
        app.chats.save(&record).await.expect("save");
    }
    app
}

#[tokio::test]
async fn given_more_chats_than_limit_when_paging_then_cursor_walks_backwards() {
    let user = UserId::from_raw("u1");
    let collection = CollectionName::from_raw("user_u1_doc_paper");
    let app = app_with_history(&user, &collection, 5).await;
    let history = &app.state.history_service;

    let first = history
        .history_page(&user, &collection, 2, None)
        .await
        .expect("first page");

    let contents: Vec<&str> = first.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["question 3", "answer 3", "question 4", "answer 4"]);
    assert_eq!(first.messages[0].role, "user");
    assert_eq!(first.messages[1].role, "assistant");
    assert_eq!(first.messages[1].id, format!("{}-ai", first.messages[0].id));
    let cursor = first.next_cursor.expect("more pages");

    let second = history
        .history_page(&user, &collection, 2, Some(&cursor))
        .await
        .expect("second page");
    assert_eq!(second.messages[0].content, "question 1");
    let cursor = second.next_cursor.expect("more pages");

    let last = history
        .history_page(&user, &collection, 2, Some(&cursor))
        .await
        .expect("last page");
    assert_eq!(last.messages.len(), 2);
    assert_eq!(last.messages[0].content, "question 0");
    assert!(last.next_cursor.is_none());
}

#[tokio::test]
async fn given_foreign_collection_when_paging_then_access_is_denied() {
    let app = TestApp::with_defaults();

    let result = app
        .state
        .history_service
        .history_page(
            &UserId::from_raw("u1"),
            &CollectionName::from_raw("user_u2_doc_paper"),
            20,
            None,
        )
        .await;

    assert!(matches!(result, Err(HistoryError::AccessDenied)));
}

#[tokio::test]
async fn given_malformed_cursor_when_paging_then_invalid_cursor() {
    let app = TestApp::with_defaults();

    let result = app
        .state
        .history_service
        .history_page(
            &UserId::from_raw("u1"),
            &CollectionName::from_raw("user_u1_doc_paper"),
            20,
            Some("yesterday"),
        )
        .await;

    assert!(matches!(result, Err(HistoryError::InvalidCursor(c)) if c == "yesterday"));
}

#[tokio::test]
async fn given_empty_collection_when_paging_then_no_messages_and_no_cursor() {
    let app = TestApp::with_defaults();

    let page = app
        .state
        .history_service
        .history_page(
            &UserId::from_raw("u1"),
            &CollectionName::from_raw("user_u1_doc_paper"),
            20,
            None,
        )
        .await
        .expect("page");

    assert!(page.messages.is_empty());
    assert!(page.next_cursor.is_none());
}
