use chrono::{Duration, Utc};

use neurodesk::application::ports::{
    ChatRepository, EmailLogRepository, PasswordResetRepository, RepositoryError,
    SummaryRepository, UserRepository,
};
use neurodesk::domain::{
    ChatRecord, CollectionName, DocSummary, EmailLog, EmailStatus, PasswordResetToken, User,
    UserId,
};
use neurodesk::infrastructure::persistence::{
    PgChatRepository, PgEmailLogRepository, PgPasswordResetRepository, PgSummaryRepository,
    PgUserRepository,
};

use crate::helpers::test_postgres::TestPostgres;

#[tokio::test]
#[ignore = "requires docker"]
async fn given_postgres_when_creating_users_then_duplicate_email_is_a_constraint_violation() {
    let pg = TestPostgres::new().await;
    let users = PgUserRepository::new(pg.pool.clone());
    let user = User::new(
        "Ada".to_string(),
        "ada@example.com".to_string(),
        "hash".to_string(),
    );

    users.create(&user).await.expect("insert user");
    let duplicate = User::new(
        "Other".to_string(),
        "ada@example.com".to_string(),
        "hash".to_string(),
    );
    let result = users.create(&duplicate).await;

    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
    let found = users
        .find_by_email("ada@example.com")
        .await
        .expect("query")
        .expect("user exists");
    assert_eq!(found.id, user.id);

    users
        .update_password(&user.id, "new-hash")
        .await
        .expect("update");
    let updated = users.find_by_id(&user.id).await.expect("query").expect("user");
    assert_eq!(updated.hashed_password, "new-hash");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_postgres_when_paging_chats_then_newest_first_with_cursor() {
    let pg = TestPostgres::new().await;
    let chats = PgChatRepository::new(pg.pool.clone());
    let user = UserId::from_raw("u1");
    let collection = CollectionName::from_raw("user_u1_doc_paper");
    let base = Utc::now() - Duration::minutes(10);

    for i in 0..3 {
        let mut record = ChatRecord::new(
            user.clone(),
            Some(collection.clone()),
            format!("q{i}"),
            None,
            format!("a{i}"),
        );
        record.created_at = base + Duration::minutes(i);
        chats.save(&record).await.expect("save");
    }
    chats
        .save(&ChatRecord::new(
            user.clone(),
            None,
            "unscoped".to_string(),
            Some("[]".to_string()),
            "answer".to_string(),
        ))
        .await
        .expect("save");

    let page = chats
        .page(&user, &collection, None, 2)
        .await
        .expect("page");
    assert_eq!(
        page.iter().map(|r| r.query.as_str()).collect::<Vec<_>>(),
        vec!["q2", "q1"]
    );

    let older = chats
        .page(&user, &collection, Some(page[1].created_at), 2)
        .await
        .expect("page");
    assert_eq!(older.len(), 1);
    assert_eq!(older[0].query, "q0");

    let unscoped = chats.recent(&user, None, 10).await.expect("recent");
    assert_eq!(unscoped.len(), 1);
    assert_eq!(unscoped[0].retrieved_documents.as_deref(), Some("[]"));

    let scoped = chats
        .recent(&user, Some(&collection), 10)
        .await
        .expect("recent");
    assert_eq!(
        scoped.iter().map(|r| r.query.as_str()).collect::<Vec<_>>(),
        vec!["q0", "q1", "q2"]
    );

    let latest = chats.latest(&user).await.expect("latest").expect("record");
    assert_eq!(latest.query, "unscoped");
    let by_query = chats
        .latest_by_query(&user, "q1")
        .await
        .expect("query")
        .expect("record");
    assert_eq!(by_query.llm_response, "a1");
    assert!(
        chats
            .find(&UserId::from_raw("u2"), by_query.id)
            .await
            .expect("find")
            .is_none()
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_postgres_when_spending_reset_token_then_only_first_claim_succeeds() {
    let pg = TestPostgres::new().await;
    let users = PgUserRepository::new(pg.pool.clone());
    let resets = PgPasswordResetRepository::new(pg.pool.clone());
    let user = User::new(
        "Ada".to_string(),
        "ada@example.com".to_string(),
        "hash".to_string(),
    );
    users.create(&user).await.expect("insert user");

    let token = PasswordResetToken::issue(user.id.clone(), user.email.clone(), Duration::hours(1));
    resets.create(&token).await.expect("insert token");
    let first = resets.mark_used(&token.token, Utc::now()).await.expect("claim");
    let second = resets.mark_used(&token.token, Utc::now()).await.expect("claim again");
    assert!(first);
    assert!(!second);

    let stored = resets
        .find(&token.token)
        .await
        .expect("query")
        .expect("token exists");
    assert!(stored.used);
    assert_eq!(stored.user_id, user.id);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_postgres_when_logging_email_and_summary_then_rows_persist() {
    let pg = TestPostgres::new().await;
    let logs = PgEmailLogRepository::new(pg.pool.clone());
    let summaries = PgSummaryRepository::new(pg.pool.clone());

    let log = EmailLog::pending("ada@example.com", "Hello", "Body", "welcome");
    logs.insert(&log).await.expect("insert log");
    logs.update_status(log.id, EmailStatus::Failed, Some("relay down"))
        .await
        .expect("update log");

    let status: String = sqlx::query_scalar("SELECT status FROM email_logs WHERE id = $1")
        .bind(log.id)
        .fetch_one(&pg.pool)
        .await
        .expect("select status");
    assert_eq!(status, "failed");

    summaries
        .save(&DocSummary::new(
            UserId::from_raw("u1"),
            "paper.pdf".to_string(),
            CollectionName::from_raw("user_u1_doc_paper"),
            "A paper.".to_string(),
        ))
        .await
        .expect("save summary");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM doc_summaries")
        .fetch_one(&pg.pool)
        .await
        .expect("count");
    assert_eq!(count, 1);
}
