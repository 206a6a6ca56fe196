use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::ports::{
    ChatRepository, EmailLogRepository, PasswordResetRepository, RepositoryError,
    SummaryRepository, UserRepository,
};
use crate::domain::{
    ChatRecord, ChatRecordId, CollectionName, DocSummary, EmailLog, EmailStatus,
    PasswordResetToken, User, UserId,
};

fn lock_failed<T>(e: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::ConnectionFailed(e.to_string())
}

/// Chat records kept in memory. `failing_history()` rejects `recent` and `page`.
#[derive(Default)]
pub struct MockChatRepository {
    records: Mutex<Vec<ChatRecord>>,
    fail_history: bool,
}

impl MockChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_history() -> Self {
        Self {
            fail_history: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<ChatRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn newest_first(&self, filter: impl Fn(&ChatRecord) -> bool) -> Result<Vec<ChatRecord>, RepositoryError> {
        let records = self.records.lock().map_err(lock_failed)?;
        let mut matching: Vec<ChatRecord> = records.iter().filter(|r| filter(r)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}

#[async_trait]
impl ChatRepository for MockChatRepository {
    async fn save(&self, record: &ChatRecord) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .map_err(lock_failed)?
            .push(record.clone());
        Ok(())
    }

    async fn find(
        &self,
        user_id: &UserId,
        id: ChatRecordId,
    ) -> Result<Option<ChatRecord>, RepositoryError> {
        Ok(self
            .newest_first(|r| r.id == id && &r.user_id == user_id)?
            .into_iter()
            .next())
    }

    async fn latest(&self, user_id: &UserId) -> Result<Option<ChatRecord>, RepositoryError> {
        Ok(self
            .newest_first(|r| &r.user_id == user_id)?
            .into_iter()
            .next())
    }

    async fn latest_by_query(
        &self,
        user_id: &UserId,
        query: &str,
    ) -> Result<Option<ChatRecord>, RepositoryError> {
        Ok(self
            .newest_first(|r| &r.user_id == user_id && r.query == query)?
            .into_iter()
            .next())
    }

    async fn recent(
        &self,
        user_id: &UserId,
        collection: Option<&CollectionName>,
        limit: usize,
    ) -> Result<Vec<ChatRecord>, RepositoryError> {
        if self.fail_history {
            return Err(RepositoryError::ConnectionFailed("mock".to_string()));
        }
        let mut records = self.newest_first(|r| {
            &r.user_id == user_id && r.collection_name.as_ref() == collection
        })?;
        records.truncate(limit);
        records.reverse();
        Ok(records)
    }

    async fn page(
        &self,
        user_id: &UserId,
        collection: &CollectionName,
        before: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<ChatRecord>, RepositoryError> {
        if self.fail_history {
            return Err(RepositoryError::ConnectionFailed("mock".to_string()));
        }
        let mut records = self.newest_first(|r| {
            &r.user_id == user_id
                && r.collection_name.as_ref() == Some(collection)
                && before.is_none_or(|b| r.created_at < b)
        })?;
        records.truncate(limit);
        Ok(records)
    }
}

#[derive(Default)]
pub struct MockUserRepository {
    users: Mutex<Vec<User>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: User) -> Self {
        Self {
            users: Mutex::new(vec![user]),
        }
    }

    pub fn users(&self) -> Vec<User> {
        self.users.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().map_err(lock_failed)?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::ConstraintViolation(
                "users_email_key".to_string(),
            ));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().map_err(lock_failed)?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().map_err(lock_failed)?;
        Ok(users.iter().find(|u| &u.id == id).cloned())
    }

    async fn update_password(
        &self,
        id: &UserId,
        hashed_password: &str,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().map_err(lock_failed)?;
        let user = users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Default)]
pub struct MockPasswordResetRepository {
    tokens: Mutex<Vec<PasswordResetToken>>,
}

impl MockPasswordResetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> Vec<PasswordResetToken> {
        self.tokens.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PasswordResetRepository for MockPasswordResetRepository {
    async fn create(&self, token: &PasswordResetToken) -> Result<(), RepositoryError> {
        self.tokens.lock().map_err(lock_failed)?.push(token.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<PasswordResetToken>, RepositoryError> {
        let tokens = self.tokens.lock().map_err(lock_failed)?;
        Ok(tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn mark_used(&self, token: &str, now: DateTime<Utc>) -> Result<bool, RepositoryError> {
        let mut tokens = self.tokens.lock().map_err(lock_failed)?;
        match tokens
            .iter_mut()
            .find(|t| t.token == token && !t.used && !t.is_expired(now))
        {
            Some(t) => {
                t.used = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MockSummaryRepository {
    summaries: Mutex<Vec<DocSummary>>,
}

impl MockSummaryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summaries(&self) -> Vec<DocSummary> {
        self.summaries.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SummaryRepository for MockSummaryRepository {
    async fn save(&self, summary: &DocSummary) -> Result<(), RepositoryError> {
        self.summaries
            .lock()
            .map_err(lock_failed)?
            .push(summary.clone());
        Ok(())
    }
}

/// Email audit log kept in memory. `failing()` rejects every insert.
#[derive(Default)]
pub struct MockEmailLogRepository {
    logs: Mutex<Vec<EmailLog>>,
    fail_inserts: bool,
}

impl MockEmailLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    pub fn logs(&self) -> Vec<EmailLog> {
        self.logs.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailLogRepository for MockEmailLogRepository {
    async fn insert(&self, log: &EmailLog) -> Result<(), RepositoryError> {
        if self.fail_inserts {
            return Err(RepositoryError::ConnectionFailed("mock".to_string()));
        }
        self.logs.lock().map_err(lock_failed)?.push(log.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: EmailStatus,
        error: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut logs = self.logs.lock().map_err(lock_failed)?;
        let log = logs
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        log.status = status;
        log.error = error.map(String::from);
        log.updated_at = Utc::now();
        Ok(())
    }
}
