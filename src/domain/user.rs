use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::Serialize;
use std::fmt;

/// Opaque user identifier: 16 random bytes rendered as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, hashed_password: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            name,
            email,
            hashed_password,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            id: self.id.as_str().to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// The only projection of a user that leaves the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPublic {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
