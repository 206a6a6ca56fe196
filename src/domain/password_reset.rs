use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use super::UserId;

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub token: String,
    pub user_id: UserId,
    pub email: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    pub fn issue(user_id: UserId, email: String, ttl: Duration) -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let now = Utc::now();

        Self {
            token: URL_SAFE_NO_PAD.encode(bytes),
            user_id,
            email,
            expires_at: now + ttl,
            used: false,
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
