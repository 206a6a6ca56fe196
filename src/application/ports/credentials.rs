use serde::{Deserialize, Serialize};

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, TokenError>;

    /// Malformed hashes verify as `false`.
    fn verify(&self, plain: &str, hashed: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates bearer access tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: &str, email: &str) -> Result<String, TokenError>;

    fn decode(&self, token: &str) -> Result<AccessClaims, TokenError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("hashing failed: {0}")]
    Hashing(String),
}
