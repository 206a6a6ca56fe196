use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::application::ports::{
    PasswordHasher, PasswordResetRepository, RepositoryError, TokenError, TokenService,
    UserRepository,
};
use crate::application::services::EmailService;
use crate::domain::{PasswordResetToken, User, UserId, UserPublic};

pub const RESET_REQUESTED_MESSAGE: &str = "If the email exists, a reset link has been sent";
const RESET_TOKEN_TTL_HOURS: i64 = 1;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginResult {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserPublic,
}

/// Identity carried by an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    reset_tokens: Arc<dyn PasswordResetRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    email_service: Arc<EmailService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        reset_tokens: Arc<dyn PasswordResetRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        email_service: Arc<EmailService>,
    ) -> Self {
        Self {
            users,
            reset_tokens,
            hasher,
            tokens,
            email_service,
        }
    }

    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: SignupRequest) -> Result<UserPublic, AuthError> {
        let email = normalize_email(&request.email);
        let name = request.name.trim().to_string();
        validate_signup(&name, &email, &request.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::warn!("Signup rejected: email already registered");
            return Err(AuthError::EmailTaken);
        }

        let hashed = self.hasher.hash(&request.password)?;
        let user = User::new(name, email, hashed);
        match self.users.create(&user).await {
            Ok(()) => {}
            Err(RepositoryError::ConstraintViolation(_)) => return Err(AuthError::EmailTaken),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user.to_public())
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.hashed_password) {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(user.id.as_str(), &user.email)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginResult {
            access_token,
            token_type: "bearer",
            user: user.to_public(),
        })
    }

    /// Resolves a bearer token to an active user.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let claims = self.tokens.decode(token).map_err(|e| match e {
            TokenError::Expired => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        let sub = claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::InvalidTokenPayload)?;

        let user = self
            .users
            .find_by_id(&UserId::from_raw(sub))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::UserInactive);
        }

        Ok(CurrentUser {
            id: user.id,
            email: user.email,
        })
    }

    pub async fn me(&self, user_id: &UserId) -> Result<UserPublic, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|u| u.to_public())
            .ok_or(AuthError::UserNotFound)
    }

    /// Issues a reset token for a known email. Unknown emails are indistinguishable to the caller.
    #[tracing::instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str) -> Result<&'static str, AuthError> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::info!("Password reset requested for unknown email");
            return Ok(RESET_REQUESTED_MESSAGE);
        };

        let reset = PasswordResetToken::issue(
            user.id.clone(),
            user.email.clone(),
            Duration::hours(RESET_TOKEN_TTL_HOURS),
        );
        self.reset_tokens.create(&reset).await?;

        let content = format!(
            "Use this token to reset your password: {}\nThis token expires at {}",
            reset.token,
            reset.expires_at.to_rfc3339()
        );
        self.email_service
            .send(&user.email, "Password Reset", &content, "password_reset")
            .await;

        tracing::info!(user_id = %user.id, "Password reset token issued");
        Ok(RESET_REQUESTED_MESSAGE)
    }

    #[tracing::instrument(skip(self, token, new_password))]
    pub async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let reset = self
            .reset_tokens
            .find(token)
            .await?
            .ok_or(AuthError::ResetTokenInvalid)?;

        if reset.used {
            return Err(AuthError::ResetTokenUsed);
        }
        if reset.is_expired(Utc::now()) {
            return Err(AuthError::ResetTokenExpired);
        }
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let hashed = self.hasher.hash(new_password)?;
        if !self.reset_tokens.mark_used(token, Utc::now()).await? {
            tracing::warn!(user_id = %reset.user_id, "Reset token claimed concurrently");
            return Err(AuthError::ResetTokenUsed);
        }
        self.users.update_password(&reset.user_id, &hashed).await?;

        tracing::info!(user_id = %reset.user_id, "Password reset completed");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if name.is_empty() {
        return Err(AuthError::Validation("Name must not be empty".to_string()));
    }
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(AuthError::Validation("Invalid email address".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Invalid token payload")]
    InvalidTokenPayload,
    #[error("User not found")]
    UserNotFound,
    #[error("User is inactive")]
    UserInactive,
    #[error("Invalid token")]
    ResetTokenInvalid,
    #[error("Token already used")]
    ResetTokenUsed,
    #[error("Token expired")]
    ResetTokenExpired,
    #[error("credentials: {0}")]
    Credentials(#[from] TokenError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
