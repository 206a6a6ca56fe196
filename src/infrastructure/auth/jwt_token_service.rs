use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::application::ports::{AccessClaims, TokenError, TokenService};

/// HMAC-signed JWT access tokens.
pub struct JwtTokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &str, algorithm: &str, ttl_hours: i64) -> Result<Self, TokenError> {
        let algorithm = match algorithm.to_ascii_uppercase().as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(TokenError::Invalid(format!(
                    "unsupported signing algorithm: {other}"
                )));
            }
        };

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: &str, email: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: Some(user_id.to_string()),
            email: Some(email.to_string()),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation.required_spec_claims.insert("exp".to_string());

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    tracing::debug!(error = %e, "Rejected access token");
                    TokenError::Invalid(e.to_string())
                }
            })
    }
}
