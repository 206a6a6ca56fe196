use async_trait::async_trait;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mailer not configured: {0}")]
    NotConfigured(String),
    #[error("invalid message: {0}")]
    InvalidMessage(String),
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
}
