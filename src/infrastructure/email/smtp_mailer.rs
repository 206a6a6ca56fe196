use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::application::ports::{Mailer, MailerError};

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
}

/// Plain-text mail over SMTP with STARTTLS. Missing credentials surface as a send failure.
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn credentials(&self) -> Result<(String, String), MailerError> {
        match (&self.settings.username, &self.settings.password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Ok((user.clone(), pass.clone()))
            }
            _ => Err(MailerError::NotConfigured(
                "SMTP username and password must be set".to_string(),
            )),
        }
    }

    fn transport(
        &self,
        username: String,
        password: String,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)
                .map_err(|e| MailerError::NotConfigured(e.to_string()))?
                .port(self.settings.port)
                .credentials(Credentials::new(username, password))
                .build(),
        )
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(skip(self, body), fields(host = %self.settings.host))]
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        let (username, password) = self.credentials()?;
        let from = self.settings.from.clone().unwrap_or_else(|| username.clone());

        let from: Mailbox = from
            .parse()
            .map_err(|e| MailerError::InvalidMessage(format!("invalid sender address: {e}")))?;
        let to: Mailbox = to
            .parse()
            .map_err(|e| MailerError::InvalidMessage(format!("invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailerError::InvalidMessage(e.to_string()))?;

        self.transport(username, password)?
            .send(message)
            .await
            .map_err(|e| MailerError::DeliveryFailed(e.to_string()))?;

        Ok(())
    }
}
