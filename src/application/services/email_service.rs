use std::sync::Arc;

use crate::application::ports::{EmailLogRepository, Mailer};
use crate::domain::{EmailLog, EmailStatus};

/// Sends mail through the configured [`Mailer`] and keeps an audit trail of every attempt.
pub struct EmailService {
    mailer: Arc<dyn Mailer>,
    email_logs: Arc<dyn EmailLogRepository>,
}

impl EmailService {
    pub fn new(mailer: Arc<dyn Mailer>, email_logs: Arc<dyn EmailLogRepository>) -> Self {
        Self { mailer, email_logs }
    }

    /// Delivery and logging failures are recorded and logged, never returned.
    #[tracing::instrument(skip(self, content))]
    pub async fn send(&self, email: &str, subject: &str, content: &str, kind: &str) {
        let log = EmailLog::pending(email, subject, content, kind);
        let logged = match self.email_logs.insert(&log).await {
            Ok(()) => {
                tracing::info!(log_id = %log.id, "Email log created");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create email log");
                false
            }
        };

        let outcome = self.mailer.send(email, subject, content).await;

        match (outcome, logged) {
            (Ok(()), true) => {
                if let Err(e) = self
                    .email_logs
                    .update_status(log.id, EmailStatus::Sent, None)
                    .await
                {
                    tracing::error!(error = %e, "Failed to mark email as sent");
                }
                tracing::info!(subject, "Email sent");
            }
            (Ok(()), false) => tracing::info!(subject, "Email sent without audit log"),
            (Err(e), true) => {
                tracing::error!(error = %e, "Failed to send email");
                let message = e.to_string();
                if let Err(e) = self
                    .email_logs
                    .update_status(log.id, EmailStatus::Failed, Some(&message))
                    .await
                {
                    tracing::error!(error = %e, "Failed to mark email as failed");
                }
            }
            (Err(e), false) => {
                tracing::error!(error = %e, "Failed to send email");
                let failed = EmailLog {
                    status: EmailStatus::Failed,
                    error: Some(e.to_string()),
                    ..EmailLog::pending(email, subject, content, kind)
                };
                if let Err(e) = self.email_logs.insert(&failed).await {
                    tracing::error!(error = %e, "Failed to record failed email");
                }
            }
        }
    }
}
