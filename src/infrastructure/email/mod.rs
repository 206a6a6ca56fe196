mod mock_mailer;
mod smtp_mailer;

pub use mock_mailer::{MockMailer, SentEmail};
pub use smtp_mailer::{SmtpMailer, SmtpSettings};
