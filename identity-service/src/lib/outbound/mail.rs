use async_trait::async_trait;

use crate::identity::errors::MailerError;
use crate::identity::models::EmailAddress;
use crate::identity::ports::Mailer;

/// Local-dev mailer that logs the reset link instead of sending mail.
///
/// Production deployments substitute an SMTP- or API-backed `Mailer`; the
/// service only sees the port.
#[derive(Clone, Debug, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_reset_link(&self, to: &EmailAddress, link: &str) -> Result<(), MailerError> {
        tracing::info!(to = %to, link = %link, "Reset mail dispatch (log sender)");
        Ok(())
    }
}
