mod batch;
mod connector;
mod credentials;
mod error;
mod fallback_email_client;
mod message;
mod resend_email_client;
mod smtp;
mod smtp_email_client;

#[cfg(test)]
pub(crate) mod fake_relay;

use crate::domain::RecipientEmail;
use async_trait::async_trait;
pub use batch::{BatchMailer, BatchResult, SendResult};
pub use connector::{Connector, TcpConnector};
pub use credentials::ServerCredentials;
pub use error::SendError;
pub use fallback_email_client::FallbackEmailClient;
pub use message::{FramedMessage, OutboundMessage};
pub use resend_email_client::ResendEmailClient;
pub use smtp::SmtpSession;
pub use smtp_email_client::SmtpEmailClient;

#[async_trait]
pub trait Email: Send + Sync {
    /// Sends one email and returns the id the transport assigned to it.
    async fn send_email(
        &self,
        recipient: &RecipientEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<String, SendError>;
}
