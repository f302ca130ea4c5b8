use crate::domain::RecipientEmail;
use crate::email::{
    Connector, Email, OutboundMessage, SendError, ServerCredentials, SmtpSession, TcpConnector,
};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::time::Duration;

/// Port 465 usually means TLS from the first byte, which this client does not speak.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Delivers each email over its own short-lived SMTP connection. One attempt per
/// call, no retries.
pub struct SmtpEmailClient<C = TcpConnector> {
    connector: C,
    credentials: ServerCredentials,
    timeout: Duration,
}

impl SmtpEmailClient<TcpConnector> {
    pub fn new(credentials: ServerCredentials, timeout: Duration) -> Self {
        Self::with_connector(TcpConnector, credentials, timeout)
    }
}

impl<C: Connector> SmtpEmailClient<C> {
    pub fn with_connector(connector: C, credentials: ServerCredentials, timeout: Duration) -> Self {
        if credentials.port == IMPLICIT_TLS_PORT {
            tracing::warn!(
                relay = %credentials.address(),
                "SMTP relay is configured on the implicit TLS port, \
                but sessions are sent in plaintext"
            );
        }
        Self {
            connector,
            credentials,
            timeout,
        }
    }

    #[tracing::instrument(
        name = "Send an email over SMTP",
        skip(self, message),
        fields(
            recipient = %message.recipient(),
            relay = %self.credentials.address()
        )
    )]
    pub async fn send(&self, message: &OutboundMessage) -> Result<String, SendError> {
        if self.credentials.password.expose_secret().is_empty() {
            return Err(SendError::Configuration("the SMTP password is not set".into()));
        }
        let framed = message.frame(&self.credentials.from_name, &self.credentials.from_address);

        // On timeout the session future is dropped, and its connection with it.
        tokio::time::timeout(
            self.timeout,
            self.run_session(message.recipient(), &framed.content),
        )
        .await
        .unwrap_or_else(|_| Err(SendError::Timeout(self.timeout)))?;
        Ok(framed.message_id)
    }

    async fn run_session(&self, recipient: &RecipientEmail, framed: &str) -> Result<(), SendError> {
        let stream = self
            .connector
            .connect(&self.credentials.host, self.credentials.port)
            .await
            .map_err(|source| SendError::Connection {
                address: self.credentials.address(),
                source,
            })?;
        let mut session = SmtpSession::new(stream);
        let outcome = session
            .deliver(&self.credentials, recipient.as_ref(), framed)
            .await;
        session.close().await;
        outcome
    }
}

#[async_trait]
impl<C: Connector> Email for SmtpEmailClient<C> {
    async fn send_email(
        &self,
        recipient: &RecipientEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<String, SendError> {
        let message = OutboundMessage::new(recipient.clone(), subject, html_content);
        self.send(&message).await
    }
}
