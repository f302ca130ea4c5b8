use crate::domain::RecipientEmail;
use crate::email::{Email, SendError};
use async_trait::async_trait;
use std::sync::Arc;

/// Tries `primary` first and `fallback` only when the primary fails. If both
/// fail, the caller sees the primary's error.
pub struct FallbackEmailClient {
    primary: Arc<dyn Email>,
    fallback: Arc<dyn Email>,
}

impl FallbackEmailClient {
    pub fn new(primary: Arc<dyn Email>, fallback: Arc<dyn Email>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl Email for FallbackEmailClient {
    async fn send_email(
        &self,
        recipient: &RecipientEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<String, SendError> {
        let primary_error = match self
            .primary
            .send_email(recipient, subject, html_content)
            .await
        {
            Ok(message_id) => return Ok(message_id),
            Err(e) => e,
        };
        tracing::warn!(
            recipient = %recipient,
            error.cause_chain = ?primary_error,
            "Primary email transport failed, trying the fallback"
        );
        match self
            .fallback
            .send_email(recipient, subject, html_content)
            .await
        {
            Ok(message_id) => Ok(message_id),
            Err(fallback_error) => {
                tracing::error!(
                    recipient = %recipient,
                    error.cause_chain = ?fallback_error,
                    "Fallback email transport also failed"
                );
                Err(primary_error)
            }
        }
    }
}
