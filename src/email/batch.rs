use crate::domain::{Recipient, RecipientEmail};
use crate::email::Email;
use std::sync::Arc;

/// Outcome of one delivery inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendResult {
    Sent,
    Failed { reason: String },
}

/// Per-recipient outcomes of a batch. `errors` follows recipient order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub sent_count: usize,
    pub failed_count: usize,
    pub errors: Vec<String>,
}

impl BatchResult {
    pub fn record(&mut self, recipient: &str, result: SendResult) {
        match result {
            SendResult::Sent => self.sent_count += 1,
            SendResult::Failed { reason } => {
                self.failed_count += 1;
                self.errors
                    .push(format!("Failed to send to {}: {}", recipient, reason));
            }
        }
    }

    pub fn attempted(&self) -> usize {
        self.sent_count + self.failed_count
    }
}

/// Sends the same email to a list of recipients, one after the other. A failed
/// recipient never stops the rest of the batch.
#[derive(Clone)]
pub struct BatchMailer {
    email_client: Arc<dyn Email>,
}

impl BatchMailer {
    pub fn new(email_client: Arc<dyn Email>) -> Self {
        Self { email_client }
    }

    #[tracing::instrument(
        name = "Send an email to many recipients",
        skip(self, recipients, html_content),
        fields(recipients = recipients.len())
    )]
    pub async fn send_to_many(
        &self,
        recipients: &[Recipient],
        subject: &str,
        html_content: &str,
    ) -> BatchResult {
        let mut result = BatchResult::default();
        for recipient in recipients {
            let outcome = self.send_one(&recipient.email, subject, html_content).await;
            result.record(recipient.email.as_ref(), outcome);
        }
        result
    }

    /// Sends one email of a batch. Failures are logged and reported, never
    /// propagated.
    pub async fn send_one(
        &self,
        recipient: &RecipientEmail,
        subject: &str,
        html_content: &str,
    ) -> SendResult {
        match self
            .email_client
            .send_email(recipient, subject, html_content)
            .await
        {
            Ok(message_id) => {
                tracing::info!(
                    recipient = %recipient,
                    message_id = %message_id,
                    "Email sent successfully"
                );
                SendResult::Sent
            }
            Err(e) => {
                tracing::error!(
                    recipient = %recipient,
                    error.cause_chain = ?e,
                    "Failed to send email"
                );
                SendResult::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
