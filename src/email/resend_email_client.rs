use crate::domain::RecipientEmail;
use crate::email::{Email, SendError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

/// Delivers email through the Resend HTTP API.
pub struct ResendEmailClient {
    http_client: Client,
    base_url: String,
    sender: String,
    // Unset keys fail every send, the same way an unset SMTP password does.
    api_key: Option<Secret<String>>,
}

impl ResendEmailClient {
    pub fn new(
        base_url: String,
        sender: String,
        api_key: Option<Secret<String>>,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http_client,
            base_url,
            sender,
            api_key,
        }
    }
}

#[derive(serde::Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(serde::Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[async_trait]
impl Email for ResendEmailClient {
    #[tracing::instrument(
        name = "Send an email through Resend",
        skip(self, subject, html_content),
        fields(recipient = %recipient)
    )]
    async fn send_email(
        &self,
        recipient: &RecipientEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<String, SendError> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
            .ok_or_else(|| SendError::Configuration("RESEND_API_KEY not configured".into()))?;
        let url = Url::parse(&self.base_url)
            .and_then(|base| base.join("/emails"))
            .map_err(|e| SendError::Configuration(format!("invalid Resend base url: {}", e)))?;
        let request_body = SendEmailRequest {
            from: &self.sender,
            to: [recipient.as_ref()],
            subject,
            html: html_content,
        };

        let response = self
            .http_client
            .post(url)
            .bearer_auth(api_key.expose_secret())
            .json(&request_body)
            .send()
            .await
            .map_err(SendError::Http)?;
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Api(body));
        }
        let sent: SendEmailResponse = response.json().await.map_err(SendError::Http)?;
        Ok(sent.id)
    }
}
