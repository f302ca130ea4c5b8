use async_trait::async_trait;
use crm_mailer::configuration::get_configuration;
use crm_mailer::domain::RecipientEmail;
use crm_mailer::email::{Email, SendError};
use crm_mailer::startup::Application;
use crm_mailer::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use secrecy::ExposeSecret;
use std::sync::{Arc, Mutex};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html: String,
}

/// Stands in for the relay: remembers what it was asked to send and fails the
/// addresses it was told to reject.
#[derive(Default)]
pub struct RecordingEmailClient {
    pub sent_emails: Mutex<Vec<SentEmail>>,
    rejected: Mutex<Vec<String>>,
}

impl RecordingEmailClient {
    pub fn reject(&self, address: &str) {
        self.rejected.lock().unwrap().push(address.to_string());
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent_emails.lock().unwrap().clone()
    }
}

#[async_trait]
impl Email for RecordingEmailClient {
    async fn send_email(
        &self,
        recipient: &RecipientEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<String, SendError> {
        let rejected = self
            .rejected
            .lock()
            .unwrap()
            .iter()
            .any(|r| r == recipient.as_ref());
        if rejected {
            return Err(SendError::Protocol {
                stage: "RCPT TO",
                source: std::io::Error::new(std::io::ErrorKind::Other, "550 no such user"),
            });
        }
        let mut sent_emails = self.sent_emails.lock().unwrap();
        sent_emails.push(SentEmail {
            recipient: recipient.as_ref().to_string(),
            subject: subject.to_string(),
            html: html_content.to_string(),
        });
        Ok(format!("<{}@recording.test>", sent_emails.len()))
    }
}

pub struct TestApp {
    pub address: String,
    pub admin_token: String,
    pub email_client: Arc<RecordingEmailClient>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_alert_email(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/alert-email", &self.address))
            .bearer_auth(&self.admin_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_alert_notifications(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/alert-notifications", &self.address))
            .bearer_auth(&self.admin_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = None;
        c
    };
    let admin_token = configuration
        .application
        .admin_token
        .expose_secret()
        .clone();

    let email_client = Arc::new(RecordingEmailClient::default());
    let Application { server, mut port } =
        Application::build(&configuration, email_client.clone())
            .await
            .expect("Failed to build application.");
    let _ = tokio::spawn(server.launch());
    let port = port.get().await.expect("The server never reported its port.");

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        admin_token,
        email_client,
        api_client: reqwest::Client::new(),
    }
}
