use crate::email::ServerCredentials;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_bool_from_anything;
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use std::net::IpAddr;
use std::time::Duration;

/// Variable names understood by the serverless deployment this service replaces.
/// They are applied last, so they win over both the YAML files and `APP_*`.
const LEGACY_VARIABLES: [(&str, &str); 8] = [
    ("SMTP_HOST", "smtp.host"),
    ("SMTP_PORT", "smtp.port"),
    ("SMTP_USER", "smtp.username"),
    ("SMTP_PASS", "smtp.password"),
    ("FROM_EMAIL", "smtp.from_email"),
    ("FROM_NAME", "smtp.from_name"),
    ("RESEND_API_KEY", "resend.api_key"),
    ("USE_RESEND", "email_client.use_resend"),
];

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

#[derive(serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub smtp: SmtpSettings,
    pub resend: ResendSettings,
    pub email_client: EmailClientSettings,
}

#[derive(serde::Deserialize)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    pub port: Option<u16>,
    pub host: IpAddr,
    pub base_url: String,
    pub admin_token: Secret<String>,
}

#[derive(serde::Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub username: String,
    // Left unset when absent; the mailer rejects an empty password at send time.
    #[serde(default)]
    pub password: Option<Secret<String>>,
    pub from_email: String,
    pub from_name: String,
}

#[derive(serde::Deserialize)]
pub struct ResendSettings {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
}

#[derive(serde::Deserialize)]
pub struct EmailClientSettings {
    pub timeout_milliseconds: u64,
    /// Resend becomes the primary transport and SMTP the fallback.
    #[serde(default, deserialize_with = "deserialize_bool_from_anything")]
    pub use_resend: bool,
}

impl SmtpSettings {
    pub fn credentials(&self) -> ServerCredentials {
        ServerCredentials {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: Secret::new(
                self.password
                    .as_ref()
                    .map(|p| p.expose_secret().clone())
                    .unwrap_or_default(),
            ),
            from_address: self.from_email.clone(),
            from_name: self.from_name.clone(),
        }
    }
}

impl SmtpSettings {
    /// `From` value for transports that take the sender as a single string.
    pub fn sender(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

impl ResendSettings {
    pub fn api_key(&self) -> Option<Secret<String>> {
        self.api_key
            .as_ref()
            .map(|key| Secret::new(key.expose_secret().clone()))
    }
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either 'local' or 'production'.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let mut settings = config::Config::default();
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;
    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;
    for (variable, key) in LEGACY_VARIABLES {
        if let Ok(value) = std::env::var(variable) {
            settings.set(key, value)?;
        }
    }
    settings.try_into()
}
