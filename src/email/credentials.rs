use secrecy::Secret;

/// Everything needed to reach and authenticate against the relay. Built once at
/// startup from `SmtpSettings` and handed to the mailer.
#[derive(Debug)]
pub struct ServerCredentials {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
    pub from_address: String,
    pub from_name: String,
}

impl ServerCredentials {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
