use std::time::Duration;

/// Every way a single delivery can fail. SMTP authentication rejections are not
/// told apart from network trouble: both surface as `Protocol`.
#[derive(thiserror::Error, Debug)]
pub enum SendError {
    #[error("Email delivery is misconfigured: {0}")]
    Configuration(String),
    #[error("Failed to connect to {address}: {source}")]
    Connection {
        address: String,
        source: std::io::Error,
    },
    #[error("SMTP {stage} failed: {source}")]
    Protocol {
        stage: &'static str,
        source: std::io::Error,
    },
    #[error("SMTP connection timeout after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("Failed to reach the Resend API: {0}")]
    Http(#[source] reqwest::Error),
    #[error("Resend API error: {0}")]
    Api(String),
}
