mod alert_email;
mod alert_notifications;
mod health;

pub use alert_email::*;
pub use alert_notifications::*;
pub use health::*;

/// JSON body of every failed mailing request.
#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
