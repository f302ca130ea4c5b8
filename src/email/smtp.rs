use crate::email::{SendError, ServerCredentials};
use secrecy::ExposeSecret;
use std::borrow::Cow;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Large enough for the single-line replies relays give to these commands.
/// Longer multi-line replies may be read partially.
const REPLY_BUFFER_SIZE: usize = 2048;

/// One SMTP conversation over an already-open byte stream.
pub struct SmtpSession<S> {
    stream: S,
    buffer: [u8; REPLY_BUFFER_SIZE],
}

impl<S> SmtpSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: [0; REPLY_BUFFER_SIZE],
        }
    }

    /// Runs greeting, `EHLO`, `AUTH PLAIN`, `MAIL FROM`, `RCPT TO`, `DATA`, the
    /// message and `QUIT`, strictly in that order. Reply codes are not
    /// inspected: any non-empty reply lets the session advance.
    pub async fn deliver(
        &mut self,
        credentials: &ServerCredentials,
        recipient: &str,
        framed_message: &str,
    ) -> Result<(), SendError> {
        self.read_reply("greeting").await?;
        self.command("EHLO", &format!("EHLO {}", credentials.host)).await?;
        let auth = sasl_plain(&credentials.username, credentials.password.expose_secret());
        self.command("AUTH", &format!("AUTH PLAIN {}", auth)).await?;
        let mail_from = format!("MAIL FROM:<{}>", credentials.from_address);
        self.command("MAIL FROM", &mail_from).await?;
        self.command("RCPT TO", &format!("RCPT TO:<{}>", recipient)).await?;
        self.command("DATA", "DATA").await?;
        let data = format!("{}\r\n.", dot_stuff(framed_message));
        self.command("message transfer", &data).await?;
        self.command("QUIT", "QUIT").await
    }

    /// Shuts the write half down and drops the stream.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "SMTP connection did not shut down cleanly");
        }
    }

    async fn command(&mut self, stage: &'static str, line: &str) -> Result<(), SendError> {
        self.stream
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .map_err(|source| SendError::Protocol { stage, source })?;
        self.read_reply(stage).await
    }

    async fn read_reply(&mut self, stage: &'static str) -> Result<(), SendError> {
        let n = self
            .stream
            .read(&mut self.buffer)
            .await
            .map_err(|source| SendError::Protocol { stage, source })?;
        if n == 0 {
            return Err(SendError::Protocol {
                stage,
                source: std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "the relay closed the connection",
                ),
            });
        }
        tracing::trace!(
            stage,
            reply = %String::from_utf8_lossy(&self.buffer[..n]).trim_end(),
            "SMTP reply"
        );
        Ok(())
    }
}

/// SASL PLAIN with an empty authorization identity.
fn sasl_plain(username: &str, password: &str) -> String {
    base64::encode(format!("\0{}\0{}", username, password))
}

// A line starting with '.' would otherwise end the transfer early.
fn dot_stuff(message: &str) -> Cow<'_, str> {
    if !message.starts_with('.') && !message.contains("\r\n.") {
        return Cow::Borrowed(message);
    }
    let stuffed = message
        .split("\r\n")
        .map(|line| {
            if line.starts_with('.') {
                Cow::Owned(format!(".{}", line))
            } else {
                Cow::Borrowed(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\r\n");
    Cow::Owned(stuffed)
}
