use crate::domain::RecipientEmail;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

const CRLF: &str = "\r\n";
// 45 bytes of UTF-8 encode to 60 base64 characters, keeping every encoded-word
// within the 75 character limit of RFC 2047.
const ENCODED_WORD_MAX_BYTES: usize = 45;

/// A single email on its way to one recipient.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    recipient: RecipientEmail,
    subject: String,
    html_body: String,
}

impl OutboundMessage {
    pub fn new(recipient: RecipientEmail, subject: &str, html_body: &str) -> Self {
        Self {
            recipient,
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        }
    }

    pub fn recipient(&self) -> &RecipientEmail {
        &self.recipient
    }

    /// Renders the message as a `multipart/alternative` MIME document with a
    /// single HTML part. Boundary and `Message-ID` are fresh on every call.
    pub fn frame(&self, from_name: &str, from_address: &str) -> FramedMessage {
        let tokens = FrameTokens {
            boundary: boundary_token(),
            message_id: message_id(from_address),
            date: Utc::now().to_rfc2822(),
        };
        FramedMessage {
            content: self.frame_with(from_name, from_address, &tokens),
            message_id: tokens.message_id,
        }
    }

    fn frame_with(&self, from_name: &str, from_address: &str, tokens: &FrameTokens) -> String {
        let html = normalize_line_endings(&self.html_body);
        [
            format!(
                "From: {} <{}>",
                encode_header_value(&single_line(from_name)),
                from_address
            ),
            format!("To: {}", self.recipient.as_ref()),
            format!("Subject: {}", encode_header_value(&single_line(&self.subject))),
            format!("Message-ID: {}", tokens.message_id),
            format!("Date: {}", tokens.date),
            "MIME-Version: 1.0".to_string(),
            format!(
                "Content-Type: multipart/alternative; boundary=\"{}\"",
                tokens.boundary
            ),
            String::new(),
            format!("--{}", tokens.boundary),
            "Content-Type: text/html; charset=UTF-8".to_string(),
            "Content-Transfer-Encoding: quoted-printable".to_string(),
            String::new(),
            html,
            String::new(),
            format!("--{}--", tokens.boundary),
        ]
        .join(CRLF)
    }
}

/// A message ready for `DATA`, with the `Message-ID` it was framed with.
#[derive(Debug, Clone)]
pub struct FramedMessage {
    pub message_id: String,
    pub content: String,
}

struct FrameTokens {
    boundary: String,
    message_id: String,
    date: String,
}

fn boundary_token() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .take(24)
        .collect();
    format!("----=_Part_{}", suffix)
}

fn message_id(from_address: &str) -> String {
    let domain = from_address
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
        .unwrap_or("localhost");
    format!("<{}@{}>", Uuid::new_v4(), domain)
}

/// Any of `\r\n`, `\r` or `\n` becomes `\r\n`.
fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', CRLF)
}

// Header values must not smuggle in extra header lines.
fn single_line(s: &str) -> String {
    s.replace(&['\r', '\n'][..], " ")
}

/// RFC 2047 `B` encoding for header values that are not plain ASCII. Long
/// values are split on character boundaries into several encoded-words, one
/// per folded line.
fn encode_header_value(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }
    let mut words = Vec::new();
    let mut start = 0;
    let mut end = 0;
    for (index, c) in value.char_indices() {
        let next = index + c.len_utf8();
        if next - start > ENCODED_WORD_MAX_BYTES {
            words.push(encoded_word(&value[start..end]));
            start = end;
        }
        end = next;
    }
    words.push(encoded_word(&value[start..end]));
    // Continuation lines start with whitespace, so the header stays one field.
    words.join("\r\n ")
}

fn encoded_word(chunk: &str) -> String {
    format!("=?UTF-8?B?{}?=", base64::encode(chunk))
}
