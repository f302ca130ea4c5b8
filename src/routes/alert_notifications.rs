use crate::domain::Recipient;
use crate::email::{BatchMailer, BatchResult, SendResult};
use crate::guards::AdminToken;
use crate::routes::{error_chain_fmt, ErrorBody};
use crate::startup::ApplicationBaseUrl;
use chrono::{Datelike, Utc};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State};

#[derive(serde::Deserialize)]
pub struct RecipientData {
    email: String,
    name: String,
}

#[derive(serde::Deserialize)]
pub struct AlertNotificationData {
    recipients: Option<Vec<RecipientData>>,
    subject: Option<String>,
    message: Option<String>,
    sale_code: Option<String>,
    alert_type: Option<String>,
}

#[derive(serde::Serialize, Debug)]
pub struct NotificationSummary {
    success: bool,
    sent: usize,
    failed: usize,
    errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertType {
    NewSale,
    StatusChange,
    NoteAdded,
    Other(String),
}

impl AlertType {
    pub fn parse(s: &str) -> AlertType {
        match s {
            "new_sale" => AlertType::NewSale,
            "status_change" => AlertType::StatusChange,
            "note_added" => AlertType::NoteAdded,
            other => AlertType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AlertType::NewSale => "Nova Venda",
            AlertType::StatusChange => "Alteração de Estado",
            AlertType::NoteAdded => "Nova Nota/Resposta",
            AlertType::Other(other) => other,
        }
    }
}

#[tracing::instrument(
    name = "Send alert notifications",
    skip(body, batch_mailer, base_url, _admin),
    fields(sale_code = ?body.sale_code, alert_type = ?body.alert_type)
)]
#[post("/alert-notifications", format = "json", data = "<body>")]
pub async fn send_alert_notifications(
    body: Json<AlertNotificationData>,
    batch_mailer: &State<BatchMailer>,
    base_url: &State<ApplicationBaseUrl>,
    _admin: AdminToken,
) -> Result<Json<NotificationSummary>, NotificationError> {
    let body = body.into_inner();
    let recipient_data = body
        .recipients
        .filter(|recipients| !recipients.is_empty())
        .ok_or_else(|| NotificationError::ValidationError("No recipients provided".into()))?;
    let (subject, message, sale_code) = match (body.subject, body.message, body.sale_code) {
        (Some(subject), Some(message), Some(sale_code))
            if !subject.trim().is_empty()
                && !message.trim().is_empty()
                && !sale_code.trim().is_empty() =>
        {
            (subject, message, sale_code)
        }
        _ => {
            return Err(NotificationError::ValidationError(
                "Missing required fields: subject, message, sale_code".into(),
            ))
        }
    };
    let alert = Alert {
        message: &message,
        sale_code: &sale_code,
        alert_type: AlertType::parse(body.alert_type.as_deref().unwrap_or("new_sale")),
        base_url: &base_url.0,
    };

    // One outcome per entry, in the order the caller listed them.
    let mut outcome = BatchResult::default();
    for data in recipient_data {
        let result = match Recipient::parse(data.email.clone(), data.name) {
            Ok(recipient) => {
                let html = render_alert_html(recipient.name.as_ref(), &alert);
                batch_mailer.send_one(&recipient.email, &subject, &html).await
            }
            Err(error) => {
                tracing::warn!(
                    recipient = %data.email,
                    error = %error,
                    "Skipping a recipient with invalid contact details"
                );
                SendResult::Failed { reason: error }
            }
        };
        outcome.record(&data.email, result);
    }

    Ok(Json(NotificationSummary {
        success: true,
        sent: outcome.sent_count,
        failed: outcome.failed_count,
        errors: outcome.errors,
    }))
}

/// What every recipient of one notification is told.
pub struct Alert<'a> {
    pub message: &'a str,
    pub sale_code: &'a str,
    pub alert_type: AlertType,
    pub base_url: &'a str,
}

/// Renders the notification for one recipient. Caller-supplied text, the
/// recipient's name included, is escaped before it is embedded.
pub fn render_alert_html(recipient_name: &str, alert: &Alert<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: linear-gradient(135deg, #1e3a8a 0%, #3b82f6 100%); color: white; padding: 30px; text-align: center; border-radius: 8px 8px 0 0; }}
    .content {{ background: #f9fafb; padding: 30px; border: 1px solid #e5e7eb; }}
    .alert-badge {{ display: inline-block; padding: 8px 16px; background: #3b82f6; color: white; border-radius: 20px; font-size: 14px; margin-bottom: 20px; }}
    .sale-code {{ font-size: 24px; font-weight: bold; color: #1e3a8a; margin: 20px 0; }}
    .message-box {{ background: white; padding: 20px; border-left: 4px solid #3b82f6; margin: 20px 0; border-radius: 4px; }}
    .footer {{ background: #1f2937; color: #9ca3af; padding: 20px; text-align: center; font-size: 12px; border-radius: 0 0 8px 8px; }}
    .button {{ display: inline-block; padding: 12px 24px; background: #3b82f6; color: white; text-decoration: none; border-radius: 6px; margin: 20px 0; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>MP Grupo CRM</h1>
      <p style="margin: 0; opacity: 0.9;">Sistema de Alertas</p>
    </div>
    <div class="content">
      <p>Olá <strong>{name}</strong>,</p>
      <div class="alert-badge">{label}</div>
      <div class="sale-code">Venda: {sale_code}</div>
      <div class="message-box">
        <p style="margin: 0;"><strong>Detalhes:</strong></p>
        <p style="margin: 10px 0 0 0;">{message}</p>
      </div>
      <p><a href="{base_url}/sales" class="button">Ver Detalhes da Venda</a></p>
      <p style="color: #6b7280; font-size: 14px; margin-top: 30px;">
        Esta é uma notificação automática do sistema CRM. Por favor, não responda a este email.
      </p>
    </div>
    <div class="footer">
      <p style="margin: 0;">© {year} MP Grupo. Todos os direitos reservados.</p>
      <p style="margin: 10px 0 0 0;">Sistema de Gestão CRM</p>
    </div>
  </div>
</body>
</html>"#,
        name = escape_html(recipient_name),
        label = escape_html(alert.alert_type.label()),
        sale_code = escape_html(alert.sale_code),
        message = escape_html(alert.message),
        base_url = escape_html(alert.base_url.trim_end_matches('/')),
        year = Utc::now().year(),
    )
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[derive(thiserror::Error)]
pub enum NotificationError {
    #[error("{0}")]
    ValidationError(String),
}

impl std::fmt::Debug for NotificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for NotificationError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("NotificationError: {:?}", self);
        let status = match &self {
            NotificationError::ValidationError(_) => Status::BadRequest,
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).respond_to(request)
    }
}
