use crate::domain::RecipientEmail;
use crate::email::{Email, SendError};
use crate::guards::AdminToken;
use crate::routes::{error_chain_fmt, ErrorBody};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State};
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct AlertEmailData {
    to: Option<String>,
    subject: Option<String>,
    html: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEmailSent {
    success: bool,
    message_id: String,
}

struct ValidAlertEmail {
    to: RecipientEmail,
    subject: String,
    html: String,
}

impl TryFrom<AlertEmailData> for ValidAlertEmail {
    type Error = String;

    fn try_from(data: AlertEmailData) -> Result<Self, Self::Error> {
        let missing = || "Missing required fields: to, subject, html".to_string();
        let to = data.to.filter(|s| !s.trim().is_empty()).ok_or_else(missing)?;
        let subject = data
            .subject
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(missing)?;
        let html = data.html.filter(|s| !s.trim().is_empty()).ok_or_else(missing)?;
        Ok(ValidAlertEmail {
            to: RecipientEmail::parse(to)?,
            subject,
            html,
        })
    }
}

#[tracing::instrument(
    name = "Send a single alert email",
    skip(body, email_client, _admin),
    fields(recipient = ?body.to)
)]
#[post("/alert-email", format = "json", data = "<body>")]
pub async fn send_alert_email(
    body: Json<AlertEmailData>,
    email_client: &State<Arc<dyn Email>>,
    _admin: AdminToken,
) -> Result<Json<AlertEmailSent>, AlertEmailError> {
    let alert: ValidAlertEmail = body
        .into_inner()
        .try_into()
        .map_err(AlertEmailError::ValidationError)?;
    let message_id = email_client
        .send_email(&alert.to, &alert.subject, &alert.html)
        .await?;
    tracing::info!(message_id = %message_id, "Alert email sent");
    Ok(Json(AlertEmailSent {
        success: true,
        message_id,
    }))
}

#[derive(thiserror::Error)]
pub enum AlertEmailError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    SendError(#[from] SendError),
}

impl std::fmt::Debug for AlertEmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for AlertEmailError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("AlertEmailError: {:?}", self);
        let status = match &self {
            AlertEmailError::ValidationError(_) => Status::BadRequest,
            AlertEmailError::SendError(_) => Status::InternalServerError,
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).respond_to(request)
    }
}
