use crate::guards::OrStatus;
use anyhow::anyhow;
use rocket::http::Status;
use rocket::outcome::Outcome::{Error, Success};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use secrecy::{ExposeSecret, Secret};

/// The token privileged callers present as `Authorization: Bearer <token>`.
pub struct AdminSecret(pub Secret<String>);

/// Proof that the request carried the admin token.
pub struct AdminToken {
    // prevents construction outside of this module
    _private: (),
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match from_request_result(request) {
            Ok(token) => Success(token),
            Err((status, e)) => {
                tracing::warn!(error.cause_chain = ?e, "Rejected an admin request");
                Error((status, e))
            }
        }
    }
}

fn from_request_result(request: &Request) -> Result<AdminToken, (Status, anyhow::Error)> {
    let expected = request
        .rocket()
        .state::<AdminSecret>()
        .or_status(Status::InternalServerError, "No admin token is configured.")?;

    let header_value = request
        .headers()
        .get_one("Authorization")
        .or_status(Status::Unauthorized, "The 'Authorization' header was missing.")?;

    let presented = header_value
        .strip_prefix("Bearer ")
        .or_status(Status::Unauthorized, "The authorization scheme was not 'Bearer'.")?;

    if !constant_time_eq(presented.as_bytes(), expected.0.expose_secret().as_bytes()) {
        return Err((Status::Unauthorized, anyhow!("Invalid admin token.")));
    }
    Ok(AdminToken { _private: () })
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
