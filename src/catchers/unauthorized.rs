use rocket::http::Header;
use rocket::response::Responder;

#[catch(401)]
pub fn unauthorized_request_credentials() -> RequestBearerToken {
    RequestBearerToken::new()
}

struct RequestBearerTokenHeader;

impl<'h> From<RequestBearerTokenHeader> for Header<'h> {
    fn from(_: RequestBearerTokenHeader) -> Self {
        Header::new("WWW-Authenticate", r#"Bearer realm="crm-mailer""#)
    }
}

#[derive(Responder)]
#[response(status = 401)]
pub struct RequestBearerToken {
    inner: (),
    bearer: RequestBearerTokenHeader,
}

impl RequestBearerToken {
    fn new() -> RequestBearerToken {
        RequestBearerToken {
            inner: (),
            bearer: RequestBearerTokenHeader,
        }
    }
}
