use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use rocket::Request;

#[derive(serde::Serialize)]
pub struct MalformedBody {
    error: &'static str,
}

/// Bodies that are not valid JSON for the route are reported as 400.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(_req: &Request) -> BadRequest<Json<MalformedBody>> {
    BadRequest(Json(MalformedBody {
        error: "The request body could not be parsed.",
    }))
}
