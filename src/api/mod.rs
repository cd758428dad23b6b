use rocket::{http::Status, serde::json::Json, Catcher, Request, Route};

use crate::model::api::reply::ApiReply;

mod auth;
mod public;
mod voting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(public::routes());
    routes.extend(auth::routes());
    routes.extend(voting::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![not_found, unprocessable, default_catcher]
}

#[catch(404)]
fn not_found(req: &Request) -> Json<ApiReply> {
    Json(ApiReply::failure(format!("Nothing at {}", req.uri())))
}

/// Rocket rejects undecodable forms with 422; report them as bad requests.
#[catch(422)]
fn unprocessable() -> (Status, Json<ApiReply>) {
    (
        Status::BadRequest,
        Json(ApiReply::failure("Malformed request.")),
    )
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request) -> (Status, Json<ApiReply>) {
    let reason = status.reason().unwrap_or("Unknown error");
    (status, Json(ApiReply::failure(format!("{reason}."))))
}

#[cfg(test)]
mod tests {
    use rocket::{http::Status, local::asynchronous::Client};

    use super::*;

    #[backend_test]
    async fn unknown_paths_get_json_errors(client: Client) {
        let response = client.get("/nowhere").dispatch().await;
        assert_eq!(Status::NotFound, response.status());
        let reply = response.into_json::<ApiReply>().await.unwrap();
        assert!(!reply.ok);
        assert_eq!(Some("Nothing at /nowhere".to_string()), reply.message);
    }
}
