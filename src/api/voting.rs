use rocket::{
    response::{content::RawHtml, Redirect},
    serde::json::Json,
    Route, State,
};

use crate::{
    error::{Error, Result},
    model::{
        api::{forms::VoteRequest, reply::ApiReply},
        db::User,
        Store,
    },
    pages,
    service::voting::{cast_vote, THANK_YOU_PATH},
};

pub fn routes() -> Vec<Route> {
    routes![vote, vote_anonymous, thank_you, thank_you_anonymous]
}

#[post("/api/vote", data = "<request>")]
async fn vote(
    user: User,
    request: Option<Json<VoteRequest>>,
    store: &State<Store>,
) -> Result<Json<ApiReply>> {
    let candidate_id = request.and_then(|request| request.candidate_id());
    cast_vote(store, &user, candidate_id).await?;
    Ok(Json(ApiReply::redirect(THANK_YOU_PATH)))
}

#[post("/api/vote", rank = 2)]
fn vote_anonymous() -> Error {
    Error::Unauthorized
}

#[get("/thank-you")]
fn thank_you(user: User) -> RawHtml<String> {
    pages::thank_you(&user)
}

#[get("/thank-you", rank = 2)]
fn thank_you_anonymous() -> Redirect {
    Redirect::to(uri!(super::auth::login_page))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::{json, Value},
    };

    use super::*;

    async fn post_vote(client: &Client, body: Value) -> (Status, ApiReply) {
        let response = client
            .post(uri!(vote))
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;
        let status = response.status();
        (status, response.into_json().await.unwrap())
    }

    #[backend_test(user)]
    async fn vote_then_thank_you(client: Client, store: Store) {
        let (status, reply) = post_vote(&client, json!({"candidate_id": 2})).await;
        assert_eq!(Status::Ok, status);
        assert_eq!(ApiReply::redirect("/thank-you"), reply);

        let vote = store.votes.find_by_user(1).await.unwrap().unwrap();
        assert_eq!(2, vote.candidate_id);

        let response = client.get(uri!(thank_you)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert!(response.into_string().await.unwrap().contains("Thank you"));
    }

    #[backend_test(user)]
    async fn second_vote_conflicts(client: Client, store: Store) {
        assert_eq!(Status::Ok, post_vote(&client, json!({"candidate_id": 1})).await.0);

        let (status, reply) = post_vote(&client, json!({"candidate_id": 2})).await;
        assert_eq!(Status::Conflict, status);
        assert!(!reply.ok);
        assert_eq!(Some("You have already voted.".to_string()), reply.message);
        assert_eq!(1, store.votes.count().await.unwrap());
    }

    #[backend_test(user)]
    async fn invalid_candidate_ids(client: Client, store: Store) {
        for body in [json!({}), json!({"candidate_id": null}), json!({"candidate_id": "x"})] {
            let (status, reply) = post_vote(&client, body).await;
            assert_eq!(Status::BadRequest, status);
            assert!(!reply.ok);
        }

        let (status, _) = post_vote(&client, json!({"candidate_id": 99})).await;
        assert_eq!(Status::NotFound, status);
        assert_eq!(0, store.votes.count().await.unwrap());
    }

    #[backend_test(user)]
    async fn unparseable_body_is_invalid(client: Client) {
        let response = client
            .post(uri!(vote))
            .header(ContentType::JSON)
            .body("not json")
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());
    }

    #[backend_test]
    async fn vote_requires_session(client: Client, store: Store) {
        let (status, reply) = post_vote(&client, json!({"candidate_id": 1})).await;
        assert_eq!(Status::Unauthorized, status);
        assert!(!reply.ok);
        assert_eq!(0, store.votes.count().await.unwrap());
    }

    #[backend_test]
    async fn thank_you_requires_session(client: Client) {
        let response = client.get(uri!(thank_you)).dispatch().await;
        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/login"), response.headers().get_one("Location"));
    }
}
