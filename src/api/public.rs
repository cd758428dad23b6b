use rocket::{response::content::RawHtml, serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{api::results::Results, db::User, Store};
use crate::pages;
use crate::service::{results, voting::has_voted};

pub fn routes() -> Vec<Route> {
    routes![index, results_page, results_json]
}

#[get("/")]
pub async fn index(user: Option<User>, store: &State<Store>) -> Result<RawHtml<String>> {
    let candidates = store.candidates.all().await?;
    let sponsors = store.sponsors.all().await?;
    let voted = match &user {
        Some(user) => has_voted(store, user).await?,
        None => false,
    };
    Ok(pages::index(&candidates, &sponsors, user.as_ref(), voted))
}

#[get("/results")]
async fn results_page(user: Option<User>, store: &State<Store>) -> Result<RawHtml<String>> {
    let results = results::results(store).await?;
    Ok(pages::results(&results, user.as_ref()))
}

#[get("/api/results")]
async fn results_json(store: &State<Store>) -> Result<Json<Results>> {
    Ok(Json(results::results(store).await?))
}

#[cfg(test)]
mod tests {
    use rocket::{http::Status, local::asynchronous::Client};

    use super::*;

    #[backend_test]
    async fn index_lists_candidates_and_sponsors(client: Client, store: Store) {
        store
            .sponsors
            .insert(crate::model::db::SponsorCore::new("TechCorp", "/s1.png"))
            .await
            .unwrap();

        let response = client.get(uri!(index)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let body = response.into_string().await.unwrap();
        for name in ["A", "B", "C"] {
            assert!(body.contains(&format!("<h2>{name}</h2>")));
        }
        assert!(body.contains("TechCorp"));
        // Anonymous visitors are asked to log in rather than offered buttons.
        assert!(!body.contains("data-candidate"));
    }

    #[backend_test(user)]
    async fn index_offers_vote_buttons_until_voted(client: Client, store: Store) {
        let body = client.get(uri!(index)).dispatch().await.into_string().await.unwrap();
        assert!(body.contains(r#"data-candidate="2""#));

        let user = store.users.find_by_id(1).await.unwrap().unwrap();
        crate::service::voting::cast_vote(&store, &user, Some(2))
            .await
            .unwrap();

        let body = client.get(uri!(index)).dispatch().await.into_string().await.unwrap();
        assert!(!body.contains("data-candidate"));
        assert!(body.contains("Your vote has been recorded"));
    }

    #[backend_test]
    async fn results_count_every_candidate(client: Client, store: Store) {
        for (user_id, candidate_id) in [(1, 2), (2, 2), (3, 3)] {
            store
                .votes
                .insert(crate::model::db::NewVote::new(user_id, candidate_id))
                .await
                .unwrap();
        }

        let response = client.get(uri!(results_json)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let results = response.into_json::<Results>().await.unwrap();
        assert_eq!(
            vec![0, 2, 1],
            results.candidates.iter().map(|c| c.votes).collect::<Vec<_>>()
        );
        assert_eq!(3, results.total_votes);
        assert_eq!(Some("B".to_string()), results.winner.map(|w| w.name));

        let body = client
            .get(uri!(results_page))
            .dispatch()
            .await
            .into_string()
            .await
            .unwrap();
        assert!(body.contains("Leading: <strong>B</strong> with 2 of 3 votes"));
    }

    #[backend_test]
    async fn results_without_votes(client: Client) {
        let body = client
            .get(uri!(results_page))
            .dispatch()
            .await
            .into_string()
            .await
            .unwrap();
        assert!(body.contains("No votes have been cast yet."));
    }
}
