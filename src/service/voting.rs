use log::{info, warn};

use crate::error::{Error, Result};
use crate::model::{
    db::{CandidateId, NewVote, User, Vote},
    Store,
};

/// Where the client goes after a successful vote.
pub const THANK_YOU_PATH: &str = "/thank-you";

/// Record `user`'s vote for the candidate with the given ID.
///
/// Checks, in order: the ID is present and positive ([`Error::Validation`]),
/// the user has not voted yet ([`Error::AlreadyVoted`]), and the candidate
/// exists ([`Error::NotFound`]). Only then is the vote inserted. The store's
/// uniqueness constraint on the voter decides any race between concurrent
/// casts by the same user; the losers get [`Error::AlreadyVoted`].
pub async fn cast_vote(store: &Store, user: &User, candidate_id: Option<u64>) -> Result<Vote> {
    let candidate_id = candidate_id
        .filter(|id| *id != 0)
        .ok_or_else(|| Error::validation("Candidate ID is required."))?;

    if store.votes.find_by_user(user.id).await?.is_some() {
        warn!("User {} tried to vote again", user.id);
        return Err(Error::AlreadyVoted);
    }

    let candidate = match CandidateId::try_from(candidate_id) {
        Ok(id) => store.candidates.find_by_id(id).await?,
        Err(_) => None,
    }
    .ok_or_else(|| Error::not_found(format!("Candidate with ID '{candidate_id}'")))?;

    let vote = store
        .votes
        .insert(NewVote::new(user.id, candidate.id))
        .await
        .map_err(|e| {
            if e.is_duplicate_key() {
                warn!("User {} lost a race to vote twice", user.id);
                Error::AlreadyVoted
            } else {
                e
            }
        })?;
    info!("User {} voted for candidate {}", user.id, candidate.id);
    Ok(vote)
}

/// Has this user already voted?
pub async fn has_voted(store: &Store, user: &User) -> Result<bool> {
    Ok(store.votes.find_by_user(user.id).await?.is_some())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use rocket::futures::future::join_all;

    use super::*;

    use crate::model::db::{CandidateCore, CandidateId, UserCore, UserId};
    use crate::model::repo::{MemoryDb, VoteRepo};

    /// Votes whose existence check always comes back empty, as if every
    /// caller had passed it before any insert landed.
    struct UncheckedVotes(Arc<MemoryDb>);

    #[rocket::async_trait]
    impl VoteRepo for UncheckedVotes {
        async fn find_by_user(&self, _user_id: UserId) -> Result<Option<Vote>> {
            Ok(None)
        }

        async fn insert(&self, vote: NewVote) -> Result<Vote> {
            VoteRepo::insert(&*self.0, vote).await
        }

        async fn count_by_candidate(&self) -> Result<HashMap<CandidateId, u64>> {
            self.0.count_by_candidate().await
        }

        async fn count(&self) -> Result<u64> {
            VoteRepo::count(&*self.0).await
        }
    }

    async fn store_with_candidates() -> Store {
        let store = Store::memory();
        for candidate in CandidateCore::examples() {
            store.candidates.insert(candidate).await.unwrap();
        }
        store
    }

    #[rocket::async_test]
    async fn vote_is_recorded() {
        let store = store_with_candidates().await;
        let user = store.users.insert(UserCore::example()).await.unwrap();

        assert!(!has_voted(&store, &user).await.unwrap());
        let vote = cast_vote(&store, &user, Some(2)).await.unwrap();
        assert_eq!(user.id, vote.user_id);
        assert_eq!(2, vote.candidate_id);
        assert!(has_voted(&store, &user).await.unwrap());
    }

    #[rocket::async_test]
    async fn missing_candidate_id_is_invalid() {
        let store = store_with_candidates().await;
        let user = store.users.insert(UserCore::example()).await.unwrap();

        for id in [None, Some(0)] {
            let err = cast_vote(&store, &user, id).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert_eq!(0, store.votes.count().await.unwrap());
    }

    #[rocket::async_test]
    async fn unknown_candidate_is_not_found() {
        let store = store_with_candidates().await;
        let user = store.users.insert(UserCore::example()).await.unwrap();

        for id in [4, u64::from(u32::MAX) + 1] {
            let err = cast_vote(&store, &user, Some(id)).await.unwrap_err();
            assert!(matches!(err, Error::NotFound(_)));
        }
        assert_eq!(0, store.votes.count().await.unwrap());
    }

    #[rocket::async_test]
    async fn second_vote_is_rejected() {
        let store = store_with_candidates().await;
        let user = store.users.insert(UserCore::example()).await.unwrap();

        cast_vote(&store, &user, Some(1)).await.unwrap();
        let err = cast_vote(&store, &user, Some(2)).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyVoted));

        // Already voting takes precedence over an unknown candidate.
        let err = cast_vote(&store, &user, Some(42)).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyVoted));

        let vote = store.votes.find_by_user(user.id).await.unwrap().unwrap();
        assert_eq!(1, vote.candidate_id);
        assert_eq!(1, store.votes.count().await.unwrap());
    }

    #[rocket::async_test]
    async fn concurrent_votes_store_exactly_one() {
        // Losing a race is only visible in the logs, so enable them.
        log4rs_test_utils::test_logging::init_logging_once_for(["campus_vote"], None, None);

        let store = store_with_candidates().await;
        let user = store.users.insert(UserCore::example()).await.unwrap();

        let handles = (1..=12u64).map(|i| {
            let store = store.clone();
            let user = user.clone();
            rocket::tokio::spawn(async move { cast_vote(&store, &user, Some(i % 3 + 1)).await })
        });
        let results = join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect::<Vec<_>>();

        assert_eq!(1, results.iter().filter(|r| r.is_ok()).count());
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, Error::AlreadyVoted)));
        assert_eq!(1, store.votes.count().await.unwrap());
    }

    #[rocket::async_test]
    async fn unique_constraint_decides_a_lost_race() {
        let db = Arc::new(MemoryDb::default());
        let store = Store {
            users: db.clone(),
            candidates: db.clone(),
            sponsors: db.clone(),
            votes: Arc::new(UncheckedVotes(db.clone())),
        };
        for candidate in CandidateCore::examples() {
            store.candidates.insert(candidate).await.unwrap();
        }
        let user = store.users.insert(UserCore::example()).await.unwrap();

        cast_vote(&store, &user, Some(1)).await.unwrap();
        let err = cast_vote(&store, &user, Some(2)).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyVoted));

        assert_eq!(1, store.votes.count().await.unwrap());
        let vote = VoteRepo::find_by_user(&*db, user.id).await.unwrap().unwrap();
        assert_eq!(1, vote.candidate_id);
    }
}
