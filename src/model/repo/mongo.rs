use std::collections::HashMap;

use mongodb::{
    bson::{doc, from_document},
    options::FindOptions,
    Database,
};
use rocket::futures::TryStreamExt;
use serde::Deserialize;

use crate::error::Result;
use crate::model::{
    db::{
        Candidate, CandidateId, NewCandidate, NewSponsor, NewUser, NewVote, Sponsor, User, UserId,
        Vote,
    },
    mongodb::{Coll, Counter, MongoCollection},
};

use super::{CandidateRepo, SponsorRepo, UserRepo, VoteRepo};

/// MongoDB-backed repositories. Uniqueness is enforced by the indexes
/// created in [`crate::model::mongodb::ensure_indexes_exist`].
pub struct MongoDb {
    users: Coll<User>,
    candidates: Coll<Candidate>,
    sponsors: Coll<Sponsor>,
    votes: Coll<Vote>,
    counters: Coll<Counter>,
}

impl MongoDb {
    pub fn new(db: &Database) -> Self {
        Self {
            users: Coll::from_db(db),
            candidates: Coll::from_db(db),
            sponsors: Coll::from_db(db),
            votes: Coll::from_db(db),
            counters: Coll::from_db(db),
        }
    }

    /// Allocate the next ID for the collection holding `T`.
    async fn next_id<T: MongoCollection>(&self) -> Result<u32> {
        Counter::next(&self.counters, T::NAME).await
    }
}

fn by_id() -> FindOptions {
    FindOptions::builder().sort(doc! { "_id": 1 }).build()
}

#[rocket::async_trait]
impl UserRepo for MongoDb {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }, None).await?)
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let user = User {
            id: self.next_id::<User>().await?,
            user,
        };
        self.users.insert_one(&user, None).await?;
        Ok(user)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.users.count_documents(None, None).await?)
    }
}

#[rocket::async_trait]
impl CandidateRepo for MongoDb {
    async fn all(&self) -> Result<Vec<Candidate>> {
        let candidates = self.candidates.find(None, by_id()).await?.try_collect().await?;
        Ok(candidates)
    }

    async fn find_by_id(&self, id: CandidateId) -> Result<Option<Candidate>> {
        Ok(self.candidates.find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert(&self, candidate: NewCandidate) -> Result<Candidate> {
        let candidate = Candidate {
            id: self.next_id::<Candidate>().await?,
            candidate,
        };
        self.candidates.insert_one(&candidate, None).await?;
        Ok(candidate)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.candidates.count_documents(None, None).await?)
    }
}

#[rocket::async_trait]
impl SponsorRepo for MongoDb {
    async fn all(&self) -> Result<Vec<Sponsor>> {
        let sponsors = self.sponsors.find(None, by_id()).await?.try_collect().await?;
        Ok(sponsors)
    }

    async fn insert(&self, sponsor: NewSponsor) -> Result<Sponsor> {
        let sponsor = Sponsor {
            id: self.next_id::<Sponsor>().await?,
            sponsor,
        };
        self.sponsors.insert_one(&sponsor, None).await?;
        Ok(sponsor)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.sponsors.count_documents(None, None).await?)
    }
}

/// One row of the tally aggregation.
#[derive(Deserialize)]
struct CandidateCount {
    #[serde(rename = "_id")]
    candidate_id: CandidateId,
    count: u64,
}

#[rocket::async_trait]
impl VoteRepo for MongoDb {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Vote>> {
        Ok(self.votes.find_one(doc! { "user_id": user_id }, None).await?)
    }

    async fn insert(&self, vote: NewVote) -> Result<Vote> {
        let vote = Vote {
            id: self.next_id::<Vote>().await?,
            vote,
        };
        self.votes.insert_one(&vote, None).await?;
        Ok(vote)
    }

    async fn count_by_candidate(&self) -> Result<HashMap<CandidateId, u64>> {
        let pipeline = [doc! {
            "$group": {
                "_id": "$candidate_id",
                "count": { "$sum": 1 },
            }
        }];
        let mut cursor = self.votes.aggregate(pipeline, None).await?;
        let mut counts = HashMap::new();
        while let Some(row) = cursor.try_next().await? {
            let row: CandidateCount = from_document(row)?;
            counts.insert(row.candidate_id, row.count);
        }
        Ok(counts)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.votes.count_documents(None, None).await?)
    }
}
