//! Repository interfaces, one per entity, and the [`Store`] bundling them.
//!
//! Services only ever talk to these traits, so the same logic runs against
//! MongoDB in production and against the in-memory store in tests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::model::db::{
    Candidate, CandidateId, NewCandidate, NewSponsor, NewUser, NewVote, Sponsor, User, UserId,
    Vote,
};

mod memory;
mod mongo;

pub use memory::MemoryDb;
pub use mongo::MongoDb;

#[rocket::async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Look up a user by their already-normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a user, assigning the next ID.
    ///
    /// Fails with a duplicate-key error if the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User>;

    async fn count(&self) -> Result<u64>;
}

#[rocket::async_trait]
pub trait CandidateRepo: Send + Sync {
    /// All candidates in ID order.
    async fn all(&self) -> Result<Vec<Candidate>>;

    async fn find_by_id(&self, id: CandidateId) -> Result<Option<Candidate>>;

    async fn insert(&self, candidate: NewCandidate) -> Result<Candidate>;

    async fn count(&self) -> Result<u64>;
}

#[rocket::async_trait]
pub trait SponsorRepo: Send + Sync {
    /// All sponsors in ID order.
    async fn all(&self) -> Result<Vec<Sponsor>>;

    async fn insert(&self, sponsor: NewSponsor) -> Result<Sponsor>;

    async fn count(&self) -> Result<u64>;
}

#[rocket::async_trait]
pub trait VoteRepo: Send + Sync {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Vote>>;

    /// Insert a vote, assigning the next ID.
    ///
    /// Fails with a duplicate-key error if the user already has a vote,
    /// including when a concurrent insert for the same user won.
    async fn insert(&self, vote: NewVote) -> Result<Vote>;

    /// Number of votes per candidate. Candidates without votes are absent.
    async fn count_by_candidate(&self) -> Result<HashMap<CandidateId, u64>>;

    async fn count(&self) -> Result<u64>;
}

/// Handles on every repository. This is managed state, and is passed
/// explicitly into each service call.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepo>,
    pub candidates: Arc<dyn CandidateRepo>,
    pub sponsors: Arc<dyn SponsorRepo>,
    pub votes: Arc<dyn VoteRepo>,
}

impl Store {
    /// Build a store where one backend serves every repository.
    pub fn new<R>(backend: R) -> Self
    where
        R: UserRepo + CandidateRepo + SponsorRepo + VoteRepo + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            users: backend.clone(),
            candidates: backend.clone(),
            sponsors: backend.clone(),
            votes: backend,
        }
    }

    /// A fresh, empty, in-memory store.
    pub fn memory() -> Self {
        Self::new(MemoryDb::default())
    }

    /// A store backed by the given MongoDB database.
    pub fn mongodb(db: &mongodb::Database) -> Self {
        Self::new(MongoDb::new(db))
    }
}
