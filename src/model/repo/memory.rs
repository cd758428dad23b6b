use std::collections::{BTreeMap, HashMap};

use rocket::tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::model::db::{
    Candidate, CandidateId, NewCandidate, NewSponsor, NewUser, NewVote, Sponsor, SponsorId, User,
    UserId, Vote, VoteId,
};

use super::{CandidateRepo, SponsorRepo, UserRepo, VoteRepo};

/// In-process repositories with the same uniqueness guarantees as the
/// MongoDB indexes. Every check-and-insert happens under one lock, so two
/// racing inserts for the same key cannot both succeed.
#[derive(Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    candidates: BTreeMap<CandidateId, Candidate>,
    sponsors: BTreeMap<SponsorId, Sponsor>,
    votes: BTreeMap<VoteId, Vote>,
}

/// Rows are never deleted, so the next ID follows the largest one.
fn next_id<V>(table: &BTreeMap<u32, V>) -> u32 {
    table.keys().next_back().map_or(1, |id| id + 1)
}

#[rocket::async_trait]
impl UserRepo for MemoryDb {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(Error::Duplicate("email"));
        }
        let user = User {
            id: next_id(&tables.users),
            user,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.tables.lock().await.users.len() as u64)
    }
}

#[rocket::async_trait]
impl CandidateRepo for MemoryDb {
    async fn all(&self) -> Result<Vec<Candidate>> {
        Ok(self.tables.lock().await.candidates.values().cloned().collect())
    }

    async fn find_by_id(&self, id: CandidateId) -> Result<Option<Candidate>> {
        Ok(self.tables.lock().await.candidates.get(&id).cloned())
    }

    async fn insert(&self, candidate: NewCandidate) -> Result<Candidate> {
        let mut tables = self.tables.lock().await;
        let candidate = Candidate {
            id: next_id(&tables.candidates),
            candidate,
        };
        tables.candidates.insert(candidate.id, candidate.clone());
        Ok(candidate)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.tables.lock().await.candidates.len() as u64)
    }
}

#[rocket::async_trait]
impl SponsorRepo for MemoryDb {
    async fn all(&self) -> Result<Vec<Sponsor>> {
        Ok(self.tables.lock().await.sponsors.values().cloned().collect())
    }

    async fn insert(&self, sponsor: NewSponsor) -> Result<Sponsor> {
        let mut tables = self.tables.lock().await;
        let sponsor = Sponsor {
            id: next_id(&tables.sponsors),
            sponsor,
        };
        tables.sponsors.insert(sponsor.id, sponsor.clone());
        Ok(sponsor)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.tables.lock().await.sponsors.len() as u64)
    }
}

#[rocket::async_trait]
impl VoteRepo for MemoryDb {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Vote>> {
        let tables = self.tables.lock().await;
        Ok(tables.votes.values().find(|v| v.user_id == user_id).cloned())
    }

    async fn insert(&self, vote: NewVote) -> Result<Vote> {
        let mut tables = self.tables.lock().await;
        if tables.votes.values().any(|v| v.user_id == vote.user_id) {
            return Err(Error::Duplicate("user_id"));
        }
        let vote = Vote {
            id: next_id(&tables.votes),
            vote,
        };
        tables.votes.insert(vote.id, vote.clone());
        Ok(vote)
    }

    async fn count_by_candidate(&self) -> Result<HashMap<CandidateId, u64>> {
        let tables = self.tables.lock().await;
        let mut counts = HashMap::new();
        for vote in tables.votes.values() {
            *counts.entry(vote.candidate_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.tables.lock().await.votes.len() as u64)
    }
}
