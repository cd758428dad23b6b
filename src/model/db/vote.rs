use std::ops::Deref;

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use super::{candidate::CandidateId, user::UserId};

pub type VoteId = u32;

/// Core vote data, as stored in the database.
///
/// At most one vote exists per user; the store enforces this with a
/// uniqueness constraint on `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCore {
    /// Foreign Key user ID.
    pub user_id: UserId,
    /// Foreign Key candidate ID.
    pub candidate_id: CandidateId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl VoteCore {
    /// A vote cast now.
    pub fn new(user_id: UserId, candidate_id: CandidateId) -> Self {
        Self {
            user_id,
            candidate_id,
            created_at: Utc::now(),
        }
    }
}

/// A vote without an ID.
pub type NewVote = VoteCore;

/// A vote from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: VoteId,
    #[serde(flatten)]
    pub vote: VoteCore,
}

impl Deref for Vote {
    type Target = VoteCore;

    fn deref(&self) -> &Self::Target {
        &self.vote
    }
}
