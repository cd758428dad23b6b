use serde::{Deserialize, Serialize};

use crate::model::db::{Candidate, CandidateId};

/// API-friendly representation of one candidate's standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTally {
    pub id: CandidateId,
    pub name: String,
    pub major: String,
    pub photo_url: String,
    pub votes: u64,
}

impl CandidateTally {
    pub fn new(candidate: Candidate, votes: u64) -> Self {
        Self {
            id: candidate.id,
            name: candidate.candidate.name,
            major: candidate.candidate.major,
            photo_url: candidate.candidate.photo_url,
            votes,
        }
    }
}

/// Election results as displayed: every candidate in ID order, the leader,
/// and the total number of votes cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Results {
    pub candidates: Vec<CandidateTally>,
    pub winner: Option<CandidateTally>,
    pub total_votes: u64,
}
