use std::ops::Deref;

use serde::{Deserialize, Serialize};

pub type CandidateId = u32;

/// Core candidate data. Candidates are seeded once and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCore {
    pub name: String,
    /// Study programme or other affiliation shown next to the name.
    pub major: String,
    pub photo_url: String,
}

impl CandidateCore {
    pub fn new(name: impl Into<String>, major: impl Into<String>, photo_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            major: major.into(),
            photo_url: photo_url.into(),
        }
    }
}

/// A candidate without an ID.
pub type NewCandidate = CandidateCore;

/// A candidate from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: CandidateId,
    #[serde(flatten)]
    pub candidate: CandidateCore,
}

impl Deref for Candidate {
    type Target = CandidateCore;

    fn deref(&self) -> &Self::Target {
        &self.candidate
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl CandidateCore {
        /// Three candidates, `A`, `B` and `C`, in that order.
        pub fn examples() -> Vec<Self> {
            ["A", "B", "C"]
                .into_iter()
                .map(|name| Self::new(name, "Informatics", format!("/static/img/{name}.jpg")))
                .collect()
        }
    }
}
