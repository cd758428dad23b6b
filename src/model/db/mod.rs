//! DB-compatible (e.g. de/serialisable) types.
//!
//! Every entity comes as a `*Core` holding its fields, aliased as `New*` for
//! insertion, and a full type pairing the core with the ID the store assigned.
//! IDs are allocated in insertion order starting from 1.

pub mod candidate;
pub mod sponsor;
pub mod user;
pub mod vote;

pub use candidate::{Candidate, CandidateCore, CandidateId, NewCandidate};
pub use sponsor::{NewSponsor, Sponsor, SponsorCore, SponsorId};
pub use user::{normalize_email, NewUser, User, UserCore, UserId};
pub use vote::{NewVote, Vote, VoteCore, VoteId};
