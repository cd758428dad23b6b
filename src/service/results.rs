use crate::error::Result;
use crate::model::{
    api::results::{CandidateTally, Results},
    db::Candidate,
    Store,
};

/// Every candidate, in ID order, with its number of votes. Candidates
/// without votes are included with a count of zero.
pub async fn tally(store: &Store) -> Result<Vec<(Candidate, u64)>> {
    let candidates = store.candidates.all().await?;
    let counts = store.votes.count_by_candidate().await?;
    Ok(candidates
        .into_iter()
        .map(|candidate| {
            let count = counts.get(&candidate.id).copied().unwrap_or(0);
            (candidate, count)
        })
        .collect())
}

/// The candidate with the most votes, or `None` if there are no candidates.
///
/// Ties go to the candidate that comes first in the tally, i.e. the one with
/// the lowest ID.
pub fn winner(tally: &[(Candidate, u64)]) -> Option<&Candidate> {
    tally
        .iter()
        .fold(None, |best: Option<&(Candidate, u64)>, entry| match best {
            Some(best) if best.1 >= entry.1 => Some(best),
            _ => Some(entry),
        })
        .map(|(candidate, _)| candidate)
}

/// The full results: the tally, its winner, and the total number of votes.
pub async fn results(store: &Store) -> Result<Results> {
    let tally = tally(store).await?;
    let winner = winner(&tally).map(|candidate| candidate.id);
    let total_votes = tally.iter().map(|(_, count)| count).sum();
    let candidates = tally
        .into_iter()
        .map(|(candidate, votes)| CandidateTally::new(candidate, votes))
        .collect::<Vec<_>>();
    let winner = winner.and_then(|id| candidates.iter().find(|c| c.id == id).cloned());
    Ok(Results {
        candidates,
        winner,
        total_votes,
    })
}
