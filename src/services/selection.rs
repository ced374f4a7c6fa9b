//! Reviewer selection engine.
//!
//! Pure candidate filtering and randomized selection. Randomness is an
//! explicit parameter: production callers pass `rand::thread_rng()`, tests a
//! seeded `StdRng`. None of these functions touch the database; degenerate
//! inputs come back as empty results for the caller to interpret.

use crate::models::User;
use rand::seq::SliceRandom;
use rand::Rng;

/// Drop the member matching `exclude_user_id` from a candidate list.
///
/// Used to keep a PR's author out of its own reviewer pool. Input order is
/// preserved; no other filtering happens here (inactive members are already
/// excluded by the roster query).
pub fn filter_eligible(members: Vec<User>, exclude_user_id: &str) -> Vec<User> {
    members
        .into_iter()
        .filter(|member| member.user_id != exclude_user_id)
        .collect()
}

/// Pick up to `max` reviewers uniformly at random.
///
/// Shuffles the candidate IDs and takes the prefix, so the result has no
/// duplicates and every subset of the requested size is equally likely.
/// Fewer candidates than `max` yields fewer reviewers; empty in, empty out.
pub fn select_reviewers<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[User],
    max: usize,
) -> Vec<String> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut ids: Vec<String> = candidates.iter().map(|c| c.user_id.clone()).collect();
    ids.shuffle(rng);
    ids.truncate(max);
    ids
}

/// Narrow a team roster to valid replacement candidates.
///
/// A candidate must be none of: the departing reviewer, the PR author, or an
/// already-assigned reviewer.
pub fn filter_reassignment_candidates(
    members: Vec<User>,
    current_reviewers: &[String],
    author_id: &str,
    excluded_user_id: &str,
) -> Vec<User> {
    members
        .into_iter()
        .filter(|member| {
            member.user_id != excluded_user_id
                && member.user_id != author_id
                && !current_reviewers.iter().any(|r| *r == member.user_id)
        })
        .collect()
}

/// Pick one replacement uniformly at random; `None` if there is no candidate.
pub fn select_replacement<'a, R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &'a [User],
) -> Option<&'a User> {
    candidates.choose(rng)
}

/// Swap `old_id` for `new_id` in a reviewer list.
///
/// The result has identical length and order. Reviewer IDs are unique within
/// a list, so at most one position changes.
pub fn replace_reviewer(reviewers: &[String], old_id: &str, new_id: &str) -> Vec<String> {
    reviewers
        .iter()
        .map(|reviewer| {
            if reviewer == old_id {
                new_id.to_string()
            } else {
                reviewer.clone()
            }
        })
        .collect()
}
