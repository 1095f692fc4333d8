//! Display order of the candidates of a contest.
//!
//! Feeds give the position of a candidate on the ballot through `orderOnBallot`,
//! but many feeds leave it out for some or all candidates. The order used here is:
//! 1. the candidates with a position on the ballot, by increasing position
//! 2. the candidates without one, after all the others
//!
//! Within each group, ties are broken by name (unnamed candidates last) and then
//! by identifier, so that the order is total and the same on every run.

use std::cmp::Ordering;

use log::debug;

use crate::config::*;

fn compare_names(a: &CandidateRecord, b: &CandidateRecord) -> Ordering {
    match (&a.name, &b.name) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compares two candidates for display. See the module documentation.
pub fn display_order(a: &CandidateRecord, b: &CandidateRecord) -> Ordering {
    let by_ballot = match (a.order_on_ballot, b.order_on_ballot) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_ballot.then_with(|| compare_names(a, b))
}

/// Sorts the candidates of a contest in display order.
pub fn sort_for_display(candidates: &mut [(CandidateId, &CandidateRecord)]) {
    candidates.sort_by(|(id_a, a), (id_b, b)| display_order(a, b).then(id_a.cmp(id_b)));
    debug!(
        "sort_for_display: {:?}",
        candidates
            .iter()
            .map(|(_, c)| c.display_name())
            .collect::<Vec<&str>>()
    );
}
