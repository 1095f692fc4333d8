mod config;
use log::{debug, info};
use snafu::prelude::*;

use std::collections::{BTreeMap, BTreeSet};

pub use crate::config::*;

pub mod builder;
pub mod manual;
pub mod ordering;
pub mod popup;
pub mod render;

pub type StoreResult<T> = Result<T, StoreError>;

/// The persistence capability behind the candidate records.
///
/// A store owns the records it holds. Candidates point back at their contest
/// through `CandidateRecord::contest`; the store keeps that relationship
/// consistent:
/// * a candidate can only reference a contest that exists in the same store
/// * removing a contest removes all of its candidates
/// * removing a candidate leaves its contest untouched
///
/// All mutations take `&mut self`: a store has a single writer at any time.
/// Readers on other threads work on clones of the records.
pub trait RecordStore {
    fn insert_contest(&mut self, contest: ContestRecord) -> ContestId;

    fn contest(&self, id: ContestId) -> Option<&ContestRecord>;

    fn update_contest(&mut self, id: ContestId, contest: ContestRecord) -> StoreResult<()>;

    /// Removes a contest and all the candidates that appear on it.
    fn remove_contest(&mut self, id: ContestId) -> StoreResult<ContestRecord>;

    /// All the contests, by increasing id.
    fn contest_ids(&self) -> Vec<ContestId>;

    /// Adds a candidate. If the record already references a contest, this contest
    /// must exist in the store.
    fn insert_candidate(&mut self, candidate: CandidateRecord) -> StoreResult<CandidateId>;

    fn candidate(&self, id: CandidateId) -> Option<&CandidateRecord>;

    /// Replaces all the fields of a candidate, including its contest.
    fn update_candidate(&mut self, id: CandidateId, candidate: CandidateRecord)
        -> StoreResult<()>;

    fn remove_candidate(&mut self, id: CandidateId) -> StoreResult<CandidateRecord>;

    /// Moves a candidate to the given contest.
    fn assign_contest(&mut self, candidate: CandidateId, contest: ContestId) -> StoreResult<()>;

    /// The candidates of a contest.
    ///
    /// No display order is implied, see `ordering::sort_for_display` for that.
    fn candidates_of(&self, contest: ContestId)
        -> StoreResult<Vec<(CandidateId, &CandidateRecord)>>;

    fn candidate_count(&self) -> usize;

    /// Drops every record. Identifiers handed out before are not reused.
    fn reset(&mut self);
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
struct ContestEntry {
    record: ContestRecord,
    members: BTreeSet<CandidateId>,
}

/// A record store that keeps everything in memory.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct InMemoryStore {
    next_contest: u32,
    next_candidate: u32,
    contests: BTreeMap<ContestId, ContestEntry>,
    candidates: BTreeMap<CandidateId, CandidateRecord>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore::default()
    }

    fn check_contest(&self, contest: Option<ContestId>) -> StoreResult<()> {
        if let Some(id) = contest {
            ensure!(self.contests.contains_key(&id), UnknownContestSnafu { id });
        }
        Ok(())
    }

    fn unlink(&mut self, candidate: CandidateId, contest: Option<ContestId>) {
        if let Some(entry) = contest.and_then(|cid| self.contests.get_mut(&cid)) {
            entry.members.remove(&candidate);
        }
    }

    fn link(&mut self, candidate: CandidateId, contest: Option<ContestId>) {
        if let Some(entry) = contest.and_then(|cid| self.contests.get_mut(&cid)) {
            entry.members.insert(candidate);
        }
    }
}

impl RecordStore for InMemoryStore {
    fn insert_contest(&mut self, contest: ContestRecord) -> ContestId {
        let id = ContestId(self.next_contest);
        self.next_contest += 1;
        debug!("insert_contest: {} {:?}", id, contest.display_title());
        self.contests.insert(
            id,
            ContestEntry {
                record: contest,
                members: BTreeSet::new(),
            },
        );
        id
    }

    fn contest(&self, id: ContestId) -> Option<&ContestRecord> {
        self.contests.get(&id).map(|e| &e.record)
    }

    fn update_contest(&mut self, id: ContestId, contest: ContestRecord) -> StoreResult<()> {
        let entry = self
            .contests
            .get_mut(&id)
            .context(UnknownContestSnafu { id })?;
        entry.record = contest;
        Ok(())
    }

    fn remove_contest(&mut self, id: ContestId) -> StoreResult<ContestRecord> {
        let entry = self
            .contests
            .remove(&id)
            .context(UnknownContestSnafu { id })?;
        for cid in entry.members.iter() {
            self.candidates.remove(cid);
        }
        info!(
            "remove_contest: {} removed along with {} candidates",
            id,
            entry.members.len()
        );
        Ok(entry.record)
    }

    fn contest_ids(&self) -> Vec<ContestId> {
        self.contests.keys().cloned().collect()
    }

    fn insert_candidate(&mut self, candidate: CandidateRecord) -> StoreResult<CandidateId> {
        self.check_contest(candidate.contest)?;
        let id = CandidateId(self.next_candidate);
        self.next_candidate += 1;
        debug!(
            "insert_candidate: {} {:?} in {:?}",
            id,
            candidate.display_name(),
            candidate.contest
        );
        self.link(id, candidate.contest);
        self.candidates.insert(id, candidate);
        Ok(id)
    }

    fn candidate(&self, id: CandidateId) -> Option<&CandidateRecord> {
        self.candidates.get(&id)
    }

    fn update_candidate(
        &mut self,
        id: CandidateId,
        candidate: CandidateRecord,
    ) -> StoreResult<()> {
        self.check_contest(candidate.contest)?;
        let previous = self
            .candidates
            .get(&id)
            .map(|c| c.contest)
            .context(UnknownCandidateSnafu { id })?;
        if previous != candidate.contest {
            self.unlink(id, previous);
            self.link(id, candidate.contest);
        }
        self.candidates.insert(id, candidate);
        Ok(())
    }

    fn remove_candidate(&mut self, id: CandidateId) -> StoreResult<CandidateRecord> {
        let record = self
            .candidates
            .remove(&id)
            .context(UnknownCandidateSnafu { id })?;
        self.unlink(id, record.contest);
        Ok(record)
    }

    fn assign_contest(&mut self, candidate: CandidateId, contest: ContestId) -> StoreResult<()> {
        self.check_contest(Some(contest))?;
        let previous = self
            .candidates
            .get(&candidate)
            .map(|c| c.contest)
            .context(UnknownCandidateSnafu { id: candidate })?;
        self.unlink(candidate, previous);
        self.link(candidate, Some(contest));
        if let Some(c) = self.candidates.get_mut(&candidate) {
            c.contest = Some(contest);
        }
        Ok(())
    }

    fn candidates_of(
        &self,
        contest: ContestId,
    ) -> StoreResult<Vec<(CandidateId, &CandidateRecord)>> {
        let entry = self
            .contests
            .get(&contest)
            .context(UnknownContestSnafu { id: contest })?;
        Ok(entry
            .members
            .iter()
            .filter_map(|cid| self.candidates.get(cid).map(|c| (*cid, c)))
            .collect())
    }

    fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    fn reset(&mut self) {
        info!(
            "reset: dropping {} contests and {} candidates",
            self.contests.len(),
            self.candidates.len()
        );
        self.contests.clear();
        self.candidates.clear();
    }
}
