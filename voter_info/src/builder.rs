use log::debug;

pub use crate::config::*;
use crate::{RecordStore, StoreResult};

/// A builder for importing a contest and its candidates into a store.
///
/// This is what feed importers should use: it creates the contest first and
/// attaches every candidate to it.
///
/// ```
/// use voter_info::builder::ContestBuilder;
/// use voter_info::{ContestRecord, InMemoryStore, RecordStore, StoreError};
///
/// let mut store = InMemoryStore::new();
/// let mut builder = ContestBuilder::new(&mut store, ContestRecord::default());
/// builder.add_candidate_simple("Anna", Some(1))?;
/// builder.add_candidate_simple("Bob", None)?;
/// let (contest, candidates) = builder.finish();
///
/// assert_eq!(candidates.len(), 2);
/// assert_eq!(store.candidates_of(contest)?.len(), 2);
/// # Ok::<(), StoreError>(())
/// ```
pub struct ContestBuilder<'a, S: RecordStore> {
    store: &'a mut S,
    contest: ContestId,
    added: Vec<CandidateId>,
}

impl<'a, S: RecordStore> ContestBuilder<'a, S> {
    pub fn new(store: &'a mut S, contest: ContestRecord) -> ContestBuilder<'a, S> {
        let id = store.insert_contest(contest);
        ContestBuilder {
            store,
            contest: id,
            added: Vec::new(),
        }
    }

    pub fn contest_id(&self) -> ContestId {
        self.contest
    }

    /// Adds a candidate with only a name and an optional position on the ballot.
    pub fn add_candidate_simple(
        &mut self,
        name: &str,
        order_on_ballot: Option<i64>,
    ) -> StoreResult<CandidateId> {
        self.add_candidate(CandidateRecord {
            order_on_ballot,
            ..CandidateRecord::named(name)
        })
    }

    /// Adds a candidate. Any contest already set on the record is replaced by
    /// the contest of this builder.
    pub fn add_candidate(&mut self, candidate: CandidateRecord) -> StoreResult<CandidateId> {
        let record = CandidateRecord {
            contest: Some(self.contest),
            ..candidate
        };
        let id = self.store.insert_candidate(record)?;
        debug!("ContestBuilder: added {} to {}", id, self.contest);
        self.added.push(id);
        Ok(id)
    }

    /// The contest and the candidates added, in insertion order.
    pub fn finish(self) -> (ContestId, Vec<CandidateId>) {
        (self.contest, self.added)
    }
}
