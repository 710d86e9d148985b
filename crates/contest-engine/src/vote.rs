//! Vote records and per-voter budgets.

use contest_types::{AccountId, BlockHeight, ProposalId, SuggestionId, Timestamp, Weight};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A vote cast by one voter for one suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Suggestion voted for.
    pub suggestion_id: SuggestionId,
    /// Voter.
    pub voter: AccountId,
    /// Reputation the voter held at the snapshot.
    pub weight: Weight,
    /// Snapshot height the weight was read at.
    pub snapshot_block: BlockHeight,
    /// Time the vote was cast.
    pub cast_at: Timestamp,
}

/// Vote records and budget consumption.
///
/// Only the engine writes here; every write happens after the vote has been
/// fully validated.
#[derive(Debug, Default)]
pub(crate) struct VoteBook {
    /// Records indexed by (suggestion, voter).
    records: HashMap<(SuggestionId, AccountId), VoteRecord>,
    /// Votes cast per (competition, voter).
    budgets: HashMap<(ProposalId, AccountId), u32>,
}

impl VoteBook {
    pub fn has_voted(&self, suggestion_id: SuggestionId, voter: &AccountId) -> bool {
        self.records.contains_key(&(suggestion_id, voter.clone()))
    }

    pub fn votes_cast(&self, proposal_id: ProposalId, voter: &AccountId) -> u32 {
        self.budgets
            .get(&(proposal_id, voter.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn get(&self, suggestion_id: SuggestionId, voter: &AccountId) -> Option<&VoteRecord> {
        self.records.get(&(suggestion_id, voter.clone()))
    }

    /// Stores the record and consumes one vote of the voter's budget.
    pub fn record(&mut self, proposal_id: ProposalId, record: VoteRecord) {
        *self
            .budgets
            .entry((proposal_id, record.voter.clone()))
            .or_insert(0) += 1;
        self.records
            .insert((record.suggestion_id, record.voter.clone()), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
