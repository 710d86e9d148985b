//! Events emitted by competition operations.

use contest_types::{AccountId, BlockHeight, ProposalId, SuggestionId, Timestamp, Weight};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Something observers of the engine are told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CompetitionEvent {
    /// A competition was created.
    NewCompetitionProposal {
        proposal_id: ProposalId,
        number_of_winners: usize,
        reward_split: Vec<u32>,
        start_time: Timestamp,
        voting_start_time: Timestamp,
        end_time: Timestamp,
        votes_per_voter: u32,
        beneficiary: AccountId,
    },
    /// A suggestion was submitted.
    NewSuggestion { suggestion_id: SuggestionId },
    /// The first vote of a competition fixed its reputation snapshot.
    SnapshotBlock {
        proposal_id: ProposalId,
        snapshot_block: BlockHeight,
    },
    /// A vote was accepted.
    NewVote {
        suggestion_id: SuggestionId,
        reputation: Weight,
    },
}

impl CompetitionEvent {
    /// Short name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewCompetitionProposal { .. } => "NewCompetitionProposal",
            Self::NewSuggestion { .. } => "NewSuggestion",
            Self::SnapshotBlock { .. } => "SnapshotBlock",
            Self::NewVote { .. } => "NewVote",
        }
    }

    /// Encodes the event as a single JSON line.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The outcome of a successful operation together with the events it emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt<T> {
    /// Value returned by the operation.
    pub value: T,
    /// Events emitted, in order.
    pub events: Vec<CompetitionEvent>,
}

impl<T> Receipt<T> {
    pub(crate) fn new(value: T, events: Vec<CompetitionEvent>) -> Self {
        Self { value, events }
    }

    /// Consumes the receipt, returning the value.
    pub fn into_value(self) -> T {
        self.value
    }
}
