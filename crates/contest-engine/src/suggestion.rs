//! Suggestions competing within a competition.

use contest_types::{AccountId, ContentHash, ProposalId, SuggestionId, Timestamp, Weight};
use serde::{Deserialize, Serialize};

/// A candidate submission competing for a reward rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Unique identifier across all competitions.
    pub id: SuggestionId,
    /// Competition this suggestion belongs to.
    pub proposal_id: ProposalId,
    /// Hash of the suggestion content.
    pub description: ContentHash,
    /// Account that submitted the suggestion and receives its reward.
    pub suggester: AccountId,
    /// Sum of the weights of all votes cast for this suggestion.
    pub total_votes: Weight,
    /// Time the suggestion was submitted.
    pub created_at: Timestamp,
}

impl Suggestion {
    pub(crate) fn new(
        id: SuggestionId,
        proposal_id: ProposalId,
        description: ContentHash,
        suggester: AccountId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            proposal_id,
            description,
            suggester,
            total_votes: 0,
            created_at,
        }
    }

    /// Returns true if at least some vote mass was cast for this suggestion.
    pub fn has_votes(&self) -> bool {
        self.total_votes > 0
    }
}
