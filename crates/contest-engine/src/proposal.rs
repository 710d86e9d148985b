//! Competition records and their lifecycle.

use contest_types::{AccountId, BlockHeight, ContentHash, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::CompetitionConfig;

/// Lifecycle phase of a competition at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Before the start time; nothing is accepted yet.
    Pending,
    /// Suggestions are accepted, votes are not.
    Suggestion,
    /// Suggestions and votes are accepted.
    Voting,
    /// After the end time; the ranking is final.
    Closed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Pending => write!(f, "pending"),
            Phase::Suggestion => write!(f, "suggestion"),
            Phase::Voting => write!(f, "voting"),
            Phase::Closed => write!(f, "closed"),
        }
    }
}

/// A competition proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    /// Unique identifier.
    pub id: ProposalId,
    /// Account that proposed the competition.
    pub proposer: AccountId,
    /// Hash of the competition description.
    pub description: ContentHash,
    /// Reputation change applied by the beneficiary scheme.
    pub reputation_change: i64,
    /// Reward amounts.
    pub rewards: Vec<u128>,
    /// Token in which external rewards are paid.
    pub reward_token: String,
    /// Percentage of the rewards for each rank.
    pub reward_split: Vec<u32>,
    /// Suggestions are accepted from this time on.
    pub start_time: Timestamp,
    /// Votes are accepted from this time on.
    pub voting_start_time: Timestamp,
    /// Nothing is accepted after this time.
    pub end_time: Timestamp,
    /// Number of distinct suggestions each voter may vote for.
    pub votes_per_voter: u32,
    /// Scheme that redeems rewards.
    pub beneficiary: AccountId,
    /// Height fixed by the first vote; reputation is read at this height.
    pub snapshot_block: Option<BlockHeight>,
    /// Time the competition was proposed.
    pub created_at: Timestamp,
}

impl Competition {
    /// Creates a competition from a validated configuration.
    pub(crate) fn new(
        id: ProposalId,
        proposer: AccountId,
        config: CompetitionConfig,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            proposer,
            description: config.description,
            reputation_change: config.reputation_change,
            rewards: config.rewards,
            reward_token: config.reward_token,
            reward_split: config.reward_split,
            start_time: config.start_time,
            voting_start_time: config.voting_start_time,
            end_time: config.end_time,
            votes_per_voter: config.votes_per_voter,
            beneficiary: config.beneficiary,
            snapshot_block: None,
            created_at,
        }
    }

    /// Number of rewarded ranks.
    pub fn number_of_winners(&self) -> usize {
        self.reward_split.len()
    }

    /// Returns the phase at time `now`.
    pub fn phase_at(&self, now: Timestamp) -> Phase {
        if now < self.start_time {
            Phase::Pending
        } else if now > self.end_time {
            Phase::Closed
        } else if now < self.voting_start_time {
            Phase::Suggestion
        } else {
            Phase::Voting
        }
    }

    /// Returns true if suggestions are accepted at `now`.
    pub fn accepts_suggestions(&self, now: Timestamp) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    /// Returns true if votes are accepted at `now`.
    pub fn accepts_votes(&self, now: Timestamp) -> bool {
        self.voting_start_time <= now && now <= self.end_time
    }

    /// Returns true once the end time has passed.
    pub fn is_closed(&self, now: Timestamp) -> bool {
        now > self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_competition() -> Competition {
        let config = CompetitionConfig::new(ContentHash::of("d"), 100, 700, 1300, "scheme")
            .with_reward_split(vec![50, 25, 15, 10]);
        Competition::new(ProposalId::new(1), AccountId::new("alice"), config, 100)
    }

    #[test]
    fn test_competition_creation() {
        let c = create_test_competition();
        assert_eq!(c.number_of_winners(), 4);
        assert_eq!(c.snapshot_block, None);
        assert_eq!(c.proposer.as_str(), "alice");
    }

    #[test]
    fn test_phases() {
        let c = create_test_competition();
        assert_eq!(c.phase_at(99), Phase::Pending);
        assert_eq!(c.phase_at(100), Phase::Suggestion);
        assert_eq!(c.phase_at(699), Phase::Suggestion);
        assert_eq!(c.phase_at(700), Phase::Voting);
        assert_eq!(c.phase_at(1300), Phase::Voting);
        assert_eq!(c.phase_at(1301), Phase::Closed);
    }

    #[test]
    fn test_windows() {
        let c = create_test_competition();
        assert!(!c.accepts_suggestions(99));
        assert!(c.accepts_suggestions(100));
        assert!(c.accepts_suggestions(1300));
        assert!(!c.accepts_suggestions(1301));

        assert!(!c.accepts_votes(699));
        assert!(c.accepts_votes(700));
        assert!(c.accepts_votes(1300));
        assert!(!c.accepts_votes(1301));
        assert!(c.is_closed(1301));
    }
}
