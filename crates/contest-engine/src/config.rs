//! Competition configuration and its validation.

use contest_types::{AccountId, ContentHash, Timestamp, MAX_WINNERS, SPLIT_TOTAL};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Everything needed to open a competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionConfig {
    /// Hash of the competition description.
    pub description: ContentHash,
    /// Reputation granted to the beneficiary scheme, applied elsewhere.
    pub reputation_change: i64,
    /// Reward amounts distributed to winners according to the split.
    pub rewards: Vec<u128>,
    /// Token in which external rewards are paid.
    pub reward_token: String,
    /// Percentage of the rewards for each rank; its length is the number of winners.
    pub reward_split: Vec<u32>,
    /// Suggestions are accepted from this time on.
    pub start_time: Timestamp,
    /// Votes are accepted from this time on.
    pub voting_start_time: Timestamp,
    /// No suggestion or vote is accepted after this time.
    pub end_time: Timestamp,
    /// Number of distinct suggestions each voter may vote for.
    pub votes_per_voter: u32,
    /// Scheme that redeems rewards once the competition closes.
    pub beneficiary: AccountId,
}

impl CompetitionConfig {
    /// Creates a configuration with a single winner taking all rewards.
    ///
    /// Use the `with_*` methods to adjust it.
    pub fn new(
        description: ContentHash,
        start_time: Timestamp,
        voting_start_time: Timestamp,
        end_time: Timestamp,
        beneficiary: impl Into<AccountId>,
    ) -> Self {
        Self {
            description,
            reputation_change: 0,
            rewards: Vec::new(),
            reward_token: String::new(),
            reward_split: vec![100],
            start_time,
            voting_start_time,
            end_time,
            votes_per_voter: 1,
            beneficiary: beneficiary.into(),
        }
    }

    /// Sets the reward split.
    pub fn with_reward_split(mut self, reward_split: Vec<u32>) -> Self {
        self.reward_split = reward_split;
        self
    }

    /// Sets the reward amounts and token.
    pub fn with_rewards(mut self, rewards: Vec<u128>, reward_token: impl Into<String>) -> Self {
        self.rewards = rewards;
        self.reward_token = reward_token.into();
        self
    }

    /// Sets the reputation change.
    pub fn with_reputation_change(mut self, reputation_change: i64) -> Self {
        self.reputation_change = reputation_change;
        self
    }

    /// Sets the vote budget of each voter.
    pub fn with_votes_per_voter(mut self, votes_per_voter: u32) -> Self {
        self.votes_per_voter = votes_per_voter;
        self
    }

    /// Number of rewarded ranks.
    pub fn number_of_winners(&self) -> usize {
        self.reward_split.len()
    }

    /// Checks every constraint a competition must satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let len = self.reward_split.len();
        if len == 0 || len > MAX_WINNERS {
            return Err(ConfigError::RewardSplitLength {
                len,
                max: MAX_WINNERS,
            });
        }

        let sum: u64 = self.reward_split.iter().map(|p| u64::from(*p)).sum();
        if sum != SPLIT_TOTAL {
            return Err(ConfigError::RewardSplitSum { sum });
        }

        if self.start_time > self.voting_start_time {
            return Err(ConfigError::StartAfterVotingStart {
                start_time: self.start_time,
                voting_start_time: self.voting_start_time,
            });
        }

        if self.voting_start_time >= self.end_time {
            return Err(ConfigError::VotingStartNotBeforeEnd {
                voting_start_time: self.voting_start_time,
                end_time: self.end_time,
            });
        }

        if self.votes_per_voter == 0 {
            return Err(ConfigError::ZeroVoteBudget);
        }

        Ok(())
    }
}
