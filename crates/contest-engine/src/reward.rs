//! Reward shares of a closed competition.
//!
//! A suggestion at rank `r` tied with `t - 1` others shares the percentages of
//! ranks `r .. r + t` (capped at the number of winners) equally with them.
//! Suggestions without votes, or ranked past the last winner, get nothing.

use contest_types::{Weight, SPLIT_TOTAL};
use serde::{Deserialize, Serialize};

use crate::ranking::{dense_rank, tie_count};

/// Portion of a competition's rewards owed to one suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardShare {
    /// Dense rank of the suggestion.
    pub rank: usize,
    /// Number of suggestions sharing the rank, including this one.
    pub tied: usize,
    /// Percentage points shared by the tied suggestions.
    pub points: u64,
}

impl RewardShare {
    /// Computes the share of a suggestion with `total_votes`, given the totals
    /// of every suggestion in the competition.
    pub fn compute<I>(reward_split: &[u32], totals: I, total_votes: Weight) -> Self
    where
        I: IntoIterator<Item = Weight>,
        I::IntoIter: Clone,
    {
        let totals = totals.into_iter();
        let rank = dense_rank(totals.clone(), total_votes);
        let tied = tie_count(totals, total_votes).max(1);

        if total_votes == 0 || rank >= reward_split.len() {
            return Self {
                rank,
                tied,
                points: 0,
            };
        }

        let last = (rank + tied).min(reward_split.len());
        let points = reward_split[rank..last].iter().map(|p| u64::from(*p)).sum();
        Self { rank, tied, points }
    }

    /// Returns true if the suggestion is owed part of the rewards.
    pub fn is_winner(&self) -> bool {
        self.points > 0
    }

    /// Scales `amount` by this share, rounding down.
    pub fn apply(&self, amount: u128) -> u128 {
        let denominator = u128::from(SPLIT_TOTAL) * self.tied as u128;
        let points = u128::from(self.points);
        (amount / denominator) * points + (amount % denominator) * points / denominator
    }
}
