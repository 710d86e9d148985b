//! Ranking of suggestions by vote mass.
//!
//! The authoritative rank of a suggestion is its dense rank: the number of
//! suggestions of the same competition with strictly more votes. Ties share a
//! rank, and a suggestion nobody voted for ranks below every voted one.
//!
//! Only the first `K` ranks are rewarded, so the engine also keeps a
//! [`TopSuggestions`] index per competition, updated in `O(K)` on each vote.
//! For every suggestion in the index, the rank derived from the index equals
//! the dense rank computed by [`dense_rank`].

use contest_types::{SuggestionId, Weight};
use serde::{Deserialize, Serialize};

/// Counts the weights strictly greater than `target`.
pub fn dense_rank<I>(weights: I, target: Weight) -> usize
where
    I: IntoIterator<Item = Weight>,
{
    weights.into_iter().filter(|w| *w > target).count()
}

/// Counts the weights equal to `target`.
pub fn tie_count<I>(weights: I, target: Weight) -> usize
where
    I: IntoIterator<Item = Weight>,
{
    weights.into_iter().filter(|w| *w == target).count()
}

/// An entry of the top suggestions index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSuggestion {
    /// Suggestion.
    pub suggestion_id: SuggestionId,
    /// Its total votes.
    pub total_votes: Weight,
}

/// Bounded index of the `K` suggestions with the most votes.
///
/// Entries are ordered by weight, highest first. Among equal weights the
/// entry that reached the weight first comes first. A suggestion outside a
/// full index only enters when its weight exceeds the current minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSuggestions {
    capacity: usize,
    entries: Vec<RankedSuggestion>,
}

impl TopSuggestions {
    /// Creates an empty index holding at most `capacity` suggestions.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no suggestion is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in rank order.
    pub fn entries(&self) -> &[RankedSuggestion] {
        &self.entries
    }

    /// Suggestion ids in rank order.
    pub fn ids(&self) -> Vec<SuggestionId> {
        self.entries.iter().map(|e| e.suggestion_id).collect()
    }

    /// Returns the position of a suggestion in the index, if present.
    pub fn position(&self, suggestion_id: SuggestionId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.suggestion_id == suggestion_id)
    }

    /// Dense rank of an indexed suggestion, computed from the index alone.
    pub fn rank_of(&self, suggestion_id: SuggestionId) -> Option<usize> {
        let position = self.position(suggestion_id)?;
        let weight = self.entries[position].total_votes;
        Some(dense_rank(self.entries.iter().map(|e| e.total_votes), weight))
    }

    /// Records the new total of a suggestion after a vote.
    ///
    /// Totals only grow, so an indexed suggestion can only move up.
    pub fn update(&mut self, suggestion_id: SuggestionId, total_votes: Weight) {
        if self.capacity == 0 || total_votes == 0 {
            return;
        }

        if let Some(position) = self.position(suggestion_id) {
            if self.entries[position].total_votes == total_votes {
                return;
            }
            self.entries.remove(position);
        } else if self.entries.len() == self.capacity {
            match self.entries.last() {
                Some(last) if total_votes > last.total_votes => {
                    self.entries.pop();
                }
                _ => return,
            }
        }

        // Behind every entry with at least the same weight: those got there first.
        let insert_at = self
            .entries
            .iter()
            .position(|e| e.total_votes < total_votes)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            insert_at,
            RankedSuggestion {
                suggestion_id,
                total_votes,
            },
        );
    }
}
