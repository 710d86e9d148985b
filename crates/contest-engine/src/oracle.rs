//! Reputation lookups.
//!
//! The engine never manages reputation itself. It asks a [`ReputationOracle`]
//! for a voter's balance at the snapshot height of the competition, so that
//! transfers after the first vote cannot change anyone's weight.

use contest_types::{AccountId, BlockHeight, Weight};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Read-only reputation balances.
pub trait ReputationOracle: Send + Sync {
    /// Returns the balance of `account` as of `snapshot`.
    ///
    /// Unknown accounts have a balance of zero. For a fixed snapshot the
    /// result must not change over time.
    fn balance_of(&self, account: &AccountId, snapshot: BlockHeight) -> Weight;
}

/// In-memory reputation ledger keeping the balance history of every account.
///
/// Each change is recorded at a height; a lookup returns the balance after
/// the last change at or below the requested height.
#[derive(Debug, Default)]
pub struct SnapshotReputation {
    history: RwLock<HashMap<AccountId, Vec<(BlockHeight, Weight)>>>,
}

impl SnapshotReputation {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger with initial balances at height 0.
    pub fn with_balances<I, A>(balances: I) -> Self
    where
        I: IntoIterator<Item = (A, Weight)>,
        A: Into<AccountId>,
    {
        let ledger = Self::new();
        for (account, amount) in balances {
            ledger.mint(&account.into(), amount, 0);
        }
        ledger
    }

    /// Current balance (latest recorded height).
    pub fn balance(&self, account: &AccountId) -> Weight {
        self.balance_of(account, BlockHeight::MAX)
    }

    /// Adds reputation to an account at `height`.
    ///
    /// Balances recorded above `height` grow by the same amount.
    pub fn mint(&self, account: &AccountId, amount: Weight, height: BlockHeight) {
        self.update(account, height, |balance| balance.saturating_add(amount));
    }

    /// Removes reputation from an account at `height`, never below zero.
    ///
    /// Balances recorded above `height` shrink by the same amount.
    pub fn burn(&self, account: &AccountId, amount: Weight, height: BlockHeight) {
        self.update(account, height, |balance| balance.saturating_sub(amount));
    }

    /// Moves reputation between accounts at `height`.
    pub fn transfer(&self, from: &AccountId, to: &AccountId, amount: Weight, height: BlockHeight) {
        let moved = amount.min(self.balance_of(from, height));
        self.burn(from, moved, height);
        self.mint(to, moved, height);
    }

    /// Applies `change` to the balance at `height` and to every later entry.
    fn update(&self, account: &AccountId, height: BlockHeight, change: impl Fn(Weight) -> Weight) {
        let mut history = self.history.write();
        let entries = history.entry(account.clone()).or_default();

        let index = entries.partition_point(|(h, _)| *h < height);
        if !matches!(entries.get(index), Some((h, _)) if *h == height) {
            let carried = index.checked_sub(1).map_or(0, |i| entries[i].1);
            entries.insert(index, (height, carried));
        }

        for (_, balance) in &mut entries[index..] {
            *balance = change(*balance);
        }
    }
}

impl ReputationOracle for SnapshotReputation {
    fn balance_of(&self, account: &AccountId, snapshot: BlockHeight) -> Weight {
        self.history
            .read()
            .get(account)
            .and_then(|entries| entries.iter().rev().find(|(h, _)| *h <= snapshot))
            .map(|(_, balance)| *balance)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_balances() {
        let ledger = SnapshotReputation::with_balances([("alice", 2000), ("bob", 5000)]);
        assert_eq!(ledger.balance_of(&AccountId::new("alice"), 0), 2000);
        assert_eq!(ledger.balance_of(&AccountId::new("bob"), 99), 5000);
        assert_eq!(ledger.balance_of(&AccountId::new("carol"), 99), 0);
    }

    #[test]
    fn test_history_is_kept() {
        let ledger = SnapshotReputation::new();
        let alice = AccountId::new("alice");
        let bob = AccountId::new("bob");

        ledger.mint(&alice, 100, 1);
        ledger.transfer(&alice, &bob, 40, 5);

        assert_eq!(ledger.balance_of(&alice, 0), 0);
        assert_eq!(ledger.balance_of(&alice, 4), 100);
        assert_eq!(ledger.balance_of(&alice, 5), 60);
        assert_eq!(ledger.balance_of(&bob, 4), 0);
        assert_eq!(ledger.balance_of(&bob, 5), 40);
        assert_eq!(ledger.balance(&bob), 40);
    }

    #[test]
    fn test_burn_saturates() {
        let ledger = SnapshotReputation::with_balances([("alice", 10)]);
        let alice = AccountId::new("alice");
        ledger.burn(&alice, 50, 3);
        assert_eq!(ledger.balance(&alice), 0);
        assert_eq!(ledger.balance_of(&alice, 2), 10);
    }

    #[test]
    fn test_backdated_changes_carry_forward() {
        let ledger = SnapshotReputation::new();
        let alice = AccountId::new("alice");

        ledger.mint(&alice, 100, 10);
        ledger.mint(&alice, 50, 5);
        assert_eq!(ledger.balance_of(&alice, 4), 0);
        assert_eq!(ledger.balance_of(&alice, 5), 50);
        assert_eq!(ledger.balance_of(&alice, 10), 150);
        assert_eq!(ledger.balance(&alice), 150);

        // Same height as an earlier entry.
        ledger.mint(&alice, 10, 5);
        assert_eq!(ledger.balance_of(&alice, 5), 60);
        assert_eq!(ledger.balance_of(&alice, 10), 160);

        ledger.burn(&alice, 20, 7);
        assert_eq!(ledger.balance_of(&alice, 6), 60);
        assert_eq!(ledger.balance_of(&alice, 7), 40);
        assert_eq!(ledger.balance(&alice), 140);
    }

    #[test]
    fn test_backdated_transfer_uses_balance_at_height() {
        let ledger = SnapshotReputation::new();
        let alice = AccountId::new("alice");
        let bob = AccountId::new("bob");

        ledger.mint(&alice, 30, 1);
        ledger.mint(&alice, 100, 8);
        ledger.transfer(&alice, &bob, 50, 4);

        // Only 30 was held at height 4.
        assert_eq!(ledger.balance_of(&alice, 4), 0);
        assert_eq!(ledger.balance_of(&bob, 4), 30);
        assert_eq!(ledger.balance(&alice), 100);
        assert_eq!(ledger.balance(&bob), 30);
    }
}
