//! Fuzz target for the bounded ranking index.
//!
//! Feeds arbitrary non-decreasing totals into the index and compares it to a
//! full scan after every update.

#![no_main]

use arbitrary::Arbitrary;
use contest_engine::ranking::{dense_rank, TopSuggestions};
use contest_types::SuggestionId;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    increments: Vec<(u8, u16)>,
}

fuzz_target!(|input: Input| {
    let capacity = usize::from(input.capacity % 16);
    let mut top = TopSuggestions::new(capacity);
    let mut totals: BTreeMap<u64, u128> = BTreeMap::new();

    for (id, amount) in input.increments {
        let total = totals.entry(u64::from(id % 32)).or_insert(0);
        *total += u128::from(amount);
        top.update(SuggestionId::new(u64::from(id % 32)), *total);

        assert!(top.len() <= capacity);
        for entry in top.entries() {
            let scan = dense_rank(totals.values().copied(), entry.total_votes);
            assert_eq!(top.rank_of(entry.suggestion_id), Some(scan));
            assert_eq!(totals[&entry.suggestion_id.get()], entry.total_votes);
        }
    }
});
