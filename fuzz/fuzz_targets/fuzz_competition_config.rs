//! Fuzz target for competition configuration.
//!
//! Validation must never panic, and a store must accept exactly the
//! configurations that validate.

#![no_main]

use arbitrary::Arbitrary;
use contest_engine::{CompetitionConfig, CompetitionStore, ManualClock, SnapshotReputation};
use contest_types::{AccountId, ContentHash};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Debug, Arbitrary)]
struct Input {
    reward_split: Vec<u32>,
    start_time: u64,
    voting_start_time: u64,
    end_time: u64,
    votes_per_voter: u32,
}

fuzz_target!(|input: Input| {
    let config = CompetitionConfig::new(
        ContentHash::of("fuzz"),
        input.start_time,
        input.voting_start_time,
        input.end_time,
        "beneficiary",
    )
    .with_reward_split(input.reward_split)
    .with_votes_per_voter(input.votes_per_voter);

    let valid = config.validate().is_ok();

    let store = CompetitionStore::new(
        Arc::new(SnapshotReputation::new()),
        Arc::new(ManualClock::new(0)),
    );
    let accepted = store
        .propose_competition(&AccountId::new("proposer"), config)
        .is_ok();

    assert_eq!(valid, accepted);
    assert_eq!(store.proposal_count(), u64::from(accepted));
});
