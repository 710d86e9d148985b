//! Fuzz target for sequences of suggestions, votes and clock moves.
//!
//! Checks that budgets hold and that the winners always agree with the
//! full-scan rank.

#![no_main]

use arbitrary::Arbitrary;
use contest_engine::{CompetitionConfig, CompetitionStore, ManualClock, SnapshotReputation};
use contest_types::{AccountId, ContentHash, SuggestionId};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

const VOTERS: usize = 4;

#[derive(Debug, Arbitrary)]
enum Action {
    Advance(u8),
    Suggest(u8),
    Vote { voter: u8, suggestion: u8 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    weights: [u16; VOTERS],
    winners: u8,
    votes_per_voter: u8,
    actions: Vec<Action>,
}

fuzz_target!(|input: Input| {
    let voters: Vec<AccountId> = (0..VOTERS)
        .map(|i| AccountId::new(format!("voter{i}")))
        .collect();
    let reputation = SnapshotReputation::with_balances(
        voters
            .iter()
            .cloned()
            .zip(input.weights.iter().map(|w| u128::from(*w))),
    );
    let clock = Arc::new(ManualClock::new(0));
    let store = CompetitionStore::new(Arc::new(reputation), clock.clone());

    let winners = usize::from(input.winners % 8) + 1;
    let mut split = vec![0; winners];
    split[0] = 100;
    let budget = u32::from(input.votes_per_voter % 4) + 1;
    let config = CompetitionConfig::new(ContentHash::of("fuzz"), 0, 100, 1_000, "beneficiary")
        .with_reward_split(split)
        .with_votes_per_voter(budget);
    let Ok(receipt) = store.propose_competition(&voters[0], config) else {
        return;
    };
    let proposal_id = receipt.value;

    for action in input.actions {
        match action {
            Action::Advance(seconds) => clock.advance(u64::from(seconds)),
            Action::Suggest(author) => {
                let author = &voters[usize::from(author) % VOTERS];
                let _ = store.suggest(proposal_id, author, ContentHash::of(author.as_str()));
            }
            Action::Vote { voter, suggestion } => {
                let voter = &voters[usize::from(voter) % VOTERS];
                let _ = store.vote(voter, SuggestionId::new(u64::from(suggestion)));
            }
        }
    }

    for voter in &voters {
        assert!(store.votes_cast(proposal_id, voter) <= budget);
    }

    let ids = store.winners(proposal_id);
    assert!(ids.len() <= winners);
    let totals: Vec<u128> = ids
        .iter()
        .filter_map(|id| store.suggestion(*id).map(|s| s.total_votes))
        .collect();
    for (index, id) in ids.iter().enumerate() {
        let rank = store.ordered_index_of_suggestion(proposal_id, *id);
        let expected = totals.iter().filter(|t| **t > totals[index]).count();
        assert_eq!(rank, expected);
    }
});
