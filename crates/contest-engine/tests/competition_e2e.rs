//! End-to-end tests for competitions: proposing, suggesting, voting and ranking.

use contest_engine::{
    ChainContext, CompetitionConfig, CompetitionEvent, CompetitionStore, ErrorKind, ManualClock,
    SnapshotReputation,
};
use contest_types::{AccountId, ContentHash, ProposalId, SuggestionId};
use std::sync::Arc;

const NOW: u64 = 1_700_000_000;

struct TestSetup {
    store: CompetitionStore,
    clock: Arc<ManualClock>,
    accounts: [AccountId; 3],
    reputation: [u128; 3],
}

fn setup() -> TestSetup {
    let accounts = [
        AccountId::new("account0"),
        AccountId::new("account1"),
        AccountId::new("account2"),
    ];
    let reputation = [2000, 5000, 7000];
    let ledger = SnapshotReputation::with_balances(
        accounts.iter().cloned().zip(reputation.iter().copied()),
    );
    let clock = Arc::new(ManualClock::new(NOW));
    let store = CompetitionStore::new(Arc::new(ledger), clock.clone());
    TestSetup {
        store,
        clock,
        accounts,
        reputation,
    }
}

fn config(reward_split: Vec<u32>, start: u64, voting_start: u64, end: u64) -> CompetitionConfig {
    CompetitionConfig::new(
        ContentHash::of("description-hash"),
        NOW + start,
        NOW + voting_start,
        NOW + end,
        "contribution-reward",
    )
    .with_reputation_change(10)
    .with_rewards(vec![1, 2, 3], "token")
    .with_reward_split(reward_split)
    .with_votes_per_voter(3)
}

fn default_config() -> CompetitionConfig {
    config(vec![50, 25, 15, 10], 0, 600, 1200)
}

fn propose(t: &TestSetup, config: CompetitionConfig) -> ProposalId {
    t.store
        .propose_competition(&t.accounts[0], config)
        .unwrap()
        .into_value()
}

fn suggest(t: &TestSetup, proposal_id: ProposalId) -> SuggestionId {
    t.store
        .suggest(proposal_id, &t.accounts[0], ContentHash::of("suggestion"))
        .unwrap()
        .into_value()
}

#[test]
fn test_propose_competition_event() {
    let t = setup();
    let receipt = t
        .store
        .propose_competition(&t.accounts[0], default_config())
        .unwrap();

    assert_eq!(
        receipt.events,
        vec![CompetitionEvent::NewCompetitionProposal {
            proposal_id: receipt.value,
            number_of_winners: 4,
            reward_split: vec![50, 25, 15, 10],
            start_time: NOW,
            voting_start_time: NOW + 600,
            end_time: NOW + 1200,
            votes_per_voter: 3,
            beneficiary: AccountId::new("contribution-reward"),
        }]
    );

    let competition = t.store.proposal(receipt.value).unwrap();
    assert_eq!(competition.rewards, vec![1, 2, 3]);
    assert_eq!(competition.reputation_change, 10);
    assert_eq!(competition.snapshot_block, None);
}

#[test]
fn test_propose_competition_validation() {
    let t = setup();

    let mut too_many = vec![0; 101];
    too_many[0] = 100;
    let invalid = [
        config(too_many, 0, 600, 1200),
        config(vec![50, 25, 15, 0], 0, 600, 1200),
        // voting start at end
        config(vec![50, 25, 15, 10], 0, 1200, 1200),
        // start after voting start
        config(vec![50, 25, 15, 10], 600, 599, 1200),
        default_config().with_votes_per_voter(0),
    ];

    for config in invalid {
        let err = t
            .store
            .propose_competition(&t.accounts[0], config)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    assert_eq!(t.store.proposal_count(), 0);
    assert!(t.store.events().is_empty());
}

#[test]
fn test_suggest() {
    let t = setup();
    let proposal_id = propose(&t, default_config());
    let receipt = t
        .store
        .suggest(proposal_id, &t.accounts[0], ContentHash::of("suggestion"))
        .unwrap();

    assert_eq!(
        receipt.events,
        vec![CompetitionEvent::NewSuggestion {
            suggestion_id: SuggestionId::new(1)
        }]
    );
    let suggestion = t.store.suggestion(receipt.value).unwrap();
    assert_eq!(suggestion.proposal_id, proposal_id);
    assert_eq!(suggestion.total_votes, 0);
}

#[test]
fn test_cannot_suggest_before_start_time() {
    let t = setup();
    let proposal_id = propose(&t, config(vec![0, 50, 25, 25], 10, 600, 1200));

    let err = t
        .store
        .suggest(proposal_id, &t.accounts[0], ContentHash::of("suggestion"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timing);
    assert_eq!(t.store.suggestion_count(), 0);

    t.clock.advance(10 + 1);
    assert!(t
        .store
        .suggest(proposal_id, &t.accounts[0], ContentHash::of("suggestion"))
        .is_ok());
}

#[test]
fn test_cannot_suggest_after_competition_end() {
    let t = setup();
    let proposal_id = propose(&t, default_config());
    suggest(&t, proposal_id);

    t.clock.advance(1200 + 1);
    let err = t
        .store
        .suggest(proposal_id, &t.accounts[0], ContentHash::of("suggestion"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timing);
}

#[test]
fn test_vote() {
    let t = setup();
    let proposal_id = propose(&t, default_config());
    let suggestion_id = suggest(&t, proposal_id);
    let voter = &t.accounts[0];

    let err = t.store.vote(voter, suggestion_id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timing);

    t.clock.advance(650);

    let err = t
        .store
        .vote(voter, SuggestionId::new(suggestion_id.get() + 1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let snapshot = t.clock.block_height();
    let receipt = t.store.vote(voter, suggestion_id).unwrap();

    let err = t.store.vote(voter, suggestion_id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);

    assert_eq!(
        receipt.events,
        vec![
            CompetitionEvent::SnapshotBlock {
                proposal_id,
                snapshot_block: snapshot,
            },
            CompetitionEvent::NewVote {
                suggestion_id: SuggestionId::new(1),
                reputation: t.reputation[0],
            },
        ]
    );

    // Only the first vote sets the snapshot.
    t.clock.advance(30);
    let second = suggest(&t, proposal_id);
    t.store.vote(voter, second).unwrap();
    assert_eq!(
        t.store.proposal(proposal_id).unwrap().snapshot_block,
        Some(snapshot)
    );

    let third = suggest(&t, proposal_id);
    let fourth = suggest(&t, proposal_id);
    t.store.vote(voter, third).unwrap();

    let err = t.store.vote(voter, fourth).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BudgetExceeded);
    assert_eq!(t.store.votes_cast(proposal_id, voter), 3);
    assert_eq!(t.store.suggestion(fourth).unwrap().total_votes, 0);
}

#[test]
fn test_cannot_vote_after_competition_end() {
    let t = setup();
    let proposal_id = propose(&t, default_config());
    let suggestion_id = suggest(&t, proposal_id);

    t.clock.advance(1200);
    assert!(t.store.vote(&t.accounts[0], suggestion_id).is_ok());

    t.clock.advance(1);
    let err = t.store.vote(&t.accounts[1], suggestion_id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timing);
}

#[test]
fn test_total_votes() {
    let t = setup();
    let proposal_id = propose(&t, default_config());
    let suggestion_id = suggest(&t, proposal_id);
    t.clock.advance(650);

    for account in &t.accounts {
        t.store.vote(account, suggestion_id).unwrap();
    }

    let suggestion = t.store.suggestion(suggestion_id).unwrap();
    assert_eq!(suggestion.total_votes, t.reputation.iter().sum::<u128>());
    assert_eq!(suggestion.total_votes, 14000);
}

#[test]
fn test_ordered_index_of_suggestion() {
    let t = setup();
    let proposal_id = propose(&t, default_config());
    for _ in 0..20 {
        suggest(&t, proposal_id);
    }
    t.clock.advance(650);

    t.store.vote(&t.accounts[0], SuggestionId::new(10)).unwrap();
    t.store.vote(&t.accounts[2], SuggestionId::new(16)).unwrap();
    t.store.vote(&t.accounts[1], SuggestionId::new(5)).unwrap();

    let rank = |id| {
        t.store
            .ordered_index_of_suggestion(proposal_id, SuggestionId::new(id))
    };
    assert_eq!(rank(10), 2);
    assert_eq!(rank(5), 1);
    assert_eq!(rank(16), 0);
    assert_eq!(rank(1), 3);

    assert_eq!(
        t.store.winners(proposal_id),
        vec![
            SuggestionId::new(16),
            SuggestionId::new(5),
            SuggestionId::new(10)
        ]
    );
}

#[test]
fn test_ordered_index_of_suggestion_equality_case() {
    let t = setup();
    let proposal_id = propose(&t, default_config());
    for _ in 0..20 {
        suggest(&t, proposal_id);
    }
    t.clock.advance(650);

    let voter = &t.accounts[0];
    t.store.vote(voter, SuggestionId::new(10)).unwrap();
    t.store.vote(voter, SuggestionId::new(16)).unwrap();
    t.store.vote(voter, SuggestionId::new(5)).unwrap();

    let rank = |id| {
        t.store
            .ordered_index_of_suggestion(proposal_id, SuggestionId::new(id))
    };
    assert_eq!(rank(10), 0);
    assert_eq!(rank(16), 0);
    assert_eq!(rank(5), 0);
    // Never created: counts as unvoted.
    assert_eq!(rank(0), 3);
    assert_eq!(rank(999), 3);

    // Ties stay in the order they reached their weight.
    assert_eq!(
        t.store.winners(proposal_id),
        vec![
            SuggestionId::new(10),
            SuggestionId::new(16),
            SuggestionId::new(5)
        ]
    );
}

#[test]
fn test_reward_shares_after_close() {
    let t = setup();
    let proposal_id = propose(&t, default_config());
    let suggestions: Vec<_> = (0..5).map(|_| suggest(&t, proposal_id)).collect();
    t.clock.advance(650);

    // account2 (7000) > account1 (5000) > account0 (2000); two suggestions tie at 2000.
    t.store.vote(&t.accounts[2], suggestions[0]).unwrap();
    t.store.vote(&t.accounts[1], suggestions[1]).unwrap();
    t.store.vote(&t.accounts[0], suggestions[2]).unwrap();
    t.store.vote(&t.accounts[0], suggestions[3]).unwrap();

    let err = t.store.reward_share(proposal_id, suggestions[0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timing);

    t.clock.advance(600);
    let shares: Vec<_> = suggestions
        .iter()
        .map(|id| t.store.reward_share(proposal_id, *id).unwrap())
        .collect();

    assert_eq!(shares[0].points, 50);
    assert_eq!(shares[1].points, 25);
    // Ranks 2 and 3 shared by the tie.
    assert_eq!((shares[2].rank, shares[2].tied, shares[2].points), (2, 2, 25));
    assert_eq!(shares[3], shares[2]);
    assert!(!shares[4].is_winner());

    assert_eq!(shares[2].apply(1000), 125);
    assert_eq!(
        t.store.reward_amounts(proposal_id, suggestions[0]).unwrap(),
        vec![0, 1, 1]
    );
}
