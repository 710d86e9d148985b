//! In-memory storage and execution of competition operations.

use contest_types::{AccountId, BlockHeight, ContentHash, ProposalId, SuggestionId, Weight};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::ranking::{dense_rank, TopSuggestions};
use crate::vote::VoteBook;
use crate::{
    ChainContext, Competition, CompetitionConfig, CompetitionError, CompetitionEvent, Phase,
    Receipt, ReputationOracle, Result, RewardShare, Suggestion, VoteRecord,
};

/// Records owned by the store.
#[derive(Debug, Default)]
struct Ledger {
    /// Competitions indexed by id.
    proposals: HashMap<ProposalId, Competition>,
    /// Suggestions indexed by id.
    suggestions: HashMap<SuggestionId, Suggestion>,
    /// Suggestion ids of each competition, in submission order.
    proposal_suggestions: HashMap<ProposalId, Vec<SuggestionId>>,
    /// Best suggestions of each competition.
    top: HashMap<ProposalId, TopSuggestions>,
    /// Vote records and budgets.
    votes: VoteBook,
    /// Every event emitted so far.
    events: Vec<CompetitionEvent>,
    /// Last assigned competition id.
    last_proposal_id: u64,
    /// Last assigned suggestion id.
    last_suggestion_id: u64,
}

impl Ledger {
    fn totals_of(&self, proposal_id: ProposalId) -> impl Iterator<Item = Weight> + Clone + '_ {
        self.proposal_suggestions
            .get(&proposal_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.suggestions.get(id))
            .map(|s| s.total_votes)
    }

    fn suggestion_in(&self, proposal_id: ProposalId, suggestion_id: SuggestionId) -> Option<&Suggestion> {
        self.suggestions
            .get(&suggestion_id)
            .filter(|s| s.proposal_id == proposal_id)
    }

    fn proposal(&self, proposal_id: ProposalId) -> Result<&Competition> {
        self.proposals
            .get(&proposal_id)
            .ok_or(CompetitionError::ProposalNotFound { proposal_id })
    }
}

/// The ledger plus the flag marking an operation in progress.
#[derive(Debug, Default)]
struct Lane {
    ledger: RefCell<Ledger>,
    busy: Cell<bool>,
}

/// A mutating operation holding the lane.
///
/// Other threads wait on the lane until the operation is dropped. Calls made
/// on the same thread meanwhile (from inside the reputation oracle) find the
/// lane busy and are rejected.
struct Operation<'a> {
    lane: ReentrantMutexGuard<'a, Lane>,
}

impl Operation<'_> {
    fn ledger(&self) -> Ref<'_, Ledger> {
        self.lane.ledger.borrow()
    }

    fn ledger_mut(&self) -> RefMut<'_, Ledger> {
        self.lane.ledger.borrow_mut()
    }
}

impl Drop for Operation<'_> {
    fn drop(&mut self) {
        self.lane.busy.set(false);
    }
}

/// What a validated vote will write.
struct PendingVote {
    proposal_id: ProposalId,
    snapshot_block: BlockHeight,
    fixes_snapshot: bool,
    total_votes: Weight,
}

/// In-memory store for competitions.
///
/// Every mutating operation validates completely before writing anything,
/// so a rejected operation leaves no trace. Operations are serialized: one
/// completes before the next starts.
pub struct CompetitionStore {
    oracle: Arc<dyn ReputationOracle>,
    chain: Arc<dyn ChainContext>,
    lane: ReentrantMutex<Lane>,
}

impl CompetitionStore {
    /// Creates an empty store reading reputation from `oracle` and time from `chain`.
    pub fn new(oracle: Arc<dyn ReputationOracle>, chain: Arc<dyn ChainContext>) -> Self {
        Self {
            oracle,
            chain,
            lane: ReentrantMutex::new(Lane::default()),
        }
    }

    fn begin(&self) -> Result<Operation<'_>> {
        let lane = self.lane.lock();
        if lane.busy.replace(true) {
            return Err(CompetitionError::Reentrant);
        }
        Ok(Operation { lane })
    }

    fn read<T>(&self, f: impl FnOnce(&Ledger) -> T) -> T {
        let lane = self.lane.lock();
        let ledger = lane.ledger.borrow();
        f(&ledger)
    }

    // ==================== Competitions ====================

    /// Creates a competition.
    pub fn propose_competition(
        &self,
        proposer: &AccountId,
        config: CompetitionConfig,
    ) -> Result<Receipt<ProposalId>> {
        config.validate().inspect_err(|e| {
            debug!(proposer = %proposer, error = %e, "competition rejected");
        })?;

        let op = self.begin()?;
        let now = self.chain.now();
        let mut ledger = op.ledger_mut();

        ledger.last_proposal_id += 1;
        let id = ProposalId::new(ledger.last_proposal_id);
        let competition = Competition::new(id, proposer.clone(), config, now);

        let event = CompetitionEvent::NewCompetitionProposal {
            proposal_id: id,
            number_of_winners: competition.number_of_winners(),
            reward_split: competition.reward_split.clone(),
            start_time: competition.start_time,
            voting_start_time: competition.voting_start_time,
            end_time: competition.end_time,
            votes_per_voter: competition.votes_per_voter,
            beneficiary: competition.beneficiary.clone(),
        };

        info!(
            proposal_id = %id,
            proposer = %proposer,
            winners = competition.number_of_winners(),
            start_time = competition.start_time,
            voting_start_time = competition.voting_start_time,
            end_time = competition.end_time,
            "competition proposed"
        );

        ledger
            .top
            .insert(id, TopSuggestions::new(competition.number_of_winners()));
        ledger.proposal_suggestions.insert(id, Vec::new());
        ledger.proposals.insert(id, competition);
        ledger.events.push(event.clone());

        Ok(Receipt::new(id, vec![event]))
    }

    /// Gets a competition by id.
    pub fn proposal(&self, proposal_id: ProposalId) -> Option<Competition> {
        self.read(|ledger| ledger.proposals.get(&proposal_id).cloned())
    }

    /// Returns the lifecycle phase of a competition.
    pub fn phase(&self, proposal_id: ProposalId) -> Result<Phase> {
        let now = self.chain.now();
        self.read(|ledger| Ok(ledger.proposal(proposal_id)?.phase_at(now)))
    }

    /// Number of competitions created.
    pub fn proposal_count(&self) -> u64 {
        self.read(|ledger| ledger.last_proposal_id)
    }

    // ==================== Suggestions ====================

    /// Submits a suggestion to a competition.
    pub fn suggest(
        &self,
        proposal_id: ProposalId,
        suggester: &AccountId,
        description: ContentHash,
    ) -> Result<Receipt<SuggestionId>> {
        let op = self.begin()?;
        let now = self.chain.now();
        let mut ledger = op.ledger_mut();

        let proposal = ledger.proposal(proposal_id)?;
        if !proposal.accepts_suggestions(now) {
            let err = CompetitionError::SubmissionWindowClosed {
                proposal_id,
                now,
                start_time: proposal.start_time,
                end_time: proposal.end_time,
            };
            debug!(error = %err, "suggestion rejected");
            return Err(err);
        }

        ledger.last_suggestion_id += 1;
        let id = SuggestionId::new(ledger.last_suggestion_id);
        let suggestion = Suggestion::new(id, proposal_id, description, suggester.clone(), now);

        ledger.suggestions.insert(id, suggestion);
        ledger
            .proposal_suggestions
            .entry(proposal_id)
            .or_default()
            .push(id);

        let event = CompetitionEvent::NewSuggestion { suggestion_id: id };
        ledger.events.push(event.clone());

        debug!(proposal_id = %proposal_id, suggestion_id = %id, suggester = %suggester, "suggestion submitted");

        Ok(Receipt::new(id, vec![event]))
    }

    /// Gets a suggestion by id.
    pub fn suggestion(&self, suggestion_id: SuggestionId) -> Option<Suggestion> {
        self.read(|ledger| ledger.suggestions.get(&suggestion_id).cloned())
    }

    /// Lists the suggestions of a competition in submission order.
    pub fn suggestions_of(&self, proposal_id: ProposalId) -> Vec<Suggestion> {
        self.read(|ledger| {
            ledger
                .proposal_suggestions
                .get(&proposal_id)
                .into_iter()
                .flatten()
                .filter_map(|id| ledger.suggestions.get(id))
                .cloned()
                .collect()
        })
    }

    /// Number of suggestions submitted across all competitions.
    pub fn suggestion_count(&self) -> u64 {
        self.read(|ledger| ledger.last_suggestion_id)
    }

    // ==================== Votes ====================

    /// Casts a vote for a suggestion, returning the voter's weight.
    ///
    /// The first vote of a competition fixes its snapshot height; every vote
    /// weighs the voter's reputation at that height.
    pub fn vote(&self, voter: &AccountId, suggestion_id: SuggestionId) -> Result<Receipt<Weight>> {
        let op = self.begin()?;

        let pending = self
            .check_vote(&op.ledger(), voter, suggestion_id)
            .inspect_err(|e| debug!(voter = %voter, error = %e, "vote rejected"))?;

        // The oracle runs with no ledger borrow held; reentrant writes fail on the busy lane.
        let weight = self.oracle.balance_of(voter, pending.snapshot_block);
        let total_votes = pending
            .total_votes
            .checked_add(weight)
            .ok_or(CompetitionError::WeightOverflow { suggestion_id })?;

        let now = self.chain.now();
        let mut guard = op.ledger_mut();
        let ledger = &mut *guard;
        let mut events = Vec::with_capacity(2);

        if pending.fixes_snapshot {
            if let Some(proposal) = ledger.proposals.get_mut(&pending.proposal_id) {
                proposal.snapshot_block = Some(pending.snapshot_block);
            }
            debug!(
                proposal_id = %pending.proposal_id,
                snapshot_block = pending.snapshot_block,
                "snapshot fixed"
            );
            events.push(CompetitionEvent::SnapshotBlock {
                proposal_id: pending.proposal_id,
                snapshot_block: pending.snapshot_block,
            });
        }

        if let Some(suggestion) = ledger.suggestions.get_mut(&suggestion_id) {
            suggestion.total_votes = total_votes;
        }
        ledger.votes.record(
            pending.proposal_id,
            VoteRecord {
                suggestion_id,
                voter: voter.clone(),
                weight,
                snapshot_block: pending.snapshot_block,
                cast_at: now,
            },
        );
        if let Some(top) = ledger.top.get_mut(&pending.proposal_id) {
            top.update(suggestion_id, total_votes);
        }

        events.push(CompetitionEvent::NewVote {
            suggestion_id,
            reputation: weight,
        });
        ledger.events.extend(events.iter().cloned());

        debug!(
            voter = %voter,
            suggestion_id = %suggestion_id,
            weight,
            total_votes,
            "vote accepted"
        );

        Ok(Receipt::new(weight, events))
    }

    fn check_vote(
        &self,
        ledger: &Ledger,
        voter: &AccountId,
        suggestion_id: SuggestionId,
    ) -> Result<PendingVote> {
        let suggestion = ledger
            .suggestions
            .get(&suggestion_id)
            .ok_or(CompetitionError::SuggestionNotFound { suggestion_id })?;
        let proposal = ledger.proposal(suggestion.proposal_id)?;

        let now = self.chain.now();
        if !proposal.accepts_votes(now) {
            return Err(CompetitionError::VotingWindowClosed {
                proposal_id: proposal.id,
                now,
                voting_start_time: proposal.voting_start_time,
                end_time: proposal.end_time,
            });
        }

        if ledger.votes.has_voted(suggestion_id, voter) {
            return Err(CompetitionError::AlreadyVoted {
                voter: voter.clone(),
                suggestion_id,
            });
        }

        if ledger.votes.votes_cast(proposal.id, voter) >= proposal.votes_per_voter {
            return Err(CompetitionError::VoteBudgetExhausted {
                voter: voter.clone(),
                proposal_id: proposal.id,
                budget: proposal.votes_per_voter,
            });
        }

        let (snapshot_block, fixes_snapshot) = match proposal.snapshot_block {
            Some(height) => (height, false),
            None => (self.chain.block_height(), true),
        };

        Ok(PendingVote {
            proposal_id: proposal.id,
            snapshot_block,
            fixes_snapshot,
            total_votes: suggestion.total_votes,
        })
    }

    /// Returns true if `voter` voted for the suggestion.
    pub fn has_voted(&self, suggestion_id: SuggestionId, voter: &AccountId) -> bool {
        self.read(|ledger| ledger.votes.has_voted(suggestion_id, voter))
    }

    /// Number of votes `voter` cast in a competition.
    pub fn votes_cast(&self, proposal_id: ProposalId, voter: &AccountId) -> u32 {
        self.read(|ledger| ledger.votes.votes_cast(proposal_id, voter))
    }

    /// Gets the record of a vote.
    pub fn vote_record(&self, suggestion_id: SuggestionId, voter: &AccountId) -> Option<VoteRecord> {
        self.read(|ledger| ledger.votes.get(suggestion_id, voter).cloned())
    }

    /// Number of votes cast across all competitions.
    pub fn vote_count(&self) -> usize {
        self.read(|ledger| ledger.votes.len())
    }

    // ==================== Ranking ====================

    /// Dense rank of a suggestion within a competition.
    ///
    /// Counts the suggestions of the competition with strictly more votes.
    /// Unknown suggestions, and suggestions of other competitions, count as
    /// having no votes. Never fails.
    pub fn ordered_index_of_suggestion(
        &self,
        proposal_id: ProposalId,
        suggestion_id: SuggestionId,
    ) -> usize {
        self.read(|ledger| {
            let target = ledger
                .suggestion_in(proposal_id, suggestion_id)
                .map_or(0, |s| s.total_votes);
            dense_rank(ledger.totals_of(proposal_id), target)
        })
    }

    /// Current best suggestions of a competition, best first.
    ///
    /// At most as many as the competition has reward ranks.
    pub fn winners(&self, proposal_id: ProposalId) -> Vec<SuggestionId> {
        self.read(|ledger| {
            ledger
                .top
                .get(&proposal_id)
                .map(TopSuggestions::ids)
                .unwrap_or_default()
        })
    }

    /// Share of the rewards owed to a suggestion once the competition closed.
    pub fn reward_share(
        &self,
        proposal_id: ProposalId,
        suggestion_id: SuggestionId,
    ) -> Result<RewardShare> {
        let now = self.chain.now();
        self.read(|ledger| {
            let proposal = ledger.proposal(proposal_id)?;
            if !proposal.is_closed(now) {
                return Err(CompetitionError::CompetitionNotClosed {
                    proposal_id,
                    end_time: proposal.end_time,
                });
            }
            let suggestion = ledger
                .suggestion_in(proposal_id, suggestion_id)
                .ok_or(CompetitionError::SuggestionNotFound { suggestion_id })?;

            Ok(RewardShare::compute(
                &proposal.reward_split,
                ledger.totals_of(proposal_id),
                suggestion.total_votes,
            ))
        })
    }

    /// Amounts of each reward owed to a suggestion once the competition closed.
    pub fn reward_amounts(
        &self,
        proposal_id: ProposalId,
        suggestion_id: SuggestionId,
    ) -> Result<Vec<u128>> {
        let share = self.reward_share(proposal_id, suggestion_id)?;
        let rewards = self
            .proposal(proposal_id)
            .map(|p| p.rewards)
            .unwrap_or_default();
        Ok(rewards.into_iter().map(|amount| share.apply(amount)).collect())
    }

    // ==================== Events ====================

    /// Every event emitted so far, in order.
    pub fn events(&self) -> Vec<CompetitionEvent> {
        self.read(|ledger| ledger.events.clone())
    }
}
