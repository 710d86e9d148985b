//! CLI command implementations.

use contest_engine::{
    CompetitionError, CompetitionEvent, CompetitionStore, ManualClock, Phase, SnapshotReputation,
};
use contest_types::{AccountId, ContentHash, ProposalId, SuggestionId};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::scenario::{Scenario, Step};

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error(transparent)]
    Engine(#[from] CompetitionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("step {step} rejected: {source}")]
    Rejected {
        step: usize,
        #[source]
        source: CompetitionError,
    },
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Outcome of one scenario step.
#[derive(Debug)]
pub struct StepOutcome {
    /// One-based position of the step.
    pub step: usize,
    /// Events the step emitted.
    pub events: Vec<CompetitionEvent>,
    /// Why the engine rejected the step, if it did.
    pub rejection: Option<CompetitionError>,
}

/// Final position of a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub suggestion_id: SuggestionId,
    pub suggester: AccountId,
    pub total_votes: u128,
    pub rank: usize,
    /// Reward amounts, once the competition closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards: Option<Vec<u128>>,
}

/// A scenario played against a fresh engine.
pub struct Replay {
    pub store: CompetitionStore,
    pub proposal_id: ProposalId,
    pub proposal_events: Vec<CompetitionEvent>,
    pub outcomes: Vec<StepOutcome>,
}

impl Replay {
    /// Number of steps the engine rejected.
    pub fn rejected(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.rejection.is_some())
            .count()
    }

    /// Suggestions ordered by rank, then by id.
    pub fn standings(&self) -> Result<Vec<Standing>> {
        let closed = self.store.phase(self.proposal_id)? == Phase::Closed;
        let mut standings = Vec::new();

        for suggestion in self.store.suggestions_of(self.proposal_id) {
            let rewards = if closed {
                Some(self.store.reward_amounts(self.proposal_id, suggestion.id)?)
            } else {
                None
            };
            standings.push(Standing {
                rank: self
                    .store
                    .ordered_index_of_suggestion(self.proposal_id, suggestion.id),
                suggestion_id: suggestion.id,
                suggester: suggestion.suggester,
                total_votes: suggestion.total_votes,
                rewards,
            });
        }

        standings.sort_by_key(|s| (s.rank, s.suggestion_id));
        Ok(standings)
    }
}

/// Plays a scenario. With `strict`, the first rejected step aborts the run.
pub fn run(scenario: &Scenario, strict: bool) -> Result<Replay> {
    let clock = Arc::new(ManualClock::with_block_time(
        scenario.start,
        scenario.block_time,
    ));
    let reputation = Arc::new(SnapshotReputation::with_balances(scenario.balances()));
    let store = CompetitionStore::new(reputation, clock.clone());

    let proposer = AccountId::new(scenario.competition.proposer.as_str());
    let receipt = store.propose_competition(
        &proposer,
        scenario.competition.to_config(scenario.start)?,
    )?;
    let proposal_id = receipt.value;
    tracing::info!(%proposal_id, steps = scenario.steps.len(), "Replaying scenario");

    let mut outcomes = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let step_number = index + 1;
        let result = match step {
            Step::Advance { seconds } => {
                clock.advance(*seconds);
                Ok(Vec::new())
            }
            Step::Suggest { by, description } => store
                .suggest(
                    proposal_id,
                    &AccountId::new(by.as_str()),
                    ContentHash::of(description),
                )
                .map(|r| r.events),
            Step::Vote { by, suggestion } => store
                .vote(&AccountId::new(by.as_str()), SuggestionId::new(*suggestion))
                .map(|r| r.events),
        };

        let outcome = match result {
            Ok(events) => StepOutcome {
                step: step_number,
                events,
                rejection: None,
            },
            Err(e) if strict => {
                return Err(CliError::Rejected {
                    step: step_number,
                    source: e,
                })
            }
            Err(e) => {
                tracing::warn!(step = step_number, error = %e, "Step rejected");
                StepOutcome {
                    step: step_number,
                    events: Vec::new(),
                    rejection: Some(e),
                }
            }
        };
        outcomes.push(outcome);
    }

    Ok(Replay {
        store,
        proposal_id,
        proposal_events: receipt.events,
        outcomes,
    })
}

/// Validate a scenario without running it.
pub fn check(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let config = scenario.competition.to_config(scenario.start)?;
    config.validate().map_err(CompetitionError::from)?;

    println!("Scenario OK: {}", path.display());
    println!("  Winners:      {}", config.number_of_winners());
    println!("  Reward split: {:?}", config.reward_split);
    println!(
        "  Voting:       {} .. {}",
        config.voting_start_time, config.end_time
    );
    println!("  Accounts:     {}", scenario.reputation.len());
    println!("  Steps:        {}", scenario.steps.len());

    Ok(())
}

/// Replay a scenario and print its events and final standings.
pub fn replay(path: &Path, json: bool, strict: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let replay = run(&scenario, strict)?;
    let standings = replay.standings()?;

    if json {
        for event in &replay.proposal_events {
            println!("{}", event.to_json()?);
        }
        for outcome in &replay.outcomes {
            for event in &outcome.events {
                println!("{}", event.to_json()?);
            }
        }
        for standing in &standings {
            println!("{}", serde_json::to_string(standing)?);
        }
        return Ok(());
    }

    println!("Competition {}", replay.proposal_id);
    for outcome in &replay.outcomes {
        match &outcome.rejection {
            Some(e) => println!("  step {:>3}: rejected ({e})", outcome.step),
            None if outcome.events.is_empty() => {}
            None => {
                let names: Vec<_> = outcome.events.iter().map(|e| e.name()).collect();
                println!("  step {:>3}: {}", outcome.step, names.join(", "));
            }
        }
    }

    println!();
    println!("{:<6} {:<12} {:<16} {:>12}  rewards", "rank", "suggestion", "suggester", "votes");
    for standing in &standings {
        let rewards = standing
            .rewards
            .as_ref()
            .map(|r| format!("{r:?}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<12} {:<16} {:>12}  {}",
            standing.rank,
            standing.suggestion_id.to_string(),
            standing.suggester.as_str(),
            standing.total_votes,
            rewards
        );
    }

    if replay.rejected() > 0 {
        println!();
        println!("{} step(s) rejected", replay.rejected());
    }

    Ok(())
}
