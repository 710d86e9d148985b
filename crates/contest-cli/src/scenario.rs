//! Scenario files describing a competition and the actions taken in it.
//!
//! ```yaml
//! start: 1700000000
//! reputation:
//!   alice: 2000
//!   bob: 5000
//! competition:
//!   proposer: alice
//!   description: Best logo
//!   reward_split: [50, 25, 15, 10]
//!   voting_start: 600
//!   end: 1200
//!   votes_per_voter: 3
//!   beneficiary: contribution-reward
//! steps:
//!   - action: suggest
//!     by: alice
//!     description: First logo
//!   - action: advance
//!     seconds: 650
//!   - action: vote
//!     by: bob
//!     suggestion: 1
//! ```

use contest_engine::CompetitionConfig;
use contest_types::{AccountId, ContentHash, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::commands::{CliError, Result};

fn default_block_time() -> u64 {
    15
}

/// Competition parameters; times are offsets in seconds from the scenario start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionSpec {
    /// Account proposing the competition.
    pub proposer: String,
    /// Description text, hashed before it reaches the engine.
    pub description: String,
    /// Percentage of the rewards for each rank.
    pub reward_split: Vec<u32>,
    /// Reward amounts.
    #[serde(default)]
    pub rewards: Vec<u128>,
    /// Token in which external rewards are paid.
    #[serde(default)]
    pub reward_token: String,
    /// Reputation change applied by the beneficiary.
    #[serde(default)]
    pub reputation_change: i64,
    /// Offset at which suggestions open.
    #[serde(default)]
    pub start: u64,
    /// Offset at which voting opens.
    pub voting_start: u64,
    /// Offset at which the competition ends.
    pub end: u64,
    /// Votes each voter may cast.
    pub votes_per_voter: u32,
    /// Scheme redeeming the rewards.
    pub beneficiary: String,
}

impl CompetitionSpec {
    /// Builds the engine configuration for a scenario starting at `start`.
    pub fn to_config(&self, start: Timestamp) -> Result<CompetitionConfig> {
        let at = |field: &str, offset: u64| {
            start.checked_add(offset).ok_or_else(|| {
                CliError::InvalidScenario(format!(
                    "competition.{field}: {start} + {offset} overflows"
                ))
            })
        };

        Ok(CompetitionConfig::new(
            ContentHash::of(&self.description),
            at("start", self.start)?,
            at("voting_start", self.voting_start)?,
            at("end", self.end)?,
            self.beneficiary.as_str(),
        )
        .with_reward_split(self.reward_split.clone())
        .with_rewards(self.rewards.clone(), self.reward_token.clone())
        .with_reputation_change(self.reputation_change)
        .with_votes_per_voter(self.votes_per_voter))
    }
}

/// One action of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Moves time forward.
    Advance { seconds: u64 },
    /// Submits a suggestion.
    Suggest { by: String, description: String },
    /// Votes for a suggestion.
    Vote { by: String, suggestion: u64 },
}

/// A complete scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Start time of the scenario.
    pub start: Timestamp,
    /// Seconds per block.
    #[serde(default = "default_block_time")]
    pub block_time: u64,
    /// Initial reputation balances.
    #[serde(default)]
    pub reputation: BTreeMap<String, u128>,
    /// The competition under test.
    pub competition: CompetitionSpec,
    /// Actions, in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parses a scenario from YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let scenario: Scenario =
            serde_yaml::from_str(content).map_err(|e| CliError::InvalidScenario(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Loads a scenario from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Checks the scenario before anything is executed.
    pub fn validate(&self) -> Result<()> {
        if self.block_time == 0 {
            return Err(CliError::InvalidScenario("block_time must be positive".into()));
        }

        self.competition.to_config(self.start)?;

        for (index, step) in self.steps.iter().enumerate() {
            if let Step::Suggest { by, .. } | Step::Vote { by, .. } = step {
                if by.is_empty() {
                    return Err(CliError::InvalidScenario(format!(
                        "step {}: account is empty",
                        index + 1
                    )));
                }
            }
        }

        Ok(())
    }

    /// Initial reputation as engine accounts.
    pub fn balances(&self) -> impl Iterator<Item = (AccountId, u128)> + '_ {
        self.reputation
            .iter()
            .map(|(account, amount)| (AccountId::new(account.as_str()), *amount))
    }
}
