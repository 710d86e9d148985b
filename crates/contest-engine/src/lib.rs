//! Reputation-weighted ranked-choice competitions.
//!
//! Stakeholders open a competition with a bounded reward split, submit
//! suggestions while it runs, and vote for suggestions during its voting
//! window. Each vote weighs the voter's reputation at the snapshot height
//! fixed by the competition's first vote, and each voter may vote for a
//! limited number of suggestions. Once the competition closes, the dense rank
//! of each suggestion decides its share of the rewards.

mod chain;
mod config;
mod error;
mod event;
mod oracle;
mod proposal;
pub mod ranking;
mod reward;
mod store;
mod suggestion;
mod vote;

pub use chain::{ChainContext, ManualClock};
pub use config::CompetitionConfig;
pub use error::{CompetitionError, ConfigError, ErrorKind};
pub use event::{CompetitionEvent, Receipt};
pub use oracle::{ReputationOracle, SnapshotReputation};
pub use proposal::{Competition, Phase};
pub use ranking::{RankedSuggestion, TopSuggestions};
pub use reward::RewardShare;
pub use store::CompetitionStore;
pub use suggestion::Suggestion;
pub use vote::VoteRecord;

/// Result type for competition operations.
pub type Result<T> = std::result::Result<T, CompetitionError>;
