//! Error types for competition operations.

use contest_types::{AccountId, ProposalId, SuggestionId, Timestamp};
use thiserror::Error;

/// A competition configuration rejected by `propose_competition`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The reward split has no entries or more than the maximum number of winners.
    #[error("reward split must have between 1 and {max} entries, got {len}")]
    RewardSplitLength { len: usize, max: usize },

    /// The reward split percentages do not add up to 100.
    #[error("reward split must sum to 100, got {sum}")]
    RewardSplitSum { sum: u64 },

    /// Suggestions would open after voting starts.
    #[error("start time {start_time} is after voting start time {voting_start_time}")]
    StartAfterVotingStart {
        start_time: Timestamp,
        voting_start_time: Timestamp,
    },

    /// The voting window would be empty.
    #[error("voting start time {voting_start_time} must be before end time {end_time}")]
    VotingStartNotBeforeEnd {
        voting_start_time: Timestamp,
        end_time: Timestamp,
    },

    /// Voters would not be allowed any vote.
    #[error("number of votes per voter must be positive")]
    ZeroVoteBudget,
}

/// Errors that can occur during competition operations.
#[derive(Debug, Error)]
pub enum CompetitionError {
    /// Invalid competition configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Competition not found.
    #[error("competition not found: {proposal_id}")]
    ProposalNotFound { proposal_id: ProposalId },

    /// Suggestion not found.
    #[error("suggestion not found: {suggestion_id}")]
    SuggestionNotFound { suggestion_id: SuggestionId },

    /// Suggestion submitted outside `[start_time, end_time]`.
    #[error("suggestions for {proposal_id} are accepted between {start_time} and {end_time}, now is {now}")]
    SubmissionWindowClosed {
        proposal_id: ProposalId,
        now: Timestamp,
        start_time: Timestamp,
        end_time: Timestamp,
    },

    /// Vote cast outside `[voting_start_time, end_time]`.
    #[error("votes for {proposal_id} are accepted between {voting_start_time} and {end_time}, now is {now}")]
    VotingWindowClosed {
        proposal_id: ProposalId,
        now: Timestamp,
        voting_start_time: Timestamp,
        end_time: Timestamp,
    },

    /// Reward shares were requested before the competition ended.
    #[error("competition {proposal_id} is still running until {end_time}")]
    CompetitionNotClosed {
        proposal_id: ProposalId,
        end_time: Timestamp,
    },

    /// The voter already voted for this suggestion.
    #[error("{voter} already voted for suggestion {suggestion_id}")]
    AlreadyVoted {
        voter: AccountId,
        suggestion_id: SuggestionId,
    },

    /// The voter used every vote the competition allows.
    #[error("{voter} used all {budget} votes in competition {proposal_id}")]
    VoteBudgetExhausted {
        voter: AccountId,
        proposal_id: ProposalId,
        budget: u32,
    },

    /// Adding the vote weight would overflow the suggestion total.
    #[error("vote weight overflows the total of suggestion {suggestion_id}")]
    WeightOverflow { suggestion_id: SuggestionId },

    /// A mutating call was made while another one was in progress on the same thread.
    #[error("reentrant call rejected while another operation is in progress")]
    Reentrant,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Broad classification of a [`CompetitionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The competition configuration is invalid.
    Configuration,
    /// The operation was attempted outside its time window.
    Timing,
    /// A referenced competition or suggestion does not exist.
    NotFound,
    /// The vote was already cast.
    Duplicate,
    /// The voter has no votes left.
    BudgetExceeded,
    /// Arithmetic overflow.
    Overflow,
    /// Reentrant invocation.
    Reentrancy,
    /// Encoding failure.
    Serialization,
}

impl CompetitionError {
    /// Returns the class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::SubmissionWindowClosed { .. }
            | Self::VotingWindowClosed { .. }
            | Self::CompetitionNotClosed { .. } => ErrorKind::Timing,
            Self::ProposalNotFound { .. } | Self::SuggestionNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::AlreadyVoted { .. } => ErrorKind::Duplicate,
            Self::VoteBudgetExhausted { .. } => ErrorKind::BudgetExceeded,
            Self::WeightOverflow { .. } => ErrorKind::Overflow,
            Self::Reentrant => ErrorKind::Reentrancy,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }
}
