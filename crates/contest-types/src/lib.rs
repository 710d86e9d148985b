//! Common types used throughout `contest`.
//!
//! This crate provides the identifiers and value types shared by the
//! competition engine and its command-line front end.

mod account;
mod hash;
mod id;

pub use account::AccountId;
pub use hash::ContentHash;
pub use id::{ProposalId, SuggestionId};

/// Aggregate reputation mass carried by votes.
pub type Weight = u128;

/// Chain height used as the snapshot reference for reputation lookups.
pub type BlockHeight = u64;

/// Absolute time in seconds since the Unix epoch.
pub type Timestamp = u64;

/// Maximum number of reward ranks a competition may define.
pub const MAX_WINNERS: usize = 100;

/// The reward split of a competition must add up to exactly this many percent.
pub const SPLIT_TOTAL: u64 = 100;

