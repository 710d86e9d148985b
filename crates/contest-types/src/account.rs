//! Account references for proposers, suggesters and voters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account taking part in a competition.
///
/// The engine treats the value as opaque; callers typically use a hex
/// encoded public key or a human readable handle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Creates an account reference.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the account as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_creation() {
        let account = AccountId::new("alice");
        assert_eq!(account.as_str(), "alice");
        assert_eq!(account, AccountId::from("alice"));
        assert_eq!(account.to_string(), "alice");
    }
}
