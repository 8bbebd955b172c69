//! Opaque account identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an account as seen by the engine.
///
/// The engine never interprets the contents — identities are assigned by
/// the host (an address, a public key hash, a test label). Participants,
/// the engine's own vault, the beneficiary and the owner are all
/// `AccountId`s on the external asset ledgers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account identity from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
