//! Strongly typed identifiers for accounts and training records.
//!
//! # Purpose
//! Wraps string identifiers so an account handle can never be passed where a
//! record id is expected, and vice versa.
//!
//! # How it fits
//! Accounts reference their supervisor by [`AccountId`]; records reference
//! their owner by [`AccountId`] and are addressed by [`ResourceId`].
//!
//! # Key invariants
//! - An [`AccountId`] is the account's unique login handle.
//! - Display and `as_str` return the original value unchanged.
//!
//! # Common pitfalls
//! - Constructing ids with empty strings; the directory rejects them on create.
use serde::{Deserialize, Serialize};

/// Account identifier wrapper.
///
/// # Example
/// ```rust
/// use sims_authz::AccountId;
///
/// let id = AccountId::new("carol");
/// assert_eq!(id.as_str(), "carol");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Construct a new account id wrapper.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the inner handle.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Training record identifier wrapper.
///
/// # Example
/// ```rust
/// use sims_authz::ResourceId;
///
/// let id = ResourceId::new("case-1");
/// assert_eq!(id.to_string(), "case-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Construct a new record id wrapper.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the inner id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
