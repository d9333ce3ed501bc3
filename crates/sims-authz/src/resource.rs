//! Owned training records and their review lifecycle.
//!
//! # Purpose
//! Generalizes clinical cases, logbook entries, certificates, and rotations
//! into one record shape with a single owner and a shared status machine.
//!
//! # How it fits
//! The resolver only looks at `owner` and `status`; the review workflow in the
//! registry service drives `status` through [`ResourceStatus::can_transition_to`].
//!
//! # Key invariants
//! - Every record has exactly one owner, fixed at creation.
//! - Records are editable by their owner only while `draft` or `returned`.
//! - Only `submitted` records can be reviewed.
//!
//! # Examples
//! ```rust
//! use sims_authz::{ResourceKind, ResourceStatus};
//!
//! assert_eq!(ResourceKind::LogbookEntry.as_str(), "logbook_entry");
//! assert!(ResourceStatus::Draft.can_transition_to(ResourceStatus::Submitted));
//! assert!(!ResourceStatus::Approved.is_editable());
//! ```
use crate::{AccountId, AuthzError, ResourceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    ClinicalCase,
    LogbookEntry,
    Certificate,
    Rotation,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::ClinicalCase,
        ResourceKind::LogbookEntry,
        ResourceKind::Certificate,
        ResourceKind::Rotation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::ClinicalCase => "clinical_case",
            ResourceKind::LogbookEntry => "logbook_entry",
            ResourceKind::Certificate => "certificate",
            ResourceKind::Rotation => "rotation",
        }
    }

    /// Kinds a supervisor may create on behalf of their PGs.
    pub fn supervisor_administered(self) -> bool {
        matches!(self, ResourceKind::Certificate | ResourceKind::Rotation)
    }

    /// Kinds a PG may create for themselves.
    pub fn pg_authored(self) -> bool {
        !matches!(self, ResourceKind::Rotation)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "clinical_case" => Ok(ResourceKind::ClinicalCase),
            "logbook_entry" => Ok(ResourceKind::LogbookEntry),
            "certificate" => Ok(ResourceKind::Certificate),
            "rotation" => Ok(ResourceKind::Rotation),
            _ => Err(AuthzError::InvalidKind(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    #[default]
    Draft,
    Submitted,
    Returned,
    Approved,
    Rejected,
    Archived,
}

impl ResourceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceStatus::Draft => "draft",
            ResourceStatus::Submitted => "submitted",
            ResourceStatus::Returned => "returned",
            ResourceStatus::Approved => "approved",
            ResourceStatus::Rejected => "rejected",
            ResourceStatus::Archived => "archived",
        }
    }

    pub fn is_editable(self) -> bool {
        matches!(self, ResourceStatus::Draft | ResourceStatus::Returned)
    }

    pub fn is_reviewable(self) -> bool {
        self == ResourceStatus::Submitted
    }

    pub fn can_transition_to(self, next: ResourceStatus) -> bool {
        use ResourceStatus::*;
        match (self, next) {
            (Draft | Returned, Submitted) => true,
            (Submitted, Approved | Returned | Rejected) => true,
            (Archived, _) => false,
            (_, Archived) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceStatus {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(ResourceStatus::Draft),
            "submitted" => Ok(ResourceStatus::Submitted),
            "returned" => Ok(ResourceStatus::Returned),
            "approved" => Ok(ResourceStatus::Approved),
            "rejected" => Ok(ResourceStatus::Rejected),
            "archived" => Ok(ResourceStatus::Archived),
            _ => Err(AuthzError::InvalidStatus(value.to_string())),
        }
    }
}

/// A training record owned by exactly one PG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedResource {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub owner: AccountId,
    pub title: String,
    #[serde(default)]
    pub status: ResourceStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewed_by: Option<AccountId>,
}

impl OwnedResource {
    /// New draft record created now.
    pub fn draft(
        id: impl Into<ResourceId>,
        kind: ResourceKind,
        owner: impl Into<AccountId>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            owner: owner.into(),
            title: title.into(),
            status: ResourceStatus::Draft,
            created_at: Utc::now(),
            submitted_at: None,
            reviewed_at: None,
            reviewed_by: None,
        }
    }

    pub fn with_status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_owned_by(&self, account: &AccountId) -> bool {
        &self.owner == account
    }
}
