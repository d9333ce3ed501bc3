//! Who-changed-what trail for accounts, assignments, and records.
//!
//! # Key invariants
//! - Entries are append-only; `seq` is assigned by the store and strictly
//!   increases in write order.
//! - `actor` is `None` only for changes made by startup itself (seeding).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sims_authz::AccountId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityOp {
    AccountCreated,
    AccountDeactivated,
    PgAssigned,
    PgUnassigned,
    RecordCreated,
    RecordStatusChanged,
}

impl ActivityOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityOp::AccountCreated => "account_created",
            ActivityOp::AccountDeactivated => "account_deactivated",
            ActivityOp::PgAssigned => "pg_assigned",
            ActivityOp::PgUnassigned => "pg_unassigned",
            ActivityOp::RecordCreated => "record_created",
            ActivityOp::RecordStatusChanged => "record_status_changed",
        }
    }
}

impl std::fmt::Display for ActivityOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An activity before the store has sequenced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub actor: Option<AccountId>,
    pub op: ActivityOp,
    /// Id of the account or record that changed.
    pub target: String,
    pub detail: Option<String>,
}

impl NewActivity {
    pub fn new(actor: Option<&AccountId>, op: ActivityOp, target: impl std::fmt::Display) -> Self {
        Self {
            actor: actor.cloned(),
            op,
            target: target.to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub seq: u64,
    pub at: DateTime<Utc>,
    pub actor: Option<AccountId>,
    pub op: ActivityOp,
    pub target: String,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ActivityEntry {
    pub fn sequenced(seq: u64, activity: NewActivity) -> Self {
        Self {
            seq,
            at: Utc::now(),
            actor: activity.actor,
            op: activity.op,
            target: activity.target,
            detail: activity.detail,
        }
    }
}
