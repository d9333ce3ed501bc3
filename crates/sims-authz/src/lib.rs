//! SIMS access policy shared by the registry service and its callers.
//!
//! # Purpose
//! Centralizes the role model (admin, supervisor, pg), the supervisor
//! assignment rules, and the decision table that says which account may view,
//! create, edit, delete, review, or list training records.
//!
//! # How it fits
//! The registry service loads accounts and records from its store and hands
//! them to [`authorize`] and [`visible_scope`]. This crate never performs I/O,
//! so the same decisions can be evaluated anywhere.
//!
//! # Key invariants
//! - Roles are a closed variant; an account's role never changes.
//! - Visibility follows the owner's current supervisor, not a snapshot.
//! - Inactive accounts are denied before any role rule is consulted.
//!
//! # Examples
//! ```rust
//! use sims_authz::{Account, Action, Decision, DenyReason, ResourceKind, Target, authorize};
//!
//! let admin = Account::admin("root", "Root");
//! let decision = authorize(Some(&admin), Action::Create, Target::Kind(ResourceKind::Rotation));
//! assert_eq!(decision, Decision::Allow);
//! assert_eq!(
//!     authorize(None, Action::List, Target::Kind(ResourceKind::Rotation)),
//!     Decision::Deny(DenyReason::NotAuthenticated)
//! );
//! ```
//!
//! # Common pitfalls
//! - Passing a stale owner account to [`Target::record`] reintroduces snapshot
//!   semantics; always load the owner in the same request.

mod account;
mod action;
mod assignment;
mod decision;
mod errors;
mod resolver;
mod resource;
mod role;
mod scope;
mod types;

pub use account::{Account, Profile, Specialty, TrainingYear};
pub use action::Action;
pub use assignment::validate_assignment;
pub use decision::{Decision, DenyReason, Outcome};
pub use errors::{AuthzError, AuthzResult};
pub use resolver::{Target, authorize, require_admin};
pub use resource::{OwnedResource, ResourceKind, ResourceStatus};
pub use role::Role;
pub use scope::{ScopeRule, VisibleScope, visible_scope};
pub use types::{AccountId, ResourceId};
