//! Visibility predicates for list requests.
//!
//! # Purpose
//! Narrows a listing to the records an actor is entitled to see, using the
//! same owner and current-supervisor relation as [`crate::authorize`].
//!
//! # Key invariants
//! - A scope admits a record iff `authorize(actor, view, record)` allows it.
//! - Visibility only widens with role: pg ⊆ supervisor ⊆ admin.
//! - Orphaned records are admitted by no scope.
use crate::resolver::active_actor;
use crate::{Account, AccountId, OwnedResource, ResourceKind, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "account", rename_all = "snake_case")]
pub enum ScopeRule {
    All,
    OwnedBy(AccountId),
    OwnedOrSupervisedBy(AccountId),
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleScope {
    pub kind: ResourceKind,
    pub rule: ScopeRule,
}

impl VisibleScope {
    /// Whether `resource` falls inside this scope. `owner` is the owner account
    /// as currently stored; the supervisor test reads its live supervisor field.
    pub fn admits(&self, resource: &OwnedResource, owner: Option<&Account>) -> bool {
        if resource.kind != self.kind {
            return false;
        }
        let Some(owner) = owner.filter(|owner| owner.id == resource.owner) else {
            return false;
        };
        match &self.rule {
            ScopeRule::All => true,
            ScopeRule::OwnedBy(actor) => resource.is_owned_by(actor),
            ScopeRule::OwnedOrSupervisedBy(actor) => {
                resource.is_owned_by(actor) || owner.is_supervised_by(actor)
            }
            ScopeRule::Nothing => false,
        }
    }
}

/// Build the listing predicate for `actor` over records of `kind`.
///
/// # Example
/// ```rust
/// use sims_authz::{Account, ResourceKind, ScopeRule, visible_scope};
///
/// let admin = Account::admin("root", "Root");
/// let scope = visible_scope(Some(&admin), ResourceKind::Rotation);
/// assert_eq!(scope.rule, ScopeRule::All);
/// assert_eq!(visible_scope(None, ResourceKind::Rotation).rule, ScopeRule::Nothing);
/// ```
pub fn visible_scope(actor: Option<&Account>, kind: ResourceKind) -> VisibleScope {
    let rule = match active_actor(actor) {
        Err(_) => ScopeRule::Nothing,
        Ok(actor) => match actor.role() {
            Role::Admin => ScopeRule::All,
            Role::Supervisor => ScopeRule::OwnedOrSupervisedBy(actor.id.clone()),
            Role::Pg => ScopeRule::OwnedBy(actor.id.clone()),
        },
    };
    VisibleScope { kind, rule }
}
