//! Access decisions for training records.
//!
//! This module holds the role table. Every check is a pure function of the
//! actor's profile and active flag, the record's owner and status, and the
//! owner's current supervisor field. Nothing here performs I/O or logging;
//! callers load the accounts and record first and report the decision.
use crate::account::Profile;
use crate::{Account, Action, Decision, DenyReason, OwnedResource, ResourceKind};

/// What an action is aimed at.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// A resource class, for `create` and `list`.
    Kind(ResourceKind),
    /// A stored record together with its owner as currently stored.
    /// `owner` is `None` when the owner account no longer resolves.
    Record {
        resource: &'a OwnedResource,
        owner: Option<&'a Account>,
    },
    /// The record lookup found nothing.
    Missing,
}

impl<'a> Target<'a> {
    pub fn record(resource: &'a OwnedResource, owner: Option<&'a Account>) -> Self {
        Target::Record { resource, owner }
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Target::Kind(kind) => Some(*kind),
            Target::Record { resource, .. } => Some(resource.kind),
            Target::Missing => None,
        }
    }
}

/// How the actor relates to a record's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Owner,
    CurrentSupervisor,
    Unrelated,
}

impl Relation {
    fn of(actor: &Account, resource: &OwnedResource, owner: &Account) -> Self {
        if resource.is_owned_by(&actor.id) {
            Relation::Owner
        } else if owner.is_supervised_by(&actor.id) {
            Relation::CurrentSupervisor
        } else {
            Relation::Unrelated
        }
    }
}

/// Decide whether `actor` may perform `action` on `target`.
///
/// Checks run in a fixed order: authentication, active flag, target
/// resolution, then the role table. An inactive actor is therefore denied
/// `inactive_account` whatever the role or target.
///
/// # Example
/// ```rust
/// use sims_authz::{
///     Account, Action, Decision, DenyReason, OwnedResource, ResourceKind, Specialty, Target,
///     TrainingYear, authorize,
/// };
///
/// let carol = Account::supervisor("carol", "Carol", Specialty::Surgery);
/// let dave = Account::pg(
///     "dave",
///     "Dave",
///     Specialty::Surgery,
///     TrainingYear::new(1).unwrap(),
///     Some(carol.id.clone()),
/// );
/// let case = OwnedResource::draft("case-1", ResourceKind::ClinicalCase, "dave", "Sepsis");
///
/// let target = Target::record(&case, Some(&dave));
/// assert_eq!(authorize(Some(&carol), Action::View, target), Decision::Allow);
/// assert_eq!(
///     authorize(Some(&carol), Action::Edit, target),
///     Decision::Deny(DenyReason::WrongRole)
/// );
/// ```
pub fn authorize(actor: Option<&Account>, action: Action, target: Target<'_>) -> Decision {
    let actor = match active_actor(actor) {
        Ok(actor) => actor,
        Err(reason) => return Decision::Deny(reason),
    };

    if action.targets_kind() {
        return match target.kind() {
            Some(kind) => authorize_kind(actor, action, kind),
            None => Decision::Deny(DenyReason::ResourceNotFound),
        };
    }

    match target {
        Target::Record {
            resource,
            owner: Some(owner),
        } if owner.id == resource.owner => authorize_record(actor, action, resource, owner),
        // Orphaned records, missing records, and bare kinds for instance
        // actions all resolve to nothing the actor could act on.
        _ => Decision::Deny(DenyReason::ResourceNotFound),
    }
}

/// Gate for account-management operations.
pub fn require_admin(actor: Option<&Account>) -> Decision {
    match active_actor(actor) {
        Ok(actor) if matches!(actor.profile(), Profile::Admin) => Decision::Allow,
        Ok(_) => Decision::Deny(DenyReason::WrongRole),
        Err(reason) => Decision::Deny(reason),
    }
}

pub(crate) fn active_actor(actor: Option<&Account>) -> Result<&Account, DenyReason> {
    let actor = actor.ok_or(DenyReason::NotAuthenticated)?;
    if !actor.active {
        return Err(DenyReason::InactiveAccount);
    }
    Ok(actor)
}

fn authorize_kind(actor: &Account, action: Action, kind: ResourceKind) -> Decision {
    if action == Action::List {
        // Listing is open to every role; `visible_scope` narrows the rows.
        return Decision::Allow;
    }
    let allowed = match actor.profile() {
        Profile::Admin => true,
        Profile::Supervisor { .. } => kind.supervisor_administered(),
        Profile::Pg { .. } => kind.pg_authored(),
    };
    if allowed {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::WrongRole)
    }
}

fn authorize_record(
    actor: &Account,
    action: Action,
    resource: &OwnedResource,
    owner: &Account,
) -> Decision {
    let relation = Relation::of(actor, resource, owner);
    match actor.profile() {
        Profile::Admin => Decision::Allow,
        Profile::Supervisor { .. } => match (action, relation) {
            (Action::Create | Action::List, _) => authorize_kind(actor, action, resource.kind),
            (Action::View, Relation::Owner | Relation::CurrentSupervisor) => Decision::Allow,
            (Action::View, Relation::Unrelated) => {
                Decision::Deny(DenyReason::NotSupervisorOfOwner)
            }
            (Action::Review, Relation::CurrentSupervisor) => Decision::Allow,
            (Action::Review, _) => Decision::Deny(DenyReason::NotSupervisorOfOwner),
            (Action::Edit | Action::Delete, _) => Decision::Deny(DenyReason::WrongRole),
        },
        Profile::Pg { .. } => match (action, relation) {
            (Action::Create | Action::List, _) => authorize_kind(actor, action, resource.kind),
            (Action::Delete | Action::Review, _) => Decision::Deny(DenyReason::WrongRole),
            (Action::View, Relation::Owner) => Decision::Allow,
            (Action::Edit, Relation::Owner) if resource.status.is_editable() => Decision::Allow,
            (Action::Edit, Relation::Owner) => Decision::Deny(DenyReason::RecordLocked),
            (Action::View | Action::Edit, _) => Decision::Deny(DenyReason::NotOwner),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccountId, ResourceStatus, Specialty, TrainingYear};

    struct Fixture {
        admin: Account,
        carol: Account,
        frank: Account,
        dave: Account,
        erin: Account,
    }

    fn fixture() -> Fixture {
        let year = TrainingYear::new(2).expect("year");
        Fixture {
            admin: Account::admin("root", "Root"),
            carol: Account::supervisor("carol", "Carol", Specialty::Medicine),
            frank: Account::supervisor("frank", "Frank", Specialty::Medicine),
            dave: Account::pg(
                "dave",
                "Dave",
                Specialty::Medicine,
                year,
                Some(AccountId::new("carol")),
            ),
            erin: Account::pg(
                "erin",
                "Erin",
                Specialty::Medicine,
                year,
                Some(AccountId::new("frank")),
            ),
        }
    }

    fn case_of(owner: &Account) -> OwnedResource {
        OwnedResource::draft(
            format!("case-{}", owner.id),
            ResourceKind::ClinicalCase,
            owner.id.clone(),
            "Case",
        )
    }

    #[test]
    fn anonymous_and_inactive_actors_are_denied_first() {
        let f = fixture();
        let case = case_of(&f.dave);
        let target = Target::record(&case, Some(&f.dave));
        assert_eq!(
            authorize(None, Action::View, target),
            Decision::Deny(DenyReason::NotAuthenticated)
        );

        let mut admin = f.admin.clone();
        admin.deactivate();
        for action in Action::ALL {
            assert_eq!(
                authorize(Some(&admin), action, target),
                Decision::Deny(DenyReason::InactiveAccount)
            );
            assert_eq!(
                authorize(Some(&admin), action, Target::Missing),
                Decision::Deny(DenyReason::InactiveAccount)
            );
        }
    }

    #[test]
    fn admin_is_allowed_everything_on_resolvable_targets() {
        let f = fixture();
        let case = case_of(&f.dave).with_status(ResourceStatus::Approved);
        for action in Action::ALL {
            assert_eq!(
                authorize(Some(&f.admin), action, Target::record(&case, Some(&f.dave))),
                Decision::Allow
            );
        }
        assert_eq!(
            authorize(Some(&f.admin), Action::Create, Target::Kind(ResourceKind::Rotation)),
            Decision::Allow
        );
    }

    #[test]
    fn missing_and_orphaned_targets_are_not_found() {
        let f = fixture();
        let case = case_of(&f.dave);
        assert_eq!(
            authorize(Some(&f.admin), Action::View, Target::Missing),
            Decision::Deny(DenyReason::ResourceNotFound)
        );
        assert_eq!(
            authorize(Some(&f.admin), Action::View, Target::record(&case, None)),
            Decision::Deny(DenyReason::ResourceNotFound)
        );
        // Owner account that does not match the record's owner field.
        assert_eq!(
            authorize(Some(&f.admin), Action::View, Target::record(&case, Some(&f.erin))),
            Decision::Deny(DenyReason::ResourceNotFound)
        );
        assert_eq!(
            authorize(
                Some(&f.admin),
                Action::Edit,
                Target::Kind(ResourceKind::ClinicalCase)
            ),
            Decision::Deny(DenyReason::ResourceNotFound)
        );
        assert_eq!(
            authorize(Some(&f.dave), Action::Create, Target::Missing),
            Decision::Deny(DenyReason::ResourceNotFound)
        );
    }

    #[test]
    fn supervisor_rules_follow_current_assignment() {
        let f = fixture();
        let dave_case = case_of(&f.dave).with_status(ResourceStatus::Submitted);
        let erin_case = case_of(&f.erin).with_status(ResourceStatus::Submitted);
        let dave_target = Target::record(&dave_case, Some(&f.dave));
        let erin_target = Target::record(&erin_case, Some(&f.erin));

        assert_eq!(authorize(Some(&f.carol), Action::View, dave_target), Decision::Allow);
        assert_eq!(authorize(Some(&f.carol), Action::Review, dave_target), Decision::Allow);
        assert_eq!(
            authorize(Some(&f.carol), Action::Edit, dave_target),
            Decision::Deny(DenyReason::WrongRole)
        );
        assert_eq!(
            authorize(Some(&f.carol), Action::Delete, dave_target),
            Decision::Deny(DenyReason::WrongRole)
        );
        assert_eq!(
            authorize(Some(&f.carol), Action::View, erin_target),
            Decision::Deny(DenyReason::NotSupervisorOfOwner)
        );
        assert_eq!(
            authorize(Some(&f.carol), Action::Review, erin_target),
            Decision::Deny(DenyReason::NotSupervisorOfOwner)
        );

        let mut moved = f.dave.clone();
        moved.set_supervisor(Some(f.frank.id.clone())).expect("reassign");
        let moved_target = Target::record(&dave_case, Some(&moved));
        assert_eq!(
            authorize(Some(&f.carol), Action::View, moved_target),
            Decision::Deny(DenyReason::NotSupervisorOfOwner)
        );
        assert_eq!(authorize(Some(&f.frank), Action::View, moved_target), Decision::Allow);
    }

    #[test]
    fn supervisor_creates_only_administered_kinds() {
        let f = fixture();
        assert_eq!(
            authorize(Some(&f.carol), Action::Create, Target::Kind(ResourceKind::Rotation)),
            Decision::Allow
        );
        assert_eq!(
            authorize(
                Some(&f.carol),
                Action::Create,
                Target::Kind(ResourceKind::Certificate)
            ),
            Decision::Allow
        );
        assert_eq!(
            authorize(
                Some(&f.carol),
                Action::Create,
                Target::Kind(ResourceKind::LogbookEntry)
            ),
            Decision::Deny(DenyReason::WrongRole)
        );
    }

    #[test]
    fn pg_rules_cover_own_records_only() {
        let f = fixture();
        let own = case_of(&f.dave);
        let other = case_of(&f.erin);
        let own_target = Target::record(&own, Some(&f.dave));
        let other_target = Target::record(&other, Some(&f.erin));

        assert_eq!(authorize(Some(&f.dave), Action::View, own_target), Decision::Allow);
        assert_eq!(authorize(Some(&f.dave), Action::Edit, own_target), Decision::Allow);
        assert_eq!(
            authorize(Some(&f.dave), Action::Delete, own_target),
            Decision::Deny(DenyReason::WrongRole)
        );
        assert_eq!(
            authorize(Some(&f.dave), Action::Review, own_target),
            Decision::Deny(DenyReason::WrongRole)
        );
        assert_eq!(
            authorize(Some(&f.dave), Action::View, other_target),
            Decision::Deny(DenyReason::NotOwner)
        );
        assert_eq!(
            authorize(Some(&f.dave), Action::Edit, other_target),
            Decision::Deny(DenyReason::NotOwner)
        );
    }

    #[test]
    fn pg_edit_is_locked_outside_editable_statuses() {
        let f = fixture();
        for (status, expected) in [
            (ResourceStatus::Draft, Decision::Allow),
            (ResourceStatus::Returned, Decision::Allow),
            (ResourceStatus::Submitted, Decision::Deny(DenyReason::RecordLocked)),
            (ResourceStatus::Approved, Decision::Deny(DenyReason::RecordLocked)),
        ] {
            let record = case_of(&f.dave).with_status(status);
            assert_eq!(
                authorize(Some(&f.dave), Action::Edit, Target::record(&record, Some(&f.dave))),
                expected,
                "status {status}"
            );
        }
    }

    #[test]
    fn pg_creation_excludes_rotations() {
        let f = fixture();
        for kind in ResourceKind::ALL {
            let expected = if kind == ResourceKind::Rotation {
                Decision::Deny(DenyReason::WrongRole)
            } else {
                Decision::Allow
            };
            assert_eq!(
                authorize(Some(&f.dave), Action::Create, Target::Kind(kind)),
                expected
            );
        }
    }

    #[test]
    fn every_active_role_may_list() {
        let f = fixture();
        for actor in [&f.admin, &f.carol, &f.dave] {
            assert_eq!(
                authorize(Some(actor), Action::List, Target::Kind(ResourceKind::Certificate)),
                Decision::Allow
            );
        }
    }

    #[test]
    fn require_admin_gate() {
        let f = fixture();
        assert_eq!(require_admin(Some(&f.admin)), Decision::Allow);
        assert_eq!(
            require_admin(Some(&f.carol)),
            Decision::Deny(DenyReason::WrongRole)
        );
        assert_eq!(
            require_admin(None),
            Decision::Deny(DenyReason::NotAuthenticated)
        );
        let mut retired = f.admin.clone();
        retired.deactivate();
        assert_eq!(
            require_admin(Some(&retired)),
            Decision::Deny(DenyReason::InactiveAccount)
        );
    }
}
