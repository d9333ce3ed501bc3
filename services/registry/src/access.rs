//! Binds the pure resolver to stored state for one request.
//!
//! # Purpose
//! Loads the actor, the record, and the record owner as they are stored right
//! now, then asks [`sims_authz::authorize`] or [`sims_authz::visible_scope`].
//! Loading everything in the same request keeps current-supervisor semantics:
//! a reassignment is honored by the very next check.
//!
//! # Observability
//! The resolver has no side effects. Denials are reported here, at `debug`,
//! and counted in `sims_access_denied_total` by reason.
use crate::error::RegistryResult;
use crate::store::{RegistryStore, StoreError};
use sims_authz::{
    Account, AccountId, Action, AuthzError, Decision, OwnedResource, ResourceId, ResourceKind,
    Target, authorize, visible_scope,
};
use std::collections::HashMap;
use std::sync::Arc;

/// A request target named by id rather than by loaded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    Kind(ResourceKind),
    Record(ResourceId),
}

#[derive(Clone)]
pub struct AccessService {
    store: Arc<dyn RegistryStore>,
}

impl AccessService {
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Load an account, treating an unknown id as an anonymous caller.
    pub(crate) async fn load_actor(
        &self,
        actor_id: Option<&AccountId>,
    ) -> RegistryResult<Option<Account>> {
        let Some(actor_id) = actor_id else {
            return Ok(None);
        };
        match self.store.get_account(actor_id).await {
            Ok(actor) => Ok(Some(actor)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn load_record(
        &self,
        id: &ResourceId,
    ) -> RegistryResult<Option<(OwnedResource, Option<Account>)>> {
        let resource = match self.store.get_resource(id).await {
            Ok(resource) => resource,
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let owner = match self.store.get_account(&resource.owner).await {
            Ok(owner) => Some(owner),
            Err(StoreError::NotFound(_)) => None,
            Err(err) => return Err(err.into()),
        };
        Ok(Some((resource, owner)))
    }

    /// Build a target from an optional kind and an optional record id.
    ///
    /// A record wins over a kind. When both are given the stored record must
    /// be of that kind; a record that does not exist is left for the resolver
    /// to report as not found.
    pub async fn target_for(
        &self,
        kind: Option<ResourceKind>,
        record: Option<ResourceId>,
    ) -> RegistryResult<TargetRef> {
        match (kind, record) {
            (Some(kind), Some(id)) => {
                if let Some((resource, _)) = self.load_record(&id).await? {
                    if resource.kind != kind {
                        return Err(AuthzError::InvalidKind(format!(
                            "{id} is a {}, not a {kind}",
                            resource.kind
                        ))
                        .into());
                    }
                }
                Ok(TargetRef::Record(id))
            }
            (None, Some(id)) => Ok(TargetRef::Record(id)),
            (Some(kind), None) => Ok(TargetRef::Kind(kind)),
            (None, None) => Err(AuthzError::InvalidKind(
                "a kind or a record is required".to_string(),
            )
            .into()),
        }
    }

    pub async fn authorize(
        &self,
        actor_id: Option<&AccountId>,
        action: Action,
        target: &TargetRef,
    ) -> RegistryResult<Decision> {
        let actor = self.load_actor(actor_id).await?;
        let decision = match target {
            TargetRef::Kind(kind) => authorize(actor.as_ref(), action, Target::Kind(*kind)),
            TargetRef::Record(id) => match self.load_record(id).await? {
                Some((resource, owner)) => authorize(
                    actor.as_ref(),
                    action,
                    Target::record(&resource, owner.as_ref()),
                ),
                None => authorize(actor.as_ref(), action, Target::Missing),
            },
        };
        report(actor_id, action, target, decision);
        Ok(decision)
    }

    /// Like [`AccessService::authorize`], but a denial becomes
    /// [`crate::RegistryError::Denied`].
    pub async fn require(
        &self,
        actor_id: Option<&AccountId>,
        action: Action,
        target: &TargetRef,
    ) -> RegistryResult<()> {
        Ok(self
            .authorize(actor_id, action, target)
            .await?
            .into_result()?)
    }

    /// Records of `kind` the actor may view, sorted by id.
    ///
    /// The `list` action is checked first, so anonymous and inactive callers
    /// get a denial rather than an empty page.
    pub async fn list_visible(
        &self,
        actor_id: Option<&AccountId>,
        kind: ResourceKind,
    ) -> RegistryResult<Vec<OwnedResource>> {
        let actor = self.load_actor(actor_id).await?;
        let decision = authorize(actor.as_ref(), Action::List, Target::Kind(kind));
        report(actor_id, Action::List, &TargetRef::Kind(kind), decision);
        decision.into_result()?;

        let scope = visible_scope(actor.as_ref(), kind);
        let owners: HashMap<AccountId, Account> = self
            .store
            .list_accounts(None)
            .await?
            .into_iter()
            .map(|account| (account.id.clone(), account))
            .collect();
        let visible = self
            .store
            .list_resources(kind)
            .await?
            .into_iter()
            .filter(|resource| scope.admits(resource, owners.get(&resource.owner)))
            .collect();
        Ok(visible)
    }
}

fn report(actor_id: Option<&AccountId>, action: Action, target: &TargetRef, decision: Decision) {
    let Some(reason) = decision.reason() else {
        return;
    };
    tracing::debug!(
        actor = actor_id.map(AccountId::as_str).unwrap_or("anonymous"),
        action = %action,
        ?target,
        reason = %reason,
        "access denied"
    );
    metrics::counter!("sims_access_denied_total", "reason" => reason.as_str()).increment(1);
}
