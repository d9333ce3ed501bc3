//! In-memory implementation of the registry store.
//!
//! # Purpose
//! Implements [`RegistryStore`] with `HashMap`s guarded by
//! `tokio::sync::RwLock`. It backs local runs, the operator CLI, and tests.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - Writes to the account map are serialized, so an assignment is validated
//!   and applied under the same write guard. Concurrent `set_supervisor` calls
//!   for one PG resolve last-writer-wins.
//! - Accounts are never removed, and records are only accepted for existing
//!   PG accounts, so a stored record's owner always resolves to a PG.
//! - The activity trail is an unbounded append-only log; its `seq` is
//!   assigned under the log's write guard.
use super::{RegistryStore, StoreError, StoreResult};
use crate::activity::{ActivityEntry, NewActivity};
use async_trait::async_trait;
use sims_authz::{
    Account, AccountId, AuthzError, OwnedResource, ResourceId, ResourceKind, Role,
    validate_assignment,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct ActivityLog {
    next_seq: u64,
    items: Vec<ActivityEntry>,
}

impl ActivityLog {
    fn record(&mut self, activity: NewActivity) -> ActivityEntry {
        let entry = ActivityEntry::sequenced(self.next_seq, activity);
        self.next_seq += 1;
        self.items.push(entry.clone());
        entry
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
    resources: Arc<RwLock<HashMap<ResourceId, OwnedResource>>>,
    activity: Arc<RwLock<ActivityLog>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolve `supervisor_id` in `accounts` and check it may supervise `pg`.
fn check_edge(
    accounts: &HashMap<AccountId, Account>,
    pg: &Account,
    supervisor_id: &AccountId,
) -> StoreResult<()> {
    let supervisor = accounts.get(supervisor_id).ok_or_else(|| {
        AuthzError::InvalidAssignment(format!("unknown supervisor {supervisor_id}"))
    })?;
    validate_assignment(pg, supervisor)?;
    Ok(())
}

#[async_trait]
impl RegistryStore for InMemoryStore {
    async fn insert_account(&self, account: Account) -> StoreResult<Account> {
        account.validate()?;
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.id) {
            return Err(StoreError::Conflict(format!("account {} exists", account.id)));
        }
        if let Some(supervisor) = account.supervisor_id() {
            check_edge(&accounts, &account, supervisor)?;
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: &AccountId) -> StoreResult<Account> {
        self.accounts
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("account {id}")))
    }

    async fn list_accounts(&self, role: Option<Role>) -> StoreResult<Vec<Account>> {
        let accounts = self.accounts.read().await;
        let mut matching: Vec<Account> = accounts
            .values()
            .filter(|account| role.is_none_or(|role| account.role() == role))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matching)
    }

    async fn deactivate_account(&self, id: &AccountId) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("account {id}")))?;
        account.deactivate();
        Ok(account.clone())
    }

    async fn set_supervisor(
        &self,
        pg: &AccountId,
        supervisor: Option<&AccountId>,
    ) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().await;
        let Some(current) = accounts.get(pg) else {
            return Err(AuthzError::InvalidAssignment(format!("unknown pg {pg}")).into());
        };
        if let Some(supervisor) = supervisor {
            check_edge(&accounts, current, supervisor)?;
        }
        // Validate fully on a copy so the stored account only changes on success.
        let mut updated = current.clone();
        updated.set_supervisor(supervisor.cloned())?;
        accounts.insert(pg.clone(), updated.clone());
        Ok(updated)
    }

    async fn subordinates_of(&self, supervisor: &AccountId) -> StoreResult<Vec<Account>> {
        let accounts = self.accounts.read().await;
        let mut subordinates: Vec<Account> = accounts
            .values()
            .filter(|account| account.is_supervised_by(supervisor))
            .cloned()
            .collect();
        subordinates.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(subordinates)
    }

    async fn insert_resource(&self, resource: OwnedResource) -> StoreResult<OwnedResource> {
        match self.accounts.read().await.get(&resource.owner) {
            None => {
                return Err(StoreError::NotFound(format!(
                    "owner account {}",
                    resource.owner
                )));
            }
            Some(owner) if owner.role() != Role::Pg => {
                return Err(AuthzError::InvalidAccount(format!(
                    "records are owned by pg accounts, {} is {}",
                    owner.id,
                    owner.role()
                ))
                .into());
            }
            Some(_) => {}
        }
        let mut resources = self.resources.write().await;
        if resources.contains_key(&resource.id) {
            return Err(StoreError::Conflict(format!("record {} exists", resource.id)));
        }
        resources.insert(resource.id.clone(), resource.clone());
        Ok(resource)
    }

    async fn get_resource(&self, id: &ResourceId) -> StoreResult<OwnedResource> {
        self.resources
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("record {id}")))
    }

    async fn list_resources(&self, kind: ResourceKind) -> StoreResult<Vec<OwnedResource>> {
        let resources = self.resources.read().await;
        let mut matching: Vec<OwnedResource> = resources
            .values()
            .filter(|resource| resource.kind == kind)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matching)
    }

    async fn replace_resource(&self, resource: OwnedResource) -> StoreResult<OwnedResource> {
        let mut resources = self.resources.write().await;
        let stored = resources
            .get_mut(&resource.id)
            .ok_or_else(|| StoreError::NotFound(format!("record {}", resource.id)))?;
        if stored.owner != resource.owner || stored.kind != resource.kind {
            return Err(StoreError::Conflict(format!(
                "record {} owner and kind are immutable",
                resource.id
            )));
        }
        *stored = resource.clone();
        Ok(resource)
    }

    async fn record_activity(&self, activity: NewActivity) -> StoreResult<ActivityEntry> {
        Ok(self.activity.write().await.record(activity))
    }

    async fn list_activity(&self, target: Option<&str>) -> StoreResult<Vec<ActivityEntry>> {
        let log = self.activity.read().await;
        Ok(log
            .items
            .iter()
            .filter(|entry| target.is_none_or(|target| entry.target == target))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
