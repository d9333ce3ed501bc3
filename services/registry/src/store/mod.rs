//! Persistence seam for accounts and owned records.
//!
//! Every operation that must be atomic with its validation (supervisor
//! assignment, owner-preserving record replacement) lives behind this trait so
//! a backend can run the check and the write under one lock or transaction.
//! Records are only ever owned by PG accounts; backends reject anything else.
use crate::activity::{ActivityEntry, NewActivity};
use async_trait::async_trait;
use sims_authz::{
    Account, AccountId, AuthzError, OwnedResource, ResourceId, ResourceKind, Role,
};
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Rejected(#[from] AuthzError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait RegistryStore: Send + Sync {
    async fn insert_account(&self, account: Account) -> StoreResult<Account>;
    async fn get_account(&self, id: &AccountId) -> StoreResult<Account>;
    async fn list_accounts(&self, role: Option<Role>) -> StoreResult<Vec<Account>>;
    async fn deactivate_account(&self, id: &AccountId) -> StoreResult<Account>;

    /// Validate and rewrite the supervisor edge of `pg` in one step.
    ///
    /// `None` clears the edge. A rejected assignment leaves the stored account
    /// untouched.
    async fn set_supervisor(
        &self,
        pg: &AccountId,
        supervisor: Option<&AccountId>,
    ) -> StoreResult<Account>;
    /// PG accounts whose supervisor field currently names `supervisor`.
    async fn subordinates_of(&self, supervisor: &AccountId) -> StoreResult<Vec<Account>>;

    async fn insert_resource(&self, resource: OwnedResource) -> StoreResult<OwnedResource>;
    async fn get_resource(&self, id: &ResourceId) -> StoreResult<OwnedResource>;
    async fn list_resources(&self, kind: ResourceKind) -> StoreResult<Vec<OwnedResource>>;
    /// Replace a stored record. The owner is immutable.
    async fn replace_resource(&self, resource: OwnedResource) -> StoreResult<OwnedResource>;

    /// Append to the activity trail and return the sequenced entry.
    async fn record_activity(&self, activity: NewActivity) -> StoreResult<ActivityEntry>;
    /// Activity in write order, optionally narrowed to one target id.
    async fn list_activity(&self, target: Option<&str>) -> StoreResult<Vec<ActivityEntry>>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
