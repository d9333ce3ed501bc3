//! Supervisor-assignment index over the stored PG accounts.
//!
//! The PG's `supervisor` field is the only stored edge. `subordinates_of` is a
//! live query, so a reassignment is visible to every later access check.
//! Changing an edge is an admin action and lands in the activity trail.
use crate::access::AccessService;
use crate::activity::{ActivityOp, NewActivity};
use crate::error::{RegistryError, RegistryResult};
use crate::store::RegistryStore;
use serde::Serialize;
use sims_authz::{Account, AccountId, AuthzError, Role, require_admin};
use std::sync::Arc;

/// Shape of the stored assignment graph, reported by [`AssignmentIndex::verify_forest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForestSummary {
    pub supervisors: usize,
    pub assigned_pgs: usize,
    pub unassigned_pgs: usize,
    /// PGs whose supervisor has been deactivated. They stay assigned.
    pub inactive_edges: usize,
}

#[derive(Clone)]
pub struct AssignmentIndex {
    store: Arc<dyn RegistryStore>,
    access: AccessService,
}

impl AssignmentIndex {
    pub fn new(store: Arc<dyn RegistryStore>, access: AccessService) -> Self {
        Self { store, access }
    }

    async fn require_admin(&self, actor_id: &AccountId) -> RegistryResult<()> {
        let actor = self.access.load_actor(Some(actor_id)).await?;
        Ok(require_admin(actor.as_ref()).into_result()?)
    }

    /// Point `pg_id` at `supervisor_id` on behalf of the admin `actor_id`.
    ///
    /// Repeating the same call is a no-op on the resulting subordinate sets.
    /// Concurrent reassignments of one PG resolve last-writer-wins; a write
    /// superseded before the read-back is logged, not reported as a failure.
    pub async fn assign(
        &self,
        actor_id: &AccountId,
        pg_id: &AccountId,
        supervisor_id: &AccountId,
    ) -> RegistryResult<Account> {
        self.require_admin(actor_id).await?;
        let updated = self.store.set_supervisor(pg_id, Some(supervisor_id)).await?;
        let subordinates = self.store.subordinates_of(supervisor_id).await?;
        if !subordinates.iter().any(|account| &account.id == pg_id) {
            tracing::warn!(
                pg = %pg_id,
                supervisor = %supervisor_id,
                "assignment superseded by a concurrent write"
            );
        }
        self.store
            .record_activity(
                NewActivity::new(Some(actor_id), ActivityOp::PgAssigned, pg_id)
                    .with_detail(supervisor_id.as_str()),
            )
            .await?;
        metrics::counter!("sims_assignments_total", "op" => "assign").increment(1);
        tracing::info!(
            actor = %actor_id,
            pg = %pg_id,
            supervisor = %supervisor_id,
            "pg assigned"
        );
        Ok(updated)
    }

    pub async fn unassign(&self, actor_id: &AccountId, pg_id: &AccountId) -> RegistryResult<Account> {
        self.require_admin(actor_id).await?;
        let updated = self.store.set_supervisor(pg_id, None).await?;
        self.store
            .record_activity(NewActivity::new(
                Some(actor_id),
                ActivityOp::PgUnassigned,
                pg_id,
            ))
            .await?;
        metrics::counter!("sims_assignments_total", "op" => "unassign").increment(1);
        tracing::info!(actor = %actor_id, pg = %pg_id, "pg unassigned");
        Ok(updated)
    }

    /// PGs currently assigned to `supervisor_id`, sorted by id.
    pub async fn subordinates_of(&self, supervisor_id: &AccountId) -> RegistryResult<Vec<Account>> {
        Ok(self.store.subordinates_of(supervisor_id).await?)
    }

    /// Check that every stored edge points at an existing supervisor account.
    pub async fn verify_forest(&self) -> RegistryResult<ForestSummary> {
        let accounts = self.store.list_accounts(None).await?;
        let mut summary = ForestSummary::default();
        for account in &accounts {
            match account.role() {
                Role::Supervisor => summary.supervisors += 1,
                Role::Pg => match account.supervisor_id() {
                    None => summary.unassigned_pgs += 1,
                    Some(supervisor_id) => {
                        let supervisor = accounts
                            .iter()
                            .find(|candidate| &candidate.id == supervisor_id)
                            .ok_or_else(|| {
                                AuthzError::InvalidAssignment(format!(
                                    "{} points at unknown supervisor {supervisor_id}",
                                    account.id
                                ))
                            })?;
                        if supervisor.role() != Role::Supervisor {
                            return Err(RegistryError::from(AuthzError::InvalidAssignment(
                                format!(
                                    "{} points at {supervisor_id} with role {}",
                                    account.id,
                                    supervisor.role()
                                ),
                            )));
                        }
                        if !supervisor.active {
                            tracing::warn!(
                                pg = %account.id,
                                supervisor = %supervisor_id,
                                "pg assigned to inactive supervisor"
                            );
                            summary.inactive_edges += 1;
                        }
                        summary.assigned_pgs += 1;
                    }
                },
                Role::Admin => {}
            }
        }
        tracing::debug!(?summary, "assignment forest verified");
        Ok(summary)
    }
}
