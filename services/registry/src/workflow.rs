//! Record creation and the submit/review lifecycle.
//!
//! Every step asks [`AccessService`] first and only then checks the status
//! machine, so a caller without rights learns nothing about record state.
use crate::access::{AccessService, TargetRef};
use crate::activity::{ActivityOp, NewActivity};
use crate::error::{RegistryError, RegistryResult};
use crate::store::RegistryStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sims_authz::{
    AccountId, Action, AuthzError, OwnedResource, ResourceId, ResourceKind, ResourceStatus, Role,
};
use std::sync::Arc;

/// Supervisor verdict on a submitted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Approve,
    Return,
    Reject,
}

impl ReviewOutcome {
    pub fn status(self) -> ResourceStatus {
        match self {
            ReviewOutcome::Approve => ResourceStatus::Approved,
            ReviewOutcome::Return => ResourceStatus::Returned,
            ReviewOutcome::Reject => ResourceStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewRecord {
    pub kind: ResourceKind,
    pub title: String,
    /// PG that will own the record. Defaults to the acting account.
    pub owner: Option<AccountId>,
}

impl NewRecord {
    pub fn new(kind: ResourceKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            owner: None,
        }
    }

    pub fn owned_by(mut self, owner: impl Into<AccountId>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

#[derive(Clone)]
pub struct ReviewWorkflow {
    store: Arc<dyn RegistryStore>,
    access: AccessService,
}

impl ReviewWorkflow {
    pub fn new(store: Arc<dyn RegistryStore>, access: AccessService) -> Self {
        Self { store, access }
    }

    /// Create a draft record.
    ///
    /// Admins may create for any PG and supervisors for their current
    /// subordinates; a PG always owns what it creates.
    pub async fn create_record(
        &self,
        actor_id: &AccountId,
        new: NewRecord,
    ) -> RegistryResult<OwnedResource> {
        self.access
            .require(Some(actor_id), Action::Create, &TargetRef::Kind(new.kind))
            .await?;
        let owner_id = new.owner.unwrap_or_else(|| actor_id.clone());
        let owner = self.store.get_account(&owner_id).await?;
        if owner.role() != Role::Pg {
            return Err(AuthzError::InvalidAccount(format!(
                "records are owned by pg accounts, {owner_id} is {}",
                owner.role()
            ))
            .into());
        }
        if &owner_id != actor_id {
            let actor = self.store.get_account(actor_id).await?;
            match actor.role() {
                Role::Admin => {}
                Role::Supervisor if owner.is_supervised_by(actor_id) => {}
                Role::Supervisor => return Err(AuthzError::NotSupervisorOfOwner.into()),
                Role::Pg => return Err(AuthzError::NotOwner.into()),
            }
        }

        let id = format!("{}-{}", new.kind, uuid::Uuid::new_v4());
        let record = self
            .store
            .insert_resource(OwnedResource::draft(id, new.kind, owner_id, new.title))
            .await?;
        self.store
            .record_activity(
                NewActivity::new(Some(actor_id), ActivityOp::RecordCreated, &record.id)
                    .with_detail(record.kind.as_str()),
            )
            .await?;
        tracing::info!(
            actor = %actor_id,
            record = %record.id,
            kind = %record.kind,
            owner = %record.owner,
            "record created"
        );
        Ok(record)
    }

    /// Submit a draft or returned record for review by the owner's supervisor.
    pub async fn submit(&self, actor_id: &AccountId, id: &ResourceId) -> RegistryResult<OwnedResource> {
        self.access
            .require(Some(actor_id), Action::Edit, &TargetRef::Record(id.clone()))
            .await?;
        let record = self.store.get_resource(id).await?;
        if !record.is_owned_by(actor_id) {
            return Err(AuthzError::NotOwner.into());
        }
        let owner = self.store.get_account(&record.owner).await?;
        if owner.supervisor_id().is_none() {
            return Err(RegistryError::NoSupervisor(owner.id));
        }
        self.transition(actor_id, record, ResourceStatus::Submitted).await
    }

    pub async fn review(
        &self,
        actor_id: &AccountId,
        id: &ResourceId,
        outcome: ReviewOutcome,
    ) -> RegistryResult<OwnedResource> {
        self.access
            .require(Some(actor_id), Action::Review, &TargetRef::Record(id.clone()))
            .await?;
        let record = self.store.get_resource(id).await?;
        self.transition(actor_id, record, outcome.status()).await
    }

    /// Archive a record. Gated by the `delete` action, so admin only.
    pub async fn archive(&self, actor_id: &AccountId, id: &ResourceId) -> RegistryResult<OwnedResource> {
        self.access
            .require(Some(actor_id), Action::Delete, &TargetRef::Record(id.clone()))
            .await?;
        let record = self.store.get_resource(id).await?;
        self.transition(actor_id, record, ResourceStatus::Archived).await
    }

    async fn transition(
        &self,
        actor_id: &AccountId,
        mut record: OwnedResource,
        to: ResourceStatus,
    ) -> RegistryResult<OwnedResource> {
        let from = record.status;
        if !from.can_transition_to(to) {
            return Err(RegistryError::InvalidTransition { from, to });
        }
        let now = Utc::now();
        match to {
            ResourceStatus::Submitted => record.submitted_at = Some(now),
            ResourceStatus::Approved | ResourceStatus::Returned | ResourceStatus::Rejected => {
                record.reviewed_at = Some(now);
                record.reviewed_by = Some(actor_id.clone());
            }
            _ => {}
        }
        record.status = to;
        let record = self.store.replace_resource(record).await?;
        self.store
            .record_activity(
                NewActivity::new(Some(actor_id), ActivityOp::RecordStatusChanged, &record.id)
                    .with_detail(format!("{from}->{to}")),
            )
            .await?;
        metrics::counter!("sims_review_transitions_total", "to" => to.as_str()).increment(1);
        tracing::info!(
            actor = %actor_id,
            record = %record.id,
            from = %from,
            to = %to,
            "record status changed"
        );
        Ok(record)
    }
}
