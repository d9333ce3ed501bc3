//! Admin-managed account directory.
use crate::access::AccessService;
use crate::activity::{ActivityEntry, ActivityOp, NewActivity};
use crate::error::RegistryResult;
use crate::store::RegistryStore;
use sims_authz::{Account, AccountId, Role, require_admin};
use std::sync::Arc;

#[derive(Clone)]
pub struct AccountDirectory {
    store: Arc<dyn RegistryStore>,
    access: AccessService,
}

impl AccountDirectory {
    pub fn new(store: Arc<dyn RegistryStore>, access: AccessService) -> Self {
        Self { store, access }
    }

    async fn require_admin(&self, actor_id: &AccountId) -> RegistryResult<()> {
        let actor = self.access.load_actor(Some(actor_id)).await?;
        Ok(require_admin(actor.as_ref()).into_result()?)
    }

    /// Create `account` on behalf of an admin.
    ///
    /// The store validates the account and, for a PG created with a
    /// supervisor, the assignment. Duplicate ids fail with a conflict.
    pub async fn create_account(
        &self,
        actor_id: &AccountId,
        account: Account,
    ) -> RegistryResult<Account> {
        self.require_admin(actor_id).await?;
        let created = self.store.insert_account(account).await?;
        self.store
            .record_activity(
                NewActivity::new(Some(actor_id), ActivityOp::AccountCreated, &created.id)
                    .with_detail(created.role().as_str()),
            )
            .await?;
        tracing::info!(
            actor = %actor_id,
            account = %created.id,
            role = %created.role(),
            "account created"
        );
        Ok(created)
    }

    /// Soft-delete an account. Its records and supervisor edges are kept.
    pub async fn deactivate(&self, actor_id: &AccountId, id: &AccountId) -> RegistryResult<Account> {
        self.require_admin(actor_id).await?;
        let account = self.store.deactivate_account(id).await?;
        self.store
            .record_activity(NewActivity::new(
                Some(actor_id),
                ActivityOp::AccountDeactivated,
                id,
            ))
            .await?;
        tracing::info!(actor = %actor_id, account = %id, "account deactivated");
        Ok(account)
    }

    pub async fn get(&self, id: &AccountId) -> RegistryResult<Account> {
        Ok(self.store.get_account(id).await?)
    }

    pub async fn list_by_role(&self, role: Role) -> RegistryResult<Vec<Account>> {
        Ok(self.store.list_accounts(Some(role)).await?)
    }

    /// Changes made to one account, oldest first. Admin only.
    pub async fn history(
        &self,
        actor_id: &AccountId,
        id: &AccountId,
    ) -> RegistryResult<Vec<ActivityEntry>> {
        self.require_admin(actor_id).await?;
        Ok(self.store.list_activity(Some(id.as_str())).await?)
    }
}
