//! Per-account visibility report used by the operator CLI.
use crate::access::AccessService;
use crate::error::{RegistryError, RegistryResult};
use crate::store::RegistryStore;
use serde::Serialize;
use sims_authz::{AccountId, ResourceKind, Role};
use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRow {
    pub account: AccountId,
    pub role: Role,
    pub active: bool,
    pub supervisor: Option<AccountId>,
    /// Records of each kind the account may list. Denied callers see zero.
    pub visible: BTreeMap<ResourceKind, usize>,
}

pub async fn visibility_report(
    store: &dyn RegistryStore,
    access: &AccessService,
) -> RegistryResult<Vec<AuditRow>> {
    let mut rows = Vec::new();
    for account in store.list_accounts(None).await? {
        let mut visible = BTreeMap::new();
        for kind in ResourceKind::ALL {
            let count = match access.list_visible(Some(&account.id), kind).await {
                Ok(records) => records.len(),
                Err(RegistryError::Denied(_)) => 0,
                Err(err) => return Err(err),
            };
            visible.insert(kind, count);
        }
        rows.push(AuditRow {
            supervisor: account.supervisor_id().cloned(),
            role: account.role(),
            active: account.active,
            visible,
            account: account.id,
        });
    }
    Ok(rows)
}

/// Fixed-width table, one line per account.
pub fn render_table(rows: &[AuditRow]) -> String {
    let mut out = format!("{:<16} {:<11} {:<7} {:<16}", "account", "role", "active", "supervisor");
    for kind in ResourceKind::ALL {
        let _ = write!(out, " {:>14}", kind.as_str());
    }
    out.push('\n');
    for row in rows {
        let _ = write!(
            out,
            "{:<16} {:<11} {:<7} {:<16}",
            row.account.as_str(),
            row.role.as_str(),
            row.active,
            row.supervisor.as_ref().map(AccountId::as_str).unwrap_or("-"),
        );
        for kind in ResourceKind::ALL {
            let _ = write!(out, " {:>14}", row.visible.get(&kind).copied().unwrap_or(0));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use sims_authz::{Account, OwnedResource, Specialty, TrainingYear};
    use std::sync::Arc;

    #[tokio::test]
    async fn report_counts_visible_records_per_kind() {
        let store: Arc<dyn RegistryStore> = Arc::new(InMemoryStore::new());
        let year = TrainingYear::new(1).expect("year");
        store
            .insert_account(Account::admin("root", "Root"))
            .await
            .expect("root");
        store
            .insert_account(Account::pg("alice", "Alice", Specialty::Other, year, None))
            .await
            .expect("alice");
        let mut gone = Account::pg("bob", "Bob", Specialty::Other, year, None);
        gone.deactivate();
        store.insert_account(gone).await.expect("bob");
        store
            .insert_resource(OwnedResource::draft(
                "c1",
                ResourceKind::ClinicalCase,
                "alice",
                "Case",
            ))
            .await
            .expect("record");

        let access = AccessService::new(store.clone());
        let rows = visibility_report(store.as_ref(), &access)
            .await
            .expect("report");
        let counts: Vec<(&str, usize)> = rows
            .iter()
            .map(|row| (row.account.as_str(), row.visible[&ResourceKind::ClinicalCase]))
            .collect();
        assert_eq!(counts, vec![("alice", 1), ("bob", 0), ("root", 1)]);
        assert_eq!(rows[0].role, Role::Pg);
        assert_eq!(rows[0].supervisor, None);
        assert!(!rows[1].active);
        assert_eq!(rows[2].role, Role::Admin);

        let table = render_table(&rows);
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("clinical_case"));

        let json = serde_json::to_value(&rows).expect("json");
        assert_eq!(json[0]["visible"]["clinical_case"], 1);
    }
}
