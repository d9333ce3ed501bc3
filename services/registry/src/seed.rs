//! YAML fixtures for populating a fresh store.
//!
//! ```yaml
//! accounts:
//!   - id: carol
//!     display_name: Carol
//!     role: supervisor
//!     specialty: surgery
//!   - id: dave
//!     display_name: Dave
//!     role: pg
//!     specialty: surgery
//!     year: 2
//!     supervisor: carol
//! records:
//!   - id: case-1
//!     kind: clinical_case
//!     owner: dave
//!     title: Appendicectomy
//!     status: approved
//!     reviewed_by: carol
//! ```
//!
//! Accounts are applied admins first, then supervisors, then PGs, so every
//! PG's supervisor exists by the time its edge is validated. Records go last.
//! Review stamps are only written for reviewed statuses, and only together.
use crate::activity::{ActivityOp, NewActivity};
use crate::error::RegistryResult;
use crate::store::RegistryStore;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sims_authz::{Account, AccountId, OwnedResource, ResourceId, ResourceKind, ResourceStatus};
use std::cmp::Reverse;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRecord {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub owner: AccountId,
    pub title: String,
    #[serde(default)]
    pub status: ResourceStatus,
    #[serde(default)]
    pub reviewed_by: Option<AccountId>,
}

impl SeedRecord {
    fn into_resource(self) -> OwnedResource {
        let mut resource =
            OwnedResource::draft(self.id, self.kind, self.owner, self.title).with_status(self.status);
        if resource.status != ResourceStatus::Draft {
            resource.submitted_at = Some(resource.created_at);
        }
        let reviewed = matches!(
            resource.status,
            ResourceStatus::Approved | ResourceStatus::Returned | ResourceStatus::Rejected
        );
        if reviewed && self.reviewed_by.is_some() {
            resource.reviewed_at = Some(Utc::now());
            resource.reviewed_by = self.reviewed_by;
        }
        resource
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFixture {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub records: Vec<SeedRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub accounts: usize,
    pub records: usize,
}

impl SeedFixture {
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).with_context(|| "parse seed yaml")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read seed file: {}", path.display()))?;
        Self::from_yaml_str(&contents).with_context(|| format!("load seed {}", path.display()))
    }

    /// Insert every account and record into `store`, stopping at the first
    /// rejection.
    pub async fn apply(self, store: &dyn RegistryStore) -> RegistryResult<SeedSummary> {
        let mut accounts = self.accounts;
        // Stable: fixture order is kept within a role.
        accounts.sort_by_key(|account| Reverse(account.role()));
        let mut summary = SeedSummary::default();
        for account in accounts {
            let account = store.insert_account(account).await?;
            store
                .record_activity(
                    NewActivity::new(None, ActivityOp::AccountCreated, &account.id)
                        .with_detail(account.role().as_str()),
                )
                .await?;
            tracing::debug!(account = %account.id, role = %account.role(), "seeded account");
            summary.accounts += 1;
        }
        for record in self.records {
            let record = store.insert_resource(record.into_resource()).await?;
            store
                .record_activity(
                    NewActivity::new(None, ActivityOp::RecordCreated, &record.id)
                        .with_detail(record.kind.as_str()),
                )
                .await?;
            tracing::debug!(record = %record.id, kind = %record.kind, "seeded record");
            summary.records += 1;
        }
        tracing::info!(
            accounts = summary.accounts,
            records = summary.records,
            "seed applied"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use sims_authz::Role;

    const FIXTURE: &str = r#"
accounts:
  - id: dave
    display_name: Dave
    role: pg
    specialty: surgery
    year: 2
    supervisor: carol
  - id: carol
    display_name: Carol
    role: supervisor
    specialty: surgery
  - id: root
    display_name: Root
    role: admin
records:
  - id: case-1
    kind: clinical_case
    owner: dave
    title: Appendicectomy
    status: submitted
  - id: case-2
    kind: clinical_case
    owner: dave
    title: Cholecystectomy
    status: approved
    reviewed_by: carol
  - id: case-3
    kind: clinical_case
    owner: dave
    title: Hernia repair
    status: rejected
"#;

    #[test]
    fn parses_role_tagged_accounts() {
        let fixture = SeedFixture::from_yaml_str(FIXTURE).expect("parse");
        assert_eq!(fixture.accounts.len(), 3);
        let dave = &fixture.accounts[0];
        assert_eq!(dave.role(), Role::Pg);
        assert!(dave.active);
        assert_eq!(dave.supervisor_id(), Some(&AccountId::new("carol")));
        assert_eq!(fixture.records[0].status, ResourceStatus::Submitted);
    }

    #[test]
    fn rejects_out_of_range_year() {
        let err = SeedFixture::from_yaml_str(
            "accounts:\n  - id: x\n    display_name: X\n    role: pg\n    specialty: surgery\n    year: 7\n",
        )
        .expect_err("year 7");
        assert!(format!("{err:#}").contains("training year"));
    }

    #[tokio::test]
    async fn supervisors_are_applied_before_pgs() {
        let fixture = SeedFixture::from_yaml_str(FIXTURE).expect("parse");
        let store = InMemoryStore::new();
        let summary = fixture.apply(&store).await.expect("apply");
        assert_eq!(
            summary,
            SeedSummary {
                accounts: 3,
                records: 3
            }
        );
        let subs = store
            .subordinates_of(&AccountId::new("carol"))
            .await
            .expect("subs");
        assert_eq!(subs.len(), 1);
        let record = store
            .get_resource(&ResourceId::new("case-1"))
            .await
            .expect("record");
        assert!(record.submitted_at.is_some());
        assert!(record.reviewed_by.is_none());
        assert!(record.reviewed_at.is_none());
    }

    #[tokio::test]
    async fn review_stamps_are_written_together() {
        let fixture = SeedFixture::from_yaml_str(FIXTURE).expect("parse");
        let store = InMemoryStore::new();
        fixture.apply(&store).await.expect("apply");

        let approved = store
            .get_resource(&ResourceId::new("case-2"))
            .await
            .expect("case-2");
        assert_eq!(approved.reviewed_by, Some(AccountId::new("carol")));
        assert!(approved.reviewed_at.is_some());

        let rejected = store
            .get_resource(&ResourceId::new("case-3"))
            .await
            .expect("case-3");
        assert!(rejected.reviewed_by.is_none());
        assert!(rejected.reviewed_at.is_none());
    }

    #[tokio::test]
    async fn seeded_activity_has_no_actor() {
        let fixture = SeedFixture::from_yaml_str(FIXTURE).expect("parse");
        let store = InMemoryStore::new();
        fixture.apply(&store).await.expect("apply");
        let trail = store.list_activity(None).await.expect("activity");
        assert_eq!(trail.len(), 6);
        assert!(trail.iter().all(|entry| entry.actor.is_none()));
        assert_eq!(trail[0].target, "root");
    }
}
