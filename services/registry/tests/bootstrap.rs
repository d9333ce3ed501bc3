use sims_authz::{AccountId, Action, Decision, DenyReason, ResourceId};
use sims_registry::access::TargetRef;
use sims_registry::app::Registry;
use sims_registry::config::RegistryConfig;
use sims_registry::store::memory::InMemoryStore;
use std::io::Write;
use std::sync::Arc;

const SEED: &str = r#"
accounts:
  - id: root
    display_name: Root
    role: admin
  - id: dave
    display_name: Dave
    role: pg
    specialty: pediatrics
    year: 3
    supervisor: carol
  - id: carol
    display_name: Carol
    role: supervisor
    specialty: pediatrics
  - id: gus
    display_name: Gus
    role: supervisor
    specialty: pediatrics
    active: false
records:
  - id: case-1
    kind: clinical_case
    owner: dave
    title: Bronchiolitis
    status: submitted
"#;

fn seed_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(contents.as_bytes()).expect("write seed");
    file
}

fn config_for(file: &tempfile::NamedTempFile) -> RegistryConfig {
    RegistryConfig {
        seed_path: Some(file.path().to_path_buf()),
        ..RegistryConfig::default()
    }
}

#[tokio::test]
async fn seeded_registry_answers_access_checks() {
    let file = seed_file(SEED);
    let registry = Registry::build(config_for(&file), Arc::new(InMemoryStore::new()), None)
        .await
        .expect("bootstrap");

    let seed = registry.seed.expect("seed summary");
    assert_eq!((seed.accounts, seed.records), (4, 1));
    let forest = registry.forest.clone().expect("forest checked");
    assert_eq!(forest.supervisors, 2);
    assert_eq!(forest.assigned_pgs, 1);

    let target = TargetRef::Record(ResourceId::new("case-1"));
    let review = registry
        .access
        .authorize(Some(&AccountId::new("carol")), Action::Review, &target)
        .await
        .expect("authorize");
    assert_eq!(review, Decision::Allow);
    let gus = registry
        .access
        .authorize(Some(&AccountId::new("gus")), Action::View, &target)
        .await
        .expect("authorize");
    assert_eq!(gus, Decision::Deny(DenyReason::InactiveAccount));
}

#[tokio::test]
async fn seed_assigning_to_inactive_supervisor_aborts_startup() {
    let file = seed_file(
        r#"
accounts:
  - id: gus
    display_name: Gus
    role: supervisor
    specialty: radiology
    active: false
  - id: dave
    display_name: Dave
    role: pg
    specialty: radiology
    year: 1
    supervisor: gus
"#,
    );
    let err = Registry::build(config_for(&file), Arc::new(InMemoryStore::new()), None)
        .await
        .err()
        .expect("startup fails");
    let message = format!("{err:#}");
    assert!(message.contains("apply seed"), "{message}");
    assert!(message.contains("inactive"), "{message}");
}

#[tokio::test]
async fn seed_with_unknown_supervisor_aborts_startup() {
    let file = seed_file(
        r#"
accounts:
  - id: dave
    display_name: Dave
    role: pg
    specialty: radiology
    year: 1
    supervisor: nobody
"#,
    );
    let err = Registry::build(config_for(&file), Arc::new(InMemoryStore::new()), None)
        .await
        .err()
        .expect("startup fails");
    assert!(format!("{err:#}").contains("unknown supervisor"));
}

#[tokio::test]
async fn seed_with_supervisor_owned_record_aborts_startup() {
    let file = seed_file(
        r#"
accounts:
  - id: carol
    display_name: Carol
    role: supervisor
    specialty: radiology
records:
  - id: rota-1
    kind: rotation
    owner: carol
    title: Night rota
"#,
    );
    let err = Registry::build(config_for(&file), Arc::new(InMemoryStore::new()), None)
        .await
        .err()
        .expect("startup fails");
    let message = format!("{err:#}");
    assert!(message.contains("owned by pg accounts"), "{message}");
}

#[tokio::test]
async fn startup_without_seed_or_verification() {
    let config = RegistryConfig {
        verify_on_startup: false,
        ..RegistryConfig::default()
    };
    let registry = Registry::build(config, Arc::new(InMemoryStore::new()), None)
        .await
        .expect("bootstrap");
    assert!(registry.seed.is_none());
    assert!(registry.forest.is_none());
    assert_eq!(registry.store.backend_name(), "memory");
    assert!(
        registry
            .store
            .list_accounts(None)
            .await
            .expect("accounts")
            .is_empty()
    );
}

#[tokio::test]
async fn full_bootstrap_installs_metrics() {
    let registry = Registry::bootstrap(RegistryConfig {
        verify_on_startup: true,
        ..RegistryConfig::default()
    })
    .await
    .expect("bootstrap");
    let handle = registry.metrics.clone().expect("metrics handle");
    registry
        .access
        .authorize(None, Action::List, &TargetRef::Kind(sims_authz::ResourceKind::Rotation))
        .await
        .expect("authorize");
    assert!(handle.render().contains("sims_access_denied_total"));
}
