//! Registry startup wiring.
//!
//! # Purpose
//! Builds every handle the registry exposes in one explicit order:
//! observability, store, seed, assignment-forest check, then the services
//! that share the store. Nothing registers itself implicitly.
//!
//! # Notes
//! Any failing step aborts startup with context naming the step.
use crate::access::AccessService;
use crate::assignment::{AssignmentIndex, ForestSummary};
use crate::config::RegistryConfig;
use crate::directory::AccountDirectory;
use crate::observability;
use crate::seed::{SeedFixture, SeedSummary};
use crate::store::RegistryStore;
use crate::store::memory::InMemoryStore;
use crate::workflow::ReviewWorkflow;
use anyhow::Context;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

#[derive(Clone)]
pub struct Registry {
    pub config: RegistryConfig,
    pub store: Arc<dyn RegistryStore>,
    pub access: AccessService,
    pub assignments: AssignmentIndex,
    pub directory: AccountDirectory,
    pub workflow: ReviewWorkflow,
    pub seed: Option<SeedSummary>,
    /// Set when `verify_on_startup` ran.
    pub forest: Option<ForestSummary>,
    pub metrics: Option<PrometheusHandle>,
}

impl Registry {
    /// Full startup with the in-memory backend.
    pub async fn bootstrap(config: RegistryConfig) -> anyhow::Result<Self> {
        let metrics = observability::init_observability(&config.service_name)
            .context("initialize observability")?;
        let store: Arc<dyn RegistryStore> = Arc::new(InMemoryStore::new());
        Self::build(config, store, Some(metrics)).await
    }

    /// Startup over an already constructed store.
    pub async fn build(
        config: RegistryConfig,
        store: Arc<dyn RegistryStore>,
        metrics: Option<PrometheusHandle>,
    ) -> anyhow::Result<Self> {
        store.health_check().await.context("store health check")?;
        tracing::info!(
            service = %config.service_name,
            backend = store.backend_name(),
            durable = store.is_durable(),
            "registry store ready"
        );

        let seed = match &config.seed_path {
            Some(path) => {
                let fixture = SeedFixture::from_path(path)?;
                let summary = fixture
                    .apply(store.as_ref())
                    .await
                    .with_context(|| format!("apply seed {}", path.display()))?;
                Some(summary)
            }
            None => None,
        };

        let access = AccessService::new(store.clone());
        let assignments = AssignmentIndex::new(store.clone(), access.clone());
        let forest = if config.verify_on_startup {
            let summary = assignments
                .verify_forest()
                .await
                .context("verify supervisor assignments")?;
            tracing::info!(
                supervisors = summary.supervisors,
                assigned = summary.assigned_pgs,
                unassigned = summary.unassigned_pgs,
                "supervisor assignments verified"
            );
            Some(summary)
        } else {
            None
        };

        let directory = AccountDirectory::new(store.clone(), access.clone());
        let workflow = ReviewWorkflow::new(store.clone(), access.clone());
        Ok(Self {
            config,
            store,
            access,
            assignments,
            directory,
            workflow,
            seed,
            forest,
            metrics,
        })
    }
}
