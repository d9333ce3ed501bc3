//! Operator CLI for the SIMS registry.
//!
//! # Purpose
//! Bootstraps a registry from configuration (and its seed fixture) and runs
//! one diagnostic command against it.
use anyhow::Context;
use clap::{Parser, Subcommand};
use sims_authz::{AccountId, Action, ResourceId, ResourceKind};
use sims_registry::app::Registry;
use sims_registry::audit;
use sims_registry::config::RegistryConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sims-registry")]
#[command(about = "Inspect SIMS accounts, assignments, and record access", long_about = None)]
struct Cli {
    /// Seed fixture to load, overriding SIMS_SEED_PATH.
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    /// Print the Prometheus metrics snapshot after the command.
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run startup checks and report what was loaded.
    Verify,
    /// Show how many records of each kind every account can see.
    Audit {
        #[arg(long)]
        json: bool,
    },
    /// Evaluate one access decision.
    Check {
        actor: String,
        action: Action,
        /// Record kind. Optional with `--record`, where it must match.
        kind: Option<ResourceKind>,
        #[arg(long)]
        record: Option<String>,
    },
    /// List the PGs currently assigned to a supervisor.
    Subordinates { supervisor: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = RegistryConfig::from_env_or_yaml().context("load registry config")?;
    if let Some(seed) = cli.seed.clone() {
        config.seed_path = Some(seed);
    }
    let registry = Registry::bootstrap(config).await?;
    run(&registry, cli.command).await?;
    if cli.metrics {
        if let Some(handle) = &registry.metrics {
            print!("{}", handle.render());
        }
    }
    Ok(())
}

async fn run(registry: &Registry, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Verify => {
            let forest = registry
                .assignments
                .verify_forest()
                .await
                .context("verify supervisor assignments")?;
            let seed = registry.seed.unwrap_or_default();
            println!(
                "backend={} accounts={} records={}",
                registry.store.backend_name(),
                seed.accounts,
                seed.records
            );
            println!(
                "supervisors={} assigned_pgs={} unassigned_pgs={} inactive_edges={}",
                forest.supervisors,
                forest.assigned_pgs,
                forest.unassigned_pgs,
                forest.inactive_edges
            );
        }
        Command::Audit { json } => {
            let rows = audit::visibility_report(registry.store.as_ref(), &registry.access)
                .await
                .context("build visibility report")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", audit::render_table(&rows));
            }
        }
        Command::Check {
            actor,
            action,
            kind,
            record,
        } => {
            let actor = AccountId::new(actor);
            let target = registry
                .access
                .target_for(kind, record.map(ResourceId::new))
                .await
                .context("resolve check target")?;
            let decision = registry
                .access
                .authorize(Some(&actor), action, &target)
                .await
                .context("evaluate access")?;
            match decision.reason() {
                Some(reason) => println!("{decision} outcome={:?}", reason.outcome()),
                None => println!("{decision}"),
            }
        }
        Command::Subordinates { supervisor } => {
            let supervisor = AccountId::new(supervisor);
            for account in registry.assignments.subordinates_of(&supervisor).await? {
                println!("{}\t{}", account.id, account.display_name);
            }
        }
    }
    Ok(())
}
