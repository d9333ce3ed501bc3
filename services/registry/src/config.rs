use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

// Registry configuration sourced from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub service_name: String,
    /// YAML fixture applied at startup, if any.
    pub seed_path: Option<PathBuf>,
    /// Run the assignment-forest precondition before serving.
    pub verify_on_startup: bool,
}

#[derive(Debug, Deserialize)]
struct RegistryConfigOverride {
    service_name: Option<String>,
    seed_path: Option<PathBuf>,
    verify_on_startup: Option<bool>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            service_name: "sims-registry".to_string(),
            seed_path: None,
            verify_on_startup: true,
        }
    }
}

impl RegistryConfig {
    pub fn from_env() -> Result<Self> {
        let service_name =
            std::env::var("SIMS_SERVICE_NAME").unwrap_or_else(|_| "sims-registry".to_string());
        let seed_path = std::env::var("SIMS_SEED_PATH")
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let verify_on_startup = match std::env::var("SIMS_VERIFY_ON_STARTUP") {
            Ok(value) => parse_bool(&value).with_context(|| "parse SIMS_VERIFY_ON_STARTUP")?,
            Err(_) => true,
        };
        Ok(Self {
            service_name,
            seed_path,
            verify_on_startup,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("SIMS_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read SIMS_CONFIG: {path}"))?;
            let override_cfg: RegistryConfigOverride = serde_yaml::from_str(&contents)
                .with_context(|| "parse registry config yaml")?;
            if let Some(value) = override_cfg.service_name {
                config.service_name = value;
            }
            if let Some(value) = override_cfg.seed_path {
                config.seed_path = Some(value);
            }
            if let Some(value) = override_cfg.verify_on_startup {
                config.verify_on_startup = value;
            }
        }
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {other:?}"),
    }
}
