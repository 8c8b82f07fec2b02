//! Configuration management for the CLI

use crate::output::OutputFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Prefix of environment variables read into [`CliConfig`]
const ENV_PREFIX: &str = "ALBCTL";

/// CLI configuration
///
/// Read from `~/.config/albctl/config.json`, then overridden by
/// `ALBCTL_*` environment variables. Command-line flags take precedence
/// over both.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliConfig {
    /// Kubeconfig file to use when none is given on the command line
    pub kubeconfig: Option<String>,
    /// Annotation key written by `services migrate`
    pub annotation_key: Option<String>,
    /// Default output format
    pub default_format: Option<OutputFormat>,
}

impl CliConfig {
    /// Load configuration from the default file and the process environment
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration from a specific file, overridden by `env`
    pub fn load_from(path: &Path, env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(env)
            .build()
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| {
                format!(
                    "Failed to parse configuration from {} and {}_* variables",
                    path.display(),
                    ENV_PREFIX
                )
            })
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("albctl").join("config.json"))
    }
}

/// Get the kubeconfig files to load, in merge order
///
/// The override (a flag or `KUBECONFIG`) may hold a path list. An empty
/// value falls through to `~/.kube/config`.
pub fn kubeconfig_paths(override_path: Option<&str>) -> Result<Vec<PathBuf>> {
    let env = std::env::var("KUBECONFIG").ok();
    let home = dirs_next::home_dir();
    resolve_kubeconfig_paths(override_path, env.as_deref(), home.as_deref())
}

fn resolve_kubeconfig_paths(
    override_path: Option<&str>,
    env: Option<&str>,
    home: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    for value in [override_path, env].into_iter().flatten() {
        let paths: Vec<PathBuf> = std::env::split_paths(value)
            .filter(|path| !path.as_os_str().is_empty())
            .collect();
        if !paths.is_empty() {
            return Ok(paths);
        }
    }

    let home = home.context("Could not determine home directory")?;
    Ok(vec![home.join(".kube").join("config")])
}
