//! # Client Creation
//!
//! Resolves the Jira host, loads configuration and credentials, and builds an
//! authenticated client plus the runtime to drive it.

use agile_core::config::{AgileConfig, get_config_dirs};
use agile_core::url::{ENV_JIRA_HOST, ensure_url_scheme};
use agile_jira::JiraClient;
use agile_jira::auth::{create_jira_runtime_and_client, get_jira_host};
use anyhow::{Context, Result};
use directories::BaseDirs;
use tokio::runtime::Runtime;
use tracing::debug;

/// Load `agile.toml`, falling back to defaults when it is missing
pub(crate) fn load_config() -> Result<AgileConfig> {
  let config_dirs = get_config_dirs()?;
  config_dirs.load_config()
}

/// Pick the Jira host: the `--host` flag wins, then `$JIRA_HOST`, then the
/// config file
pub(crate) fn resolve_host(flag: Option<&str>, config: &AgileConfig) -> Result<String> {
  if let Some(host) = flag {
    debug!("Using Jira host from --host");
    return ensure_url_scheme(host);
  }

  match get_jira_host() {
    Ok(host) => {
      debug!("Using Jira host from {}", ENV_JIRA_HOST);
      return Ok(host);
    }
    Err(e) => debug!("{}", e),
  }

  if let Some(host) = config.jira_host.as_deref() {
    debug!("Using Jira host from config");
    return ensure_url_scheme(host);
  }

  Err(anyhow::anyhow!(
    "No Jira host configured. Pass --host, set {ENV_JIRA_HOST}, or run 'agile config set --host <HOST>'."
  ))
}

/// Creates a tokio runtime and an authenticated Jira client for the resolved
/// host
pub(crate) fn create_runtime_and_client(host_flag: Option<&str>) -> Result<(Runtime, JiraClient, AgileConfig)> {
  let config = load_config()?;
  let jira_host = resolve_host(host_flag, &config)?;
  let base_dirs = BaseDirs::new().context("Failed to get $HOME directory")?;

  let (rt, client) = create_jira_runtime_and_client(base_dirs.home_dir(), &jira_host, &config)
    .with_context(|| format!("Failed to create Jira client for {jira_host}"))?;
  Ok((rt, client, config))
}
