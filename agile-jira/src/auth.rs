//! Authentication helpers for the Jira client.
//!
//! Credential lookup and client construction live here so the CLI and any
//! other caller resolve Jira hosts and `.netrc` entries the same way.

use std::path::Path;

use agile_core::config::AgileConfig;
use agile_core::creds::netrc::normalize_host;
use agile_core::creds::{CredentialProvider, Credentials, get_credential_provider};
pub use agile_core::url::ENV_JIRA_HOST;
use agile_core::url::resolve_jira_base_url;
use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::consts::ATLASSIAN_CLOUD_MACHINE;
use crate::models::JiraAuth;
use crate::{JiraClient, create_jira_client};

/// Get the $JIRA_HOST environment variable value.
/// If the host doesn't include a scheme (http:// or https://), assumes https://.
pub fn get_jira_host() -> Result<String> {
  resolve_jira_base_url()
}

/// Check if Jira credentials are available for the provided host.
pub fn check_jira_credentials(home: &Path, jira_host: &str) -> Result<bool> {
  Ok(get_jira_credentials(home, jira_host).is_ok())
}

/// Retrieve Jira credentials for a host, falling back to the shared
/// Atlassian Cloud entry.
pub fn get_jira_credentials(home: &Path, jira_host: &str) -> Result<Credentials> {
  let provider = get_credential_provider(home);

  let normalized_host = normalize_host(jira_host);
  if let Some(creds) = provider.get_credentials(&normalized_host)? {
    debug!("Using Jira credentials for {}", normalized_host);
    return Ok(creds);
  }
  if let Some(creds) = provider.get_credentials(ATLASSIAN_CLOUD_MACHINE)? {
    debug!("Using {} credentials for {}", ATLASSIAN_CLOUD_MACHINE, normalized_host);
    return Ok(creds);
  }

  Err(anyhow::anyhow!(
    "Jira credentials not found in .netrc file. Please add credentials for machine '{normalized_host}' or '{ATLASSIAN_CLOUD_MACHINE}'."
  ))
}

/// Creates an authenticated Jira client using credentials from .netrc.
pub fn create_jira_client_from_netrc(home: &Path, jira_host: &str) -> Result<JiraClient> {
  let credentials = get_jira_credentials(home, jira_host).context("Failed to get credentials")?;

  create_jira_client(jira_host, &credentials.username, &credentials.password)
}

/// Creates an authenticated Jira client honoring the API path and timeout
/// from `config`.
pub fn create_jira_client_with_config(home: &Path, jira_host: &str, config: &AgileConfig) -> Result<JiraClient> {
  let credentials = get_jira_credentials(home, jira_host).context("Failed to get credentials")?;
  let auth = JiraAuth {
    username: credentials.username,
    api_token: credentials.password,
  };

  JiraClient::with_config(jira_host, auth, config)
}

/// Creates a tokio runtime and an authenticated Jira client.
pub fn create_jira_runtime_and_client(
  home: &Path,
  jira_host: &str,
  config: &AgileConfig,
) -> Result<(Runtime, JiraClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_jira_client_with_config(home, jira_host, config)?;
  Ok((rt, client))
}
