//! # Credential Management
//!
//! Retrieval and storage of Jira credentials. Credentials live in the user's
//! `~/.netrc` keyed by host; the [`CredentialProvider`] trait keeps lookup
//! swappable so callers don't depend on the file format.

use std::path::{Path, PathBuf};

use anyhow::Result;

pub mod netrc;

/// Represents credentials for a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

/// Source of stored credentials keyed by host name
pub trait CredentialProvider {
  /// Look up credentials for `host`, returning `Ok(None)` when none are stored
  fn get_credentials(&self, host: &str) -> Result<Option<Credentials>>;

  /// Store credentials for `host`, replacing any existing entry
  fn store_credentials(&self, host: &str, credentials: &Credentials) -> Result<()>;
}

/// Credential provider backed by a `.netrc` file in the user's home directory
#[derive(Debug, Clone)]
pub struct NetrcCredentialProvider {
  path: PathBuf,
}

impl NetrcCredentialProvider {
  /// Provider reading `<home>/.netrc`
  pub fn new(home: &Path) -> Self {
    Self {
      path: netrc::get_netrc_path(home),
    }
  }

  /// Path of the backing `.netrc` file
  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl CredentialProvider for NetrcCredentialProvider {
  fn get_credentials(&self, host: &str) -> Result<Option<Credentials>> {
    if !self.path.exists() {
      tracing::debug!("No .netrc file at {}", self.path.display());
      return Ok(None);
    }
    netrc::parse_netrc_file(&self.path, host)
  }

  fn store_credentials(&self, host: &str, credentials: &Credentials) -> Result<()> {
    netrc::write_netrc_entry(&self.path, host, &credentials.username, &credentials.password)
  }
}

/// Get the credential provider for a home directory
pub fn get_credential_provider(home: &Path) -> NetrcCredentialProvider {
  NetrcCredentialProvider::new(home)
}
