//! Environment variable management for testing
//!
//! Tests in this workspace read `JIRA_HOST`, `HOME` and the XDG variables.
//! The guards here capture the original value on construction and put it
//! back on drop so tests don't interfere with each other. A variable can only
//! be guarded by one guard at a time; a second guard for the same name blocks
//! until the first is dropped, which serializes tests running on parallel
//! threads.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex, MutexGuard};

use tempfile::TempDir;

static GUARDED: Mutex<Option<HashSet<String>>> = Mutex::new(None);
static RELEASED: Condvar = Condvar::new();

fn guarded() -> MutexGuard<'static, Option<HashSet<String>>> {
  GUARDED.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn acquire(name: &str) {
  let mut names = guarded();
  while names.as_ref().is_some_and(|set| set.contains(name)) {
    names = RELEASED.wait(names).unwrap_or_else(|poisoned| poisoned.into_inner());
  }
  names.get_or_insert_with(HashSet::new).insert(name.to_string());
}

fn release(name: &str) {
  if let Some(set) = guarded().as_mut() {
    set.remove(name);
  }
  RELEASED.notify_all();
}

/// Restores a single environment variable to its original value when dropped
pub struct EnvVarGuard {
  name: String,
  original: Option<String>,
}

impl EnvVarGuard {
  /// Capture the current value of `name`, waiting for any other guard of the
  /// same variable to be dropped first
  pub fn new(name: &str) -> Self {
    acquire(name);
    Self {
      name: name.to_string(),
      original: env::var(name).ok(),
    }
  }

  /// Set the variable for the lifetime of the guard
  pub fn set(&self, value: impl AsRef<std::ffi::OsStr>) {
    unsafe {
      env::set_var(&self.name, value);
    }
  }

  /// Remove the variable for the lifetime of the guard
  pub fn remove(&self) {
    unsafe {
      env::remove_var(&self.name);
    }
  }

  /// Name of the guarded variable
  pub fn name(&self) -> &str {
    &self.name
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      Some(val) => unsafe {
        env::set_var(&self.name, val);
      },
      None => unsafe {
        env::remove_var(&self.name);
      },
    }
    release(&self.name);
  }
}

/// A test environment that overrides XDG directories to use a per-test
/// temporary directory
pub struct EnvTestGuard {
  /// The temporary directory that will be used for XDG directories
  pub temp_dir: TempDir,
  config_home: EnvVarGuard,
  data_home: EnvVarGuard,
  cache_home: EnvVarGuard,
}

impl Default for EnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl EnvTestGuard {
  /// XDG environment variable names
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";
  pub const XDG_DATA_HOME: &'static str = "XDG_DATA_HOME";
  pub const XDG_CACHE_HOME: &'static str = "XDG_CACHE_HOME";

  /// Create a new test environment with overridden XDG directories
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let temp_path = temp_dir.path().to_path_buf();

    let config_home = EnvVarGuard::new(Self::XDG_CONFIG_HOME);
    let data_home = EnvVarGuard::new(Self::XDG_DATA_HOME);
    let cache_home = EnvVarGuard::new(Self::XDG_CACHE_HOME);

    config_home.set(temp_path.join("config"));
    data_home.set(temp_path.join("data"));
    cache_home.set(temp_path.join("cache"));

    std::fs::create_dir_all(temp_path.join("config")).expect("Failed to create config directory");
    std::fs::create_dir_all(temp_path.join("data")).expect("Failed to create data directory");
    std::fs::create_dir_all(temp_path.join("cache")).expect("Failed to create cache directory");

    Self {
      temp_dir,
      config_home,
      data_home,
      cache_home,
    }
  }

  /// Get the path to the XDG config directory
  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }

  /// Get the path to the XDG data directory
  pub fn data_dir(&self) -> PathBuf {
    self.temp_dir.path().join("data")
  }

  /// Get the path to the XDG cache directory
  pub fn cache_dir(&self) -> PathBuf {
    self.temp_dir.path().join("cache")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_env_var_guard_restores_missing_variable() {
    let name = "AGILE_TEST_UTILS_UNSET_VAR";
    {
      let guard = EnvVarGuard::new(name);
      guard.set("value");
      assert_eq!(env::var(name).unwrap(), "value");
    }
    assert!(env::var(name).is_err());
  }

  #[test]
  fn test_env_test_guard_points_xdg_at_temp_dir() {
    let guard = EnvTestGuard::new();
    assert_eq!(
      PathBuf::from(env::var(EnvTestGuard::XDG_CONFIG_HOME).unwrap()),
      guard.config_dir()
    );
    assert!(guard.data_dir().exists());
    assert!(guard.cache_dir().exists());
  }
}
