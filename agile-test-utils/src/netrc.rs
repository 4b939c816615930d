use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::env::EnvVarGuard;

/// RAII guard for test .netrc files
///
/// This struct creates a temporary .netrc file with the given content and
/// points HOME at the temporary directory. The original HOME is restored when
/// the guard is dropped.
pub struct NetrcGuard {
  temp_dir: TempDir,
  netrc_path: PathBuf,
  home: EnvVarGuard,
}

impl NetrcGuard {
  /// Create a new NetrcGuard with the given content
  pub fn new(content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(".netrc");

    let mut file = fs::File::create(&netrc_path).expect("Failed to create test .netrc");
    file.write_all(content.as_bytes()).expect("Failed to write test .netrc");

    let home = EnvVarGuard::new("HOME");
    home.set(temp_dir.path());

    Self {
      temp_dir,
      netrc_path,
      home,
    }
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Get the path to the temporary directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }
}

#[cfg(test)]
mod tests {
  use directories::BaseDirs;

  use super::*;

  #[test]
  fn test_netrc_guard_overrides_home() {
    let guard = NetrcGuard::new("machine example.com\n  login user\n  password pass\n");

    let base_dirs = BaseDirs::new().expect("Could not determine base directories");
    assert_eq!(base_dirs.home_dir(), guard.home_dir());
    assert!(
      fs::read_to_string(guard.netrc_path())
        .unwrap()
        .contains("machine example.com")
    );
  }
}
