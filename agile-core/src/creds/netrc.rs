//! Helpers for reading and writing credentials stored in `.netrc` files.
//!
//! Both the single-line (`machine host login user password pass`) and the
//! multi-line layouts are accepted. Entries missing either `login` or
//! `password` are treated as absent.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::creds::Credentials;

/// Returns the path to the `.netrc` file for the provided home directory.
///
/// ```
/// use std::path::Path;
/// use agile_core::creds::netrc::get_netrc_path;
///
/// let path = get_netrc_path(Path::new("/home/user"));
/// assert_eq!(path, Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

#[derive(Default)]
struct Entry {
  machine: String,
  login: Option<String>,
  password: Option<String>,
}

impl Entry {
  fn into_credentials(self, target_machine: &str) -> Option<Credentials> {
    if self.machine != target_machine {
      return None;
    }
    match (self.login, self.password) {
      (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
        Some(Credentials { username, password })
      }
      _ => None,
    }
  }
}

/// Parses `.netrc` content and returns credentials for the requested machine.
pub fn parse_netrc(content: &str, target_machine: &str) -> Option<Credentials> {
  let mut tokens = content
    .lines()
    .filter(|line| !line.trim_start().starts_with('#'))
    .flat_map(str::split_whitespace);

  let mut current: Option<Entry> = None;

  while let Some(token) = tokens.next() {
    match token {
      "machine" => {
        let Some(machine) = tokens.next() else { break };
        if let Some(found) = current.take().and_then(|entry| entry.into_credentials(target_machine)) {
          return Some(found);
        }
        current = Some(Entry {
          machine: machine.to_string(),
          ..Default::default()
        });
      }
      "login" => {
        if let (Some(entry), Some(value)) = (current.as_mut(), tokens.next()) {
          entry.login = Some(value.to_string());
        }
      }
      "password" => {
        if let (Some(entry), Some(value)) = (current.as_mut(), tokens.next()) {
          entry.password = Some(value.to_string());
        }
      }
      _ => {}
    }
  }

  current.and_then(|entry| entry.into_credentials(target_machine))
}

/// Reads a `.netrc` file and returns credentials for the requested machine.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn parse_netrc_file(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  let content = std::fs::read_to_string(path).context("Failed to open .netrc file")?;
  Ok(parse_netrc(&content, target_machine))
}

/// Writes or updates a `.netrc` entry for the given machine.
///
/// Existing entries for the machine are replaced; otherwise a new entry is
/// appended. On Unix the file mode is tightened to `600`.
pub fn write_netrc_entry(path: &Path, machine: &str, username: &str, password: &str) -> Result<()> {
  let existing = if path.exists() {
    std::fs::read_to_string(path).context("Failed to read existing .netrc file")?
  } else {
    String::new()
  };

  let header = format!("machine {machine}");
  let entry = format!("{header}\n  login {username}\n  password {password}\n");

  if existing.lines().any(|line| line.trim() == header) {
    let mut updated = String::new();
    let mut skipping = false;

    for line in existing.lines() {
      let trimmed = line.trim();
      if trimmed.starts_with("machine ") {
        skipping = trimmed == header;
        if skipping {
          updated.push_str(&entry);
          continue;
        }
      }
      if !skipping {
        updated.push_str(line);
        updated.push('\n');
      }
    }

    std::fs::write(path, updated).context("Failed to write updated .netrc file")?;
  } else {
    let mut file = std::fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(path)
      .context("Failed to open .netrc file for writing")?;

    if !existing.is_empty() && !existing.ends_with('\n') {
      writeln!(file)?;
    }
    file
      .write_all(entry.as_bytes())
      .context("Failed to append .netrc entry")?;
  }

  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
      .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
  }

  Ok(())
}

/// Normalizes a Jira host URL by removing protocol prefixes and trailing
/// slashes.
///
/// ```
/// use agile_core::creds::netrc::normalize_host;
///
/// assert_eq!(normalize_host("https://company.atlassian.net/"), "company.atlassian.net");
/// assert_eq!(normalize_host("my-jira-instance.com"), "my-jira-instance.com");
/// ```
pub fn normalize_host(raw_host: &str) -> String {
  raw_host
    .trim()
    .trim_start_matches("https://")
    .trim_start_matches("http://")
    .trim_end_matches('/')
    .to_string()
}
