//! # Credentials Command
//!
//! Checks and stores Jira credentials in `.netrc`.

use std::io::{self, BufRead};

use agile_core::creds::netrc::normalize_host;
use agile_core::creds::{CredentialProvider, Credentials, get_credential_provider};
use agile_core::output::{print_error, print_info, print_success};
use agile_jira::auth::get_jira_credentials;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use directories::BaseDirs;

use super::GlobalArgs;
use crate::clients::{load_config, resolve_host};

/// Command for credential management
#[derive(Args)]
pub struct CredsArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: CredsSubcommands,
}

/// Subcommands for the creds command
#[derive(Subcommand)]
pub enum CredsSubcommands {
  /// Check whether credentials exist for the Jira host
  Check,

  /// Store credentials for the Jira host
  #[command(long_about = "Store Jira credentials in your .netrc file.\n\n\
                   The API token is read from the first line of standard input so it\n\
                   never appears in your shell history, e.g.\n\
                   'agile creds set --username me@example.com < token.txt'.")]
  Set {
    /// Jira account email or username
    #[arg(long, required = true)]
    username: String,
  },
}

/// Handle the creds command
pub(crate) fn handle_creds_command(global: &GlobalArgs, creds: CredsArgs) -> Result<()> {
  let config = load_config()?;
  let jira_host = resolve_host(global.host.as_deref(), &config)?;
  let base_dirs = BaseDirs::new().context("Failed to get $HOME directory")?;

  match creds.subcommand {
    CredsSubcommands::Check => match get_jira_credentials(base_dirs.home_dir(), &jira_host) {
      Ok(credentials) => {
        print_success(&format!(
          "Found Jira credentials for {} (user {})",
          normalize_host(&jira_host),
          credentials.username
        ));
        Ok(())
      }
      Err(e) => {
        print_error(&e.to_string());
        Err(anyhow::anyhow!("Jira credentials are not configured"))
      }
    },
    CredsSubcommands::Set { username } => {
      let api_token = read_token(io::stdin().lock())?;
      let host = normalize_host(&jira_host);
      let provider = get_credential_provider(base_dirs.home_dir());

      provider.store_credentials(
        &host,
        &Credentials {
          username,
          password: api_token,
        },
      )?;
      print_success(&format!("Stored Jira credentials for {host}"));
      print_info(&format!("Credentials file: {}", provider.path().display()));
      Ok(())
    }
  }
}

/// Read the API token from the first line of `reader`
fn read_token(mut reader: impl BufRead) -> Result<String> {
  let mut line = String::new();
  reader.read_line(&mut line).context("Failed to read API token from stdin")?;

  let token = line.trim();
  if token.is_empty() {
    return Err(anyhow::anyhow!("No API token given on stdin"));
  }
  Ok(token.to_string())
}
