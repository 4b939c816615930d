//! # Config Command
//!
//! Shows and edits the settings stored in `agile.toml`.

use agile_core::config::get_config_dirs;
use agile_core::output::{print_header, print_info, print_success, print_warning};
use agile_core::url::ensure_url_scheme;
use anyhow::Result;
use clap::{Args, Subcommand};

use super::GlobalArgs;
use crate::render::print_json;

/// Command for configuration management
#[derive(Args)]
pub struct ConfigArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: ConfigSubcommands,
}

/// Subcommands for the config command
#[derive(Subcommand)]
pub enum ConfigSubcommands {
  /// Show the current configuration
  Show,

  /// Change configuration values
  #[command(long_about = "Change values in agile.toml.\n\n\
                   Only the options given are changed; the global --host option sets the\n\
                   default Jira host. The file and its directory are created when missing.")]
  Set {
    /// Agile REST API path relative to the host
    #[arg(long, value_name = "PATH")]
    api_path: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Default page size for list commands
    #[arg(long, value_name = "N")]
    page_size: Option<u32>,
  },
}

/// Handle the config command
pub(crate) fn handle_config_command(global: &GlobalArgs, config: ConfigArgs) -> Result<()> {
  let config_dirs = get_config_dirs()?;

  match config.subcommand {
    ConfigSubcommands::Show => {
      let current = config_dirs.load_config()?;
      if global.json {
        return print_json(&current);
      }

      print_header("Configuration");
      print_info(&format!("Config file: {}", config_dirs.config_path().display()));
      println!("  {:<10} {}", "Host:", current.jira_host.as_deref().unwrap_or("(not set)"));
      println!("  {:<10} {}", "API path:", current.api_path);
      match current.timeout_secs {
        Some(secs) => println!("  {:<10} {}s", "Timeout:", secs),
        None => println!("  {:<10} (none)", "Timeout:"),
      }
      match current.page_size {
        Some(size) => println!("  {:<10} {}", "Page size:", size),
        None => println!("  {:<10} (Jira default)", "Page size:"),
      }
      Ok(())
    }
    ConfigSubcommands::Set {
      api_path,
      timeout,
      page_size,
    } => {
      let host = global.host.as_deref();
      if host.is_none() && api_path.is_none() && timeout.is_none() && page_size.is_none() {
        print_warning("Nothing to change; pass --host, --api-path, --timeout or --page-size");
        return Ok(());
      }

      let mut current = config_dirs.load_config()?;
      if let Some(host) = host {
        current.jira_host = Some(ensure_url_scheme(host)?);
      }
      if let Some(api_path) = api_path {
        current.api_path = api_path;
      }
      if let Some(timeout) = timeout {
        current.timeout_secs = Some(timeout);
      }
      if let Some(page_size) = page_size {
        current.page_size = Some(page_size);
      }

      config_dirs.save_config(&current)?;
      print_success(&format!("Saved configuration to {}", config_dirs.config_path().display()));
      Ok(())
    }
  }
}
