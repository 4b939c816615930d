//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the agile tool:
//! epic and board operations against Jira, plus local configuration and
//! credential management.

mod board;
mod config;
mod creds;
mod epic;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Args, Parser, Subcommand};

use agile_core::output::ColorMode;

/// Top-level CLI command for the agile tool
#[derive(Parser)]
#[command(name = "agile")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Work with Jira Agile epics and boards from the terminal")]
#[command(
  long_about = "Agile talks to the Jira Agile REST API to inspect and organize epics.\n\n\
        It can show epics and their issues, move issues between epics, rank epics\n\
        against each other, and list the epics of a board."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  #[command(flatten)]
  pub global: GlobalArgs,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Options shared by every command that talks to Jira
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
  /// Jira host (e.g. company.atlassian.net); overrides $JIRA_HOST and the config file.
  /// With 'config set' it becomes the stored default host.
  #[arg(long, global = true, value_name = "HOST")]
  pub host: Option<String>,

  /// Print results as JSON instead of formatted text
  #[arg(long, global = true)]
  pub json: bool,
}

/// Subcommands for the agile tool
#[derive(Subcommand)]
pub enum Commands {
  /// Board operations
  #[command(long_about = "Inspect Jira boards.\n\n\
            Lists the epics that belong to a board, optionally filtered by\n\
            whether they are done.")]
  Board(board::BoardArgs),

  /// Configuration management
  #[command(long_about = "Show or change settings stored in agile.toml.\n\n\
            The config file holds the default Jira host, the Agile API path,\n\
            the request timeout and the default page size.")]
  #[command(arg_required_else_help = true)]
  Config(config::ConfigArgs),

  /// Credential management
  #[command(long_about = "Check or store Jira credentials.\n\n\
            Credentials are kept in your .netrc file, keyed by Jira host. An entry\n\
            for 'atlassian.net' is used as a fallback for every Atlassian Cloud site.")]
  #[command(arg_required_else_help = true)]
  Creds(creds::CredsArgs),

  /// Epic operations
  #[command(long_about = "Inspect and organize Jira epics.\n\n\
            Show an epic, list its issues or the issues without any epic, update\n\
            its name, summary or color, move issues in and out of epics, and rank\n\
            epics against each other.")]
  #[command(alias = "e")]
  Epic(epic::EpicArgs),
}

/// Handle the parsed CLI command
pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  match cli.command {
    Commands::Board(board) => board::handle_board_command(&cli.global, board),
    Commands::Config(config) => config::handle_config_command(&cli.global, config),
    Commands::Creds(creds) => creds::handle_creds_command(&cli.global, creds),
    Commands::Epic(epic) => epic::handle_epic_command(&cli.global, epic),
  }
}
