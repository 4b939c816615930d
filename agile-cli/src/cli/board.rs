//! # Board Command
//!
//! Lists the epics of a Jira board.

use agile_jira::EpicsOptions;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use super::GlobalArgs;
use crate::clients::create_runtime_and_client;
use crate::render::{print_epics, print_json};

/// Command for board operations
#[derive(Args)]
pub struct BoardArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: BoardSubcommands,
}

/// Subcommands for the board command
#[derive(Subcommand)]
pub enum BoardSubcommands {
  /// List the epics of a board
  #[command(long_about = "List the epics that belong to a board.\n\n\
                   Use --done to show only finished (true) or unfinished (false) epics.")]
  Epics {
    /// The numeric board id
    #[arg(required = true, index = 1)]
    board: u64,

    /// Index of the first epic to return
    #[arg(long, value_name = "N")]
    start_at: Option<u32>,

    /// Maximum number of epics to return (defaults to page_size from the config)
    #[arg(long, value_name = "N")]
    max_results: Option<u32>,

    /// Only epics that are (true) or aren't (false) done
    #[arg(long, value_name = "BOOL")]
    done: Option<bool>,
  },
}

/// Handle the board command
pub(crate) fn handle_board_command(global: &GlobalArgs, board: BoardArgs) -> Result<()> {
  let (rt, client, config) = create_runtime_and_client(global.host.as_deref())?;

  match board.subcommand {
    BoardSubcommands::Epics {
      board,
      start_at,
      max_results,
      done,
    } => {
      let options = EpicsOptions {
        start_at,
        max_results: max_results.or(config.page_size),
        done,
      };

      let (epics, response) = rt
        .block_on(client.boards().list_epics(board, &options))
        .with_context(|| format!("Failed to list epics of board {board}"))?;

      if global.json {
        return print_json(&json!({ "epics": epics, "pagination": response.pagination }));
      }
      print_epics(&format!("Epics on board {board}"), &epics, response.pagination.as_ref());
      Ok(())
    }
  }
}
