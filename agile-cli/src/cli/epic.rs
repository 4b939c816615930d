//! # Epic Command
//!
//! Derive-based implementation of the epic command: viewing epics and their
//! issues, updating epics, moving issues between epics, and ranking.

use agile_core::config::AgileConfig;
use agile_core::output::{print_success, print_warning};
use agile_jira::consts::MAX_ISSUES_PER_MOVE;
use agile_jira::{Epic, EpicRank, EpicTarget, Issue, IssueKeys, IssuesOptions, JiraClient, Pagination};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;
use tracing::debug;

use super::GlobalArgs;
use crate::clients::create_runtime_and_client;
use crate::render::{print_epic, print_issues, print_json};

/// Command for epic operations
#[derive(Args)]
pub struct EpicArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: EpicSubcommands,
}

/// Filters shared by the issue listing subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct IssueListArgs {
  /// Index of the first issue to return
  #[arg(long, value_name = "N")]
  pub start_at: Option<u32>,

  /// Maximum number of issues per page (defaults to page_size from the config)
  #[arg(long, value_name = "N")]
  pub max_results: Option<u32>,

  /// Only issues whose epic is (true) or isn't (false) done
  #[arg(long, value_name = "BOOL")]
  pub done: Option<bool>,

  /// JQL filter applied on top of the epic
  #[arg(long)]
  pub jql: Option<String>,

  /// Comma-separated list of fields to return
  #[arg(long, value_delimiter = ',')]
  pub fields: Vec<String>,

  /// Fetch every page instead of a single one
  #[arg(long)]
  pub all: bool,
}

impl IssueListArgs {
  fn to_options(&self, config: &AgileConfig) -> IssuesOptions {
    IssuesOptions {
      start_at: self.start_at,
      max_results: self.max_results.or(config.page_size),
      done: self.done,
      jql: self.jql.clone(),
      fields: self.fields.clone(),
      ..Default::default()
    }
  }
}

/// Subcommands for the epic command
#[derive(Subcommand)]
pub enum EpicSubcommands {
  /// Show an epic
  #[command(long_about = "Show the details of an epic.\n\n\
                   Displays the epic's id, key, name, summary, done flag and color.")]
  #[command(alias = "show")]
  Get {
    /// The epic id or key (e.g., 37 or PROJ-12)
    #[arg(required = true, index = 1)]
    epic: String,
  },

  /// List the issues of an epic
  #[command(long_about = "List the issues that belong to an epic, ordered by rank.\n\n\
                   Results are paged by Jira; use --start-at and --max-results to page\n\
                   through them or --all to fetch everything.")]
  Issues {
    /// The epic id or key
    #[arg(required = true, index = 1)]
    epic: String,

    #[command(flatten)]
    list: IssueListArgs,
  },

  /// List the issues that don't belong to any epic
  #[command(long_about = "List the issues that don't belong to any epic, ordered by rank.\n\n\
                   Accepts the same filters as 'agile epic issues'.")]
  Orphans {
    #[command(flatten)]
    list: IssueListArgs,
  },

  /// Partially update an epic
  #[command(long_about = "Update an epic's name, summary, color or done flag.\n\n\
                   Only the values given on the command line are sent; everything else\n\
                   is left untouched. Valid colors are color_1 through color_9.")]
  Update {
    /// The epic id or key
    #[arg(required = true, index = 1)]
    epic: String,

    /// New epic name
    #[arg(long)]
    name: Option<String>,

    /// New epic summary
    #[arg(long)]
    summary: Option<String>,

    /// New epic color (color_1 to color_9)
    #[arg(long)]
    color: Option<String>,

    /// Mark the epic as done
    #[arg(long)]
    done: bool,
  },

  /// Move issues to an epic
  #[command(long_about = "Move issues to an epic.\n\n\
                   Issues that already belong to another epic are taken out of it.\n\
                   Jira accepts at most 50 issues per request; longer lists are sent\n\
                   in batches.")]
  #[command(alias = "mv")]
  Move {
    /// The epic id or key
    #[arg(required = true, index = 1)]
    epic: String,

    /// Issue keys to move (e.g., PROJ-1 PROJ-2)
    #[arg(required = true, index = 2, num_args = 1..)]
    issues: Vec<String>,
  },

  /// Remove issues from their epic
  #[command(long_about = "Remove issues from whatever epic they belong to.\n\n\
                   Jira accepts at most 50 issues per request; longer lists are sent\n\
                   in batches.")]
  #[command(alias = "rm")]
  Remove {
    /// Issue keys to remove from their epic
    #[arg(required = true, index = 1, num_args = 1..)]
    issues: Vec<String>,
  },

  /// Rank an epic before or after another epic
  #[command(long_about = "Rank an epic relative to another epic.\n\n\
                   Give either --before or --after. Jira uses its default rank field\n\
                   unless --rank-field is set.")]
  Rank {
    /// The epic id or key to rank
    #[arg(required = true, index = 1)]
    epic: String,

    /// Rank after this epic
    #[arg(long, conflicts_with = "before", required_unless_present = "before")]
    after: Option<String>,

    /// Rank before this epic
    #[arg(long)]
    before: Option<String>,

    /// Id of the rank custom field
    #[arg(long, value_name = "FIELD_ID")]
    rank_field: Option<String>,
  },
}

/// Handle the epic command
pub(crate) fn handle_epic_command(global: &GlobalArgs, epic: EpicArgs) -> Result<()> {
  let (rt, client, config) = create_runtime_and_client(global.host.as_deref())?;

  match epic.subcommand {
    EpicSubcommands::Get { epic } => {
      let (epic, _) = rt
        .block_on(client.epics().get(&epic))
        .with_context(|| format!("Failed to get epic {epic}"))?;
      if global.json {
        print_json(&epic)
      } else {
        print_epic(&epic);
        Ok(())
      }
    }
    EpicSubcommands::Issues { epic, list } => {
      let target = EpicTarget::epic(&epic)?;
      let (issues, pagination) = rt
        .block_on(list_issues(&client, &target, &list.to_options(&config), list.all))
        .with_context(|| format!("Failed to list issues of epic {epic}"))?;
      render_issues(global, &format!("Issues in epic {epic}"), &issues, pagination.as_ref())
    }
    EpicSubcommands::Orphans { list } => {
      let (issues, pagination) = rt
        .block_on(list_issues(&client, &EpicTarget::NoEpic, &list.to_options(&config), list.all))
        .context("Failed to list issues without an epic")?;
      render_issues(global, "Issues without an epic", &issues, pagination.as_ref())
    }
    EpicSubcommands::Update {
      epic,
      name,
      summary,
      color,
      done,
    } => {
      let update = build_update(name, summary, color, done);
      if update == Epic::default() {
        print_warning("Nothing to update; pass --name, --summary, --color or --done");
        return Ok(());
      }

      let (updated, _) = rt
        .block_on(client.epics().partially_update(&epic, &update))
        .with_context(|| format!("Failed to update epic {epic}"))?;
      if global.json {
        print_json(&updated)
      } else {
        print_success(&format!("Updated epic {epic}"));
        print_epic(&updated);
        Ok(())
      }
    }
    EpicSubcommands::Move { epic, issues } => {
      let target = EpicTarget::epic(&epic)?;
      let outcome = rt.block_on(move_in_batches(&client, &target, &issues));
      report_move(global, &format!("to epic {epic}"), outcome)
    }
    EpicSubcommands::Remove { issues } => {
      let outcome = rt.block_on(move_in_batches(&client, &EpicTarget::NoEpic, &issues));
      report_move(global, "out of their epic", outcome)
    }
    EpicSubcommands::Rank {
      epic,
      after,
      before,
      rank_field,
    } => {
      let mut rank = EpicRank {
        rank_after_epic: after,
        rank_before_epic: before,
        ..Default::default()
      };
      if let Some(field) = rank_field.as_deref() {
        rank = rank.with_custom_field(field);
      }

      let (ranked, response) = rt
        .block_on(client.epics().rank(&epic, &rank))
        .with_context(|| format!("Failed to rank epic {epic}"))?;
      if global.json {
        return print_json(&json!({ "epic": epic, "ranked": ranked, "status": response.status.as_u16() }));
      }
      if ranked {
        print_success(&format!("Ranked epic {epic}"));
      } else {
        print_warning(&format!(
          "Jira answered {} instead of 204; the rank may not have been applied",
          response.status
        ));
      }
      Ok(())
    }
  }
}

/// Build the partial update body from command-line values
fn build_update(name: Option<String>, summary: Option<String>, color: Option<String>, done: bool) -> Epic {
  let mut update = Epic {
    name: name.unwrap_or_default(),
    summary: summary.unwrap_or_default(),
    done,
    ..Default::default()
  };
  if let Some(color) = color.as_deref() {
    update = update.with_color(color);
  }
  update
}

/// Fetch one page of issues, or every page when `all` is set
async fn list_issues(
  client: &JiraClient,
  target: &EpicTarget,
  options: &IssuesOptions,
  all: bool,
) -> Result<(Vec<Issue>, Option<Pagination>)> {
  let (mut issues, response) = client.epics().list_issues_of(target, options).await?;
  let mut pagination = response.pagination;
  if !all {
    return Ok((issues, pagination));
  }

  let first = options.start_at.unwrap_or(0);
  let mut options = options.clone();
  let mut returned = issues.len();
  while let Some(page) = pagination.filter(|page| returned > 0 && page.has_more(returned)) {
    let next = page.start_at + returned as u32;
    debug!("Fetching next page of issues for {} at {}", target, next);

    options.start_at = Some(next);
    let (more, response) = client.epics().list_issues_of(target, &options).await?;
    returned = more.len();
    pagination = response.pagination;
    issues.extend(more);
  }

  // Everything fetched is reported as one final page
  let pagination = pagination.map(|page| Pagination {
    start_at: first,
    max_results: issues.len() as u32,
    is_last: true,
    ..page
  });
  Ok((issues, pagination))
}

/// Result of moving issues, possibly over several requests
#[derive(Debug, Default)]
struct MoveOutcome {
  moved: Vec<String>,
  /// Batches Jira accepted without answering 204, with the status it sent
  unconfirmed: Vec<(Vec<String>, u16)>,
  /// Keys of the failed batch and of every batch after it
  not_moved: Vec<String>,
  /// Error that stopped the remaining batches
  error: Option<agile_jira::Error>,
}

/// Move issues to `target`, at most [`MAX_ISSUES_PER_MOVE`] per request.
///
/// Stops at the first failed request; batches sent before it stay in
/// `moved`/`unconfirmed`.
async fn move_in_batches(client: &JiraClient, target: &EpicTarget, issues: &[String]) -> MoveOutcome {
  let mut outcome = MoveOutcome::default();

  for (index, batch) in issues.chunks(MAX_ISSUES_PER_MOVE).enumerate() {
    let keys = IssueKeys::new(batch.iter().cloned());
    match client.epics().move_issues_to_target(target, &keys).await {
      Ok((true, _)) => outcome.moved.extend(keys.issues),
      Ok((false, response)) => outcome.unconfirmed.push((keys.issues, response.status.as_u16())),
      Err(e) => {
        outcome.not_moved = issues[index * MAX_ISSUES_PER_MOVE..].to_vec();
        outcome.error = Some(e);
        break;
      }
    }
  }

  outcome
}

fn report_move(global: &GlobalArgs, destination: &str, outcome: MoveOutcome) -> Result<()> {
  if global.json {
    let unconfirmed: Vec<_> = outcome
      .unconfirmed
      .iter()
      .map(|(issues, status)| json!({ "issues": issues, "status": status }))
      .collect();
    print_json(&json!({
      "moved": outcome.moved,
      "unconfirmed": unconfirmed,
      "not_moved": outcome.not_moved,
      "error": outcome.error.as_ref().map(ToString::to_string),
    }))?;
  } else {
    if !outcome.moved.is_empty() {
      print_success(&format!(
        "Moved {} {} {}",
        outcome.moved.len(),
        if outcome.moved.len() == 1 { "issue" } else { "issues" },
        destination
      ));
    }
    for (issues, status) in &outcome.unconfirmed {
      print_warning(&format!(
        "Jira answered {} instead of 204 for {}; the move may not have been applied",
        status,
        issues.join(", ")
      ));
    }
  }

  match outcome.error {
    Some(e) => Err(anyhow::Error::new(e).context(format!(
      "Failed to move {} {} {}: {}",
      outcome.not_moved.len(),
      if outcome.not_moved.len() == 1 { "issue" } else { "issues" },
      destination,
      outcome.not_moved.join(", ")
    ))),
    None => Ok(()),
  }
}

fn render_issues(global: &GlobalArgs, title: &str, issues: &[Issue], pagination: Option<&Pagination>) -> Result<()> {
  if global.json {
    return print_json(&json!({ "issues": issues, "pagination": pagination }));
  }
  print_issues(title, issues, pagination);
  Ok(())
}
