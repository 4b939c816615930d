//! Terminal rendering of epics and issues.

use agile_core::output::{format_done, format_key, print_header, print_info};
use agile_jira::{Epic, Issue, Pagination};
use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

/// Print `value` as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")?;
  println!("{json}");
  Ok(())
}

/// One-line summary of an epic
pub(crate) fn epic_line(epic: &Epic) -> String {
  let key = if epic.key.is_empty() {
    epic.id.to_string()
  } else {
    epic.key.clone()
  };

  let mut line = format!("{} {} [{}]", format_key(&key), epic.name, format_done(epic.done));
  if let Some(color) = epic.color_key() {
    line.push_str(&format!(" ({color})"));
  }
  line
}

/// One-line summary of an issue
pub(crate) fn issue_line(issue: &Issue) -> String {
  let status = issue
    .fields
    .status
    .as_ref()
    .map(|status| status.name.as_str())
    .unwrap_or("-");
  let summary = issue.fields.summary.as_deref().unwrap_or("");

  format!(
    "{} {} {}",
    format_key(&issue.key),
    format!("[{status}]").if_supports_color(Stream::Stdout, |t| t.yellow()),
    summary
  )
}

/// Print the details of a single epic
pub(crate) fn print_epic(epic: &Epic) {
  print_header(&format!("Epic {}", if epic.key.is_empty() { &epic.name } else { &epic.key }));
  println!("  {:<8} {}", "Id:", epic.id);
  println!("  {:<8} {}", "Name:", epic.name);
  if !epic.summary.is_empty() {
    println!("  {:<8} {}", "Summary:", epic.summary);
  }
  println!("  {:<8} {}", "Status:", format_done(epic.done));
  if let Some(color) = epic.color_key() {
    println!("  {:<8} {}", "Color:", color);
  }
  if !epic.self_link.is_empty() {
    println!("  {:<8} {}", "Link:", epic.self_link);
  }
}

/// Print a list of issues followed by a paging hint
pub(crate) fn print_issues(title: &str, issues: &[Issue], pagination: Option<&Pagination>) {
  print_header(title);
  if issues.is_empty() {
    print_info("No issues found");
    return;
  }

  for issue in issues {
    println!("  {}", issue_line(issue));
  }
  if let Some(hint) = pagination.and_then(|page| paging_hint(page, issues.len())) {
    print_info(&hint);
  }
}

/// Print a list of epics followed by a paging hint
pub(crate) fn print_epics(title: &str, epics: &[Epic], pagination: Option<&Pagination>) {
  print_header(title);
  if epics.is_empty() {
    print_info("No epics found");
    return;
  }

  for epic in epics {
    println!("  {}", epic_line(epic));
  }
  if let Some(hint) = pagination.and_then(|page| paging_hint(page, epics.len())) {
    print_info(&hint);
  }
}

/// Tell the user how to fetch the next page, if there is one
pub(crate) fn paging_hint(pagination: &Pagination, returned: usize) -> Option<String> {
  if !pagination.has_more(returned) {
    return None;
  }

  let next = pagination.start_at as usize + returned;
  Some(match pagination.total {
    Some(total) => format!("Showing {returned} of {total}; use --start-at {next} for more"),
    None => format!("More results available; use --start-at {next} for more"),
  })
}
