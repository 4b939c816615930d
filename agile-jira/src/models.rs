use std::collections::HashMap;
use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::NO_EPIC_SEGMENT;
use crate::error::{Error, Result};

/// Represents Jira authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

impl fmt::Debug for JiraAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("JiraAuth")
      .field("username", &self.username)
      .field("api_token", &"<redacted>")
      .finish()
  }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

const fn is_zero(value: &i64) -> bool {
  *value == 0
}

const fn is_false(value: &bool) -> bool {
  !*value
}

/// Represents a Jira Agile epic.
///
/// Fields missing from a response decode to their zero value, and zero-valued
/// fields are left out when the epic is serialized. Sending an `Epic` to
/// [`partially_update`](crate::endpoints::epics::EpicsService::partially_update)
/// therefore only touches the fields that were actually set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Epic {
  #[serde(skip_serializing_if = "is_zero", deserialize_with = "null_as_default")]
  pub id: i64,
  #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
  pub key: String,
  #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
  pub name: String,
  #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
  pub summary: String,
  #[serde(
    rename = "self",
    skip_serializing_if = "String::is_empty",
    deserialize_with = "null_as_default"
  )]
  pub self_link: String,
  #[serde(skip_serializing_if = "is_false", deserialize_with = "null_as_default")]
  pub done: bool,
  /// Color metadata, e.g. `{"key": "color_4"}`. Valid keys are `color_1` to
  /// `color_9`.
  #[serde(skip_serializing_if = "HashMap::is_empty", deserialize_with = "null_as_default")]
  pub color: HashMap<String, String>,
}

impl Epic {
  /// Color key (`color_1`..`color_9`) if Jira reported one
  pub fn color_key(&self) -> Option<&str> {
    self.color.get("key").map(String::as_str)
  }

  /// Set the color key
  pub fn with_color(mut self, color_key: &str) -> Self {
    self.color.insert("key".to_string(), color_key.to_string());
    self
  }
}

/// Request body for ranking an epic before or after another epic.
///
/// Nothing is validated locally: a rank with every field unset is still sent
/// and Jira decides whether it is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpicRank {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rank_after_epic: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rank_before_epic: Option<String>,
  /// Rank field to use; Jira falls back to the default rank field when unset
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rank_custom_field_id: Option<String>,
}

impl EpicRank {
  /// Rank after the given epic
  pub fn after(epic: &str) -> Self {
    Self {
      rank_after_epic: Some(epic.to_string()),
      ..Default::default()
    }
  }

  /// Rank before the given epic
  pub fn before(epic: &str) -> Self {
    Self {
      rank_before_epic: Some(epic.to_string()),
      ..Default::default()
    }
  }

  /// Use a specific rank custom field
  pub fn with_custom_field(mut self, field_id: &str) -> Self {
    self.rank_custom_field_id = Some(field_id.to_string());
    self
  }
}

/// Which epic collection an operation addresses.
///
/// Jira uses the literal path segment `none` for "issues without an epic".
/// Keeping it as its own variant means a caller-supplied id can never be
/// mistaken for the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpicTarget {
  /// A real epic, by id or key
  Epic(String),
  /// Issues that don't belong to any epic
  NoEpic,
}

impl EpicTarget {
  /// Target a real epic, rejecting ids that collide with the sentinel or
  /// that URL resolution would treat as `.`/`..` path segments
  pub fn epic(id_or_key: &str) -> Result<Self> {
    if id_or_key.trim().eq_ignore_ascii_case(NO_EPIC_SEGMENT) {
      return Err(Error::ReservedEpicId(id_or_key.to_string()));
    }
    if matches!(id_or_key, "." | "..") {
      return Err(Error::InvalidEpicId(id_or_key.to_string()));
    }
    Ok(EpicTarget::Epic(id_or_key.to_string()))
  }

  /// Relative API path of the epic resource, e.g. `epic/EPIC-1`
  pub fn path(&self) -> String {
    match self {
      EpicTarget::Epic(id_or_key) => format!("epic/{}", urlencoding::encode(id_or_key)),
      EpicTarget::NoEpic => format!("epic/{NO_EPIC_SEGMENT}"),
    }
  }
}

impl fmt::Display for EpicTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EpicTarget::Epic(id_or_key) => f.write_str(id_or_key),
      EpicTarget::NoEpic => f.write_str("<no epic>"),
    }
  }
}

/// Filters for listing issues of an epic. Unset fields are left out of the
/// query string; ranges are validated by Jira, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuesOptions {
  /// Index of the first issue to return (0-based)
  pub start_at: Option<u32>,
  /// Page size; Jira defaults to 50
  pub max_results: Option<u32>,
  /// Only issues that are (or aren't) done
  pub done: Option<bool>,
  /// Additional JQL filter
  pub jql: Option<String>,
  /// Whether Jira should validate the JQL
  pub validate_query: Option<bool>,
  /// Issue fields to return
  pub fields: Vec<String>,
  /// Comma separated list of entities to expand
  pub expand: Option<String>,
}

impl IssuesOptions {
  pub fn with_start_at(mut self, start_at: u32) -> Self {
    self.start_at = Some(start_at);
    self
  }

  pub fn with_max_results(mut self, max_results: u32) -> Self {
    self.max_results = Some(max_results);
    self
  }

  pub fn with_done(mut self, done: bool) -> Self {
    self.done = Some(done);
    self
  }

  pub fn with_jql(mut self, jql: &str) -> Self {
    self.jql = Some(jql.to_string());
    self
  }
}

/// Filters for listing the epics of a board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpicsOptions {
  /// Index of the first epic to return (0-based)
  pub start_at: Option<u32>,
  /// Page size; Jira defaults to 50
  pub max_results: Option<u32>,
  /// Only epics that are (or aren't) done
  pub done: Option<bool>,
}

/// Paging data Jira returns alongside list results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
  pub start_at: u32,
  pub max_results: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub total: Option<u32>,
  pub is_last: bool,
}

impl Pagination {
  /// Whether another page follows one that returned `returned` values.
  ///
  /// Jira only sends `isLast` on some resources; `total` is used otherwise.
  pub fn has_more(&self, returned: usize) -> bool {
    if self.is_last {
      return false;
    }
    match self.total {
      Some(total) => (self.start_at as usize + returned) < total as usize,
      None => returned > 0 && returned >= self.max_results as usize,
    }
  }
}

/// A page of `values` as returned by Jira list resources
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page<T> {
  #[serde(flatten)]
  pub pagination: Pagination,
  #[serde(default = "Vec::new")]
  pub values: Vec<T>,
}

/// Page of epics returned for a board
pub type EpicWrap = Page<Epic>;

/// Page of issues returned for an epic. Jira names the array `issues` here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IssueWrap {
  #[serde(flatten)]
  pub pagination: Pagination,
  #[serde(default, alias = "values")]
  pub issues: Vec<Issue>,
}

/// Metadata about the HTTP exchange behind a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
  pub status: StatusCode,
  /// Paging data, set on list operations only
  pub pagination: Option<Pagination>,
}

impl Response {
  pub fn new(status: StatusCode) -> Self {
    Self {
      status,
      pagination: None,
    }
  }

  pub(crate) fn with_pagination(mut self, pagination: Pagination) -> Self {
    self.pagination = Some(pagination);
    self
  }
}

/// Represents a Jira issue as returned by the Agile API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
  pub id: String,
  pub key: String,
  #[serde(rename = "self", skip_serializing_if = "String::is_empty")]
  pub self_link: String,
  pub fields: IssueFields,
}

/// Represents Jira issue fields. Fields not modelled here are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueFields {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<IssueStatus>,
  #[serde(rename = "issuetype", skip_serializing_if = "Option::is_none")]
  pub issue_type: Option<IssueType>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignee: Option<JiraUser>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub epic: Option<Epic>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub flagged: Option<bool>,
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Represents a Jira issue status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueStatus {
  pub id: Option<String>,
  pub name: String,
}

/// Represents a Jira issue type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueType {
  pub id: Option<String>,
  pub name: String,
}

/// Represents a Jira user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JiraUser {
  pub account_id: Option<String>,
  pub display_name: String,
  pub email_address: Option<String>,
}

/// Request body naming the issues to move between epics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueKeys {
  pub issues: Vec<String>,
}

impl IssueKeys {
  pub fn new<I, S>(keys: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      issues: keys.into_iter().map(Into::into).collect(),
    }
  }

  pub fn len(&self) -> usize {
    self.issues.len()
  }

  pub fn is_empty(&self) -> bool {
    self.issues.is_empty()
  }
}
