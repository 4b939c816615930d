//! # Jira Epic Endpoints
//!
//! Epic operations of the Jira Agile API: fetching and partially updating an
//! epic, listing its issues, moving issues in and out of epics, and ranking.
//! Every method performs exactly one HTTP exchange.

use reqwest::Method;
use tracing::{debug, info, instrument, warn};

use crate::client::JiraClient;
use crate::consts::MAX_ISSUES_PER_MOVE;
use crate::endpoints::is_no_content;
use crate::error::Result;
use crate::models::{Epic, EpicRank, EpicTarget, Issue, IssueKeys, IssueWrap, IssuesOptions, Response};
use crate::query::QueryParams;

/// Epic operations, obtained from [`JiraClient::epics`]
#[derive(Clone, Copy)]
pub struct EpicsService<'a> {
  client: &'a JiraClient,
}

impl<'a> EpicsService<'a> {
  pub(crate) const fn new(client: &'a JiraClient) -> Self {
    Self { client }
  }

  /// Get an epic by id or key.
  ///
  /// `GET /rest/agile/1.0/epic/{epicIdOrKey}`
  #[instrument(skip(self), level = "debug")]
  pub async fn get(&self, id_or_key: &str) -> Result<(Epic, Response)> {
    let target = EpicTarget::epic(id_or_key)?;
    let request = self.client.new_request(Method::GET, &target.path())?;
    self.client.do_request(request).await
  }

  /// List the issues that belong to an epic, ordered by rank.
  ///
  /// `GET /rest/agile/1.0/epic/{epicIdOrKey}/issue`
  #[instrument(skip(self), level = "debug")]
  pub async fn list_issues(&self, id_or_key: &str, options: &IssuesOptions) -> Result<(Vec<Issue>, Response)> {
    let target = EpicTarget::epic(id_or_key)?;
    self.list_issues_of(&target, options).await
  }

  /// List the issues that don't belong to any epic, ordered by rank.
  ///
  /// `GET /rest/agile/1.0/epic/none/issue`
  #[instrument(skip(self), level = "debug")]
  pub async fn list_issues_without_epic(&self, options: &IssuesOptions) -> Result<(Vec<Issue>, Response)> {
    self.list_issues_of(&EpicTarget::NoEpic, options).await
  }

  /// List the issues of `target`, copying Jira's paging data onto the
  /// returned [`Response`]
  pub async fn list_issues_of(&self, target: &EpicTarget, options: &IssuesOptions) -> Result<(Vec<Issue>, Response)> {
    let path = format!("{}/issue{}", target.path(), options.to_query_string());
    let request = self.client.new_request(Method::GET, &path)?;

    let (wrap, response) = self.client.do_request::<IssueWrap>(request).await?;
    debug!("Received {} issues for {}", wrap.issues.len(), target);

    Ok((wrap.issues, response.with_pagination(wrap.pagination)))
  }

  /// Partially update an epic. Only the fields set on `epic` are sent; Jira
  /// leaves everything else untouched. Valid colors are `color_1` to
  /// `color_9`.
  ///
  /// `POST /rest/agile/1.0/epic/{epicIdOrKey}`
  #[instrument(skip(self, epic), level = "debug")]
  pub async fn partially_update(&self, id_or_key: &str, epic: &Epic) -> Result<(Epic, Response)> {
    let target = EpicTarget::epic(id_or_key)?;
    let request = self.client.new_json_request(Method::POST, &target.path(), epic)?;
    let (updated, response) = self.client.do_request::<Epic>(request).await?;
    info!("Updated epic {}", target);
    Ok((updated, response))
  }

  /// Move issues to an epic. An issue can only be in one epic, so issues
  /// already in another epic are taken out of it. Jira accepts at most 50
  /// issues per call.
  ///
  /// Returns `true` only when Jira answers `204 No Content`.
  ///
  /// `POST /rest/agile/1.0/epic/{epicIdOrKey}/issue`
  #[instrument(skip(self, issue_keys), level = "debug")]
  pub async fn move_issues_to(&self, id_or_key: &str, issue_keys: &IssueKeys) -> Result<(bool, Response)> {
    let target = EpicTarget::epic(id_or_key)?;
    self.move_issues_to_target(&target, issue_keys).await
  }

  /// Remove issues from whatever epic they belong to. Same contract as
  /// [`move_issues_to`](Self::move_issues_to), aimed at the "no epic"
  /// collection.
  ///
  /// `POST /rest/agile/1.0/epic/none/issue`
  #[instrument(skip(self, issue_keys), level = "debug")]
  pub async fn remove_issues_from(&self, issue_keys: &IssueKeys) -> Result<(bool, Response)> {
    self.move_issues_to_target(&EpicTarget::NoEpic, issue_keys).await
  }

  /// Move issues to `target`
  pub async fn move_issues_to_target(&self, target: &EpicTarget, issue_keys: &IssueKeys) -> Result<(bool, Response)> {
    if issue_keys.len() > MAX_ISSUES_PER_MOVE {
      warn!(
        "Moving {} issues in one request; Jira accepts at most {}",
        issue_keys.len(),
        MAX_ISSUES_PER_MOVE
      );
    }

    let path = format!("{}/issue", target.path());
    let request = self.client.new_json_request(Method::POST, &path, issue_keys)?;
    let response = self.client.do_request_empty(request).await?;

    let moved = is_no_content(&response);
    if moved {
      info!("Moved {} issues to {}", issue_keys.len(), target);
    }
    Ok((moved, response))
  }

  /// Rank an epic before or after another epic. When no custom rank field is
  /// given Jira uses the default rank field.
  ///
  /// Returns `true` only when Jira answers `204 No Content`.
  ///
  /// `PUT /rest/agile/1.0/epic/{epicIdOrKey}/rank`
  #[instrument(skip(self), level = "debug")]
  pub async fn rank(&self, id_or_key: &str, rank: &EpicRank) -> Result<(bool, Response)> {
    let target = EpicTarget::epic(id_or_key)?;
    let path = format!("{}/rank", target.path());
    let request = self.client.new_json_request(Method::PUT, &path, rank)?;
    let response = self.client.do_request_empty(request).await?;
    Ok((is_no_content(&response), response))
  }
}
