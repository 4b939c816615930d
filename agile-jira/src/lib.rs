//! # Jira Agile API Client
//!
//! Typed access to the epic and board resources of the Jira Agile REST API
//! (`/rest/agile/1.0`). [`JiraClient`] owns a [`Transport`]; per-resource
//! services borrow the client and turn each operation into exactly one HTTP
//! exchange.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use agile_jira::{IssueKeys, IssuesOptions, create_jira_client};
//!
//! let client = create_jira_client("company.atlassian.net", "me@example.com", "api-token")?;
//! let (issues, response) = client
//!   .epics()
//!   .list_issues("EPIC-1", &IssuesOptions::default().with_max_results(20))
//!   .await?;
//! println!("{} issues, more: {:?}", issues.len(), response.pagination);
//!
//! let (moved, _) = client.epics().move_issues_to("EPIC-2", &IssueKeys::new(["PROJ-7"])).await?;
//! assert!(moved);
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod client;
pub mod consts;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod query;
pub mod transport;

// Re-export the client
pub use client::{JiraClient, create_jira_client};
pub use endpoints::boards::BoardsService;
pub use endpoints::epics::EpicsService;
pub use error::{Error, Result};
// Re-export models
pub use models::{
  Epic, EpicRank, EpicTarget, EpicWrap, EpicsOptions, Issue, IssueFields, IssueKeys, IssueStatus, IssueType,
  IssueWrap, IssuesOptions, JiraAuth, JiraUser, Page, Pagination, Response,
};
pub use query::QueryParams;
pub use transport::{ApiRequest, HttpTransport, RawResponse, Transport};
