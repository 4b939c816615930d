//! Board endpoints that surface epics.

use reqwest::Method;
use tracing::{debug, instrument};

use crate::client::JiraClient;
use crate::error::Result;
use crate::models::{Epic, EpicWrap, EpicsOptions, Response};
use crate::query::QueryParams;

/// Board operations, obtained from [`JiraClient::boards`]
#[derive(Clone, Copy)]
pub struct BoardsService<'a> {
  client: &'a JiraClient,
}

impl<'a> BoardsService<'a> {
  pub(crate) const fn new(client: &'a JiraClient) -> Self {
    Self { client }
  }

  /// List the epics on a board, copying Jira's paging data onto the returned
  /// [`Response`].
  ///
  /// `GET /rest/agile/1.0/board/{boardId}/epic`
  #[instrument(skip(self), level = "debug")]
  pub async fn list_epics(&self, board_id: u64, options: &EpicsOptions) -> Result<(Vec<Epic>, Response)> {
    let path = format!("board/{board_id}/epic{}", options.to_query_string());
    let request = self.client.new_request(Method::GET, &path)?;

    let (wrap, response) = self.client.do_request::<EpicWrap>(request).await?;
    debug!("Received {} epics for board {}", wrap.values.len(), board_id);

    Ok((wrap.values, response.with_pagination(wrap.pagination)))
  }
}
