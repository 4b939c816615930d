//! # Jira Agile API Endpoints
//!
//! Endpoint implementations grouped by Agile resource: epics and boards.

use reqwest::StatusCode;
use tracing::warn;

use crate::models::Response;

pub mod boards;
pub mod epics;

#[cfg(test)]
mod tests;

/// Success check for write endpoints that answer without a body.
///
/// Only `204 No Content` counts as success. Other 2xx statuses are reported
/// as `false` so callers can decide what to do with them.
pub(crate) fn is_no_content(response: &Response) -> bool {
  if response.status == StatusCode::NO_CONTENT {
    return true;
  }
  warn!(
    "Expected HTTP 204 from Jira but got {}; reporting the write as unsuccessful",
    response.status
  );
  false
}
