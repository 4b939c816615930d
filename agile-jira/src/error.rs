//! Errors returned by the Jira Agile client.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Result alias used by every endpoint
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building, sending, or decoding a Jira request
#[derive(Debug, Error)]
pub enum Error {
  /// The relative endpoint path could not be joined onto the API base URL.
  #[error("Invalid request path '{path}': {source}")]
  InvalidUrl {
    path: String,
    #[source]
    source: url::ParseError,
  },
  /// An epic id or key collided with the "no epic" sentinel.
  #[error("'{0}' is reserved for issues without an epic and cannot be used as an epic id or key")]
  ReservedEpicId(String),
  /// An epic id that would not address a single epic resource.
  #[error("'{0}' is not a valid epic id or key")]
  InvalidEpicId(String),
  /// The request body could not be serialized.
  #[error("Failed to encode Jira request body")]
  Encode(#[source] serde_json::Error),
  /// The response body could not be deserialized.
  #[error("Failed to parse Jira response")]
  Decode(#[source] serde_json::Error),
  /// The request never produced a response.
  #[error("Failed to send request to Jira")]
  Http(#[from] reqwest::Error),
  /// Jira answered with a non-success status.
  #[error("Jira returned HTTP {status}{}", format_messages(.messages))]
  Api { status: StatusCode, messages: Vec<String> },
}

fn format_messages(messages: &[String]) -> String {
  if messages.is_empty() {
    String::new()
  } else {
    format!(": {}", messages.join("; "))
  }
}

/// Jira's standard error envelope
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ErrorBody {
  error_messages: Vec<String>,
  errors: BTreeMap<String, String>,
}

impl Error {
  /// Build an [`Error::Api`] from a status and the raw response body.
  ///
  /// Jira's `errorMessages` and per-field `errors` are flattened into
  /// `messages`; bodies that aren't Jira error JSON are kept as one message.
  pub fn from_response(status: StatusCode, body: &str) -> Self {
    let messages = match serde_json::from_str::<ErrorBody>(body) {
      Ok(parsed) => parsed
        .error_messages
        .into_iter()
        .chain(parsed.errors.into_iter().map(|(field, message)| format!("{field}: {message}")))
        .collect(),
      Err(_) if body.trim().is_empty() => Vec::new(),
      Err(_) => vec![body.trim().to_string()],
    };

    Error::Api { status, messages }
  }

  /// HTTP status of an API error
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Error::Api { status, .. } => Some(*status),
      Error::Http(err) => err.status(),
      _ => None,
    }
  }

  /// Whether Jira rejected the credentials
  pub fn is_unauthorized(&self) -> bool {
    matches!(self.status(), Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN))
  }

  /// Whether the epic, board, or issue doesn't exist (or isn't visible)
  pub fn is_not_found(&self) -> bool {
    self.status() == Some(StatusCode::NOT_FOUND)
  }
}
