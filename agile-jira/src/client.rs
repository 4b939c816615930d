use std::fmt;
use std::sync::Arc;

use agile_core::config::AgileConfig;
use agile_core::url::{DEFAULT_AGILE_API_PATH, agile_api_url};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::endpoints::boards::BoardsService;
use crate::endpoints::epics::EpicsService;
use crate::error::{Error, Result};
use crate::models::{JiraAuth, Response};
use crate::transport::{ApiRequest, HttpTransport, RawResponse, Transport};

/// Represents a Jira Agile API client.
///
/// Cloning is cheap; clones share the same transport.
#[derive(Clone)]
pub struct JiraClient {
  pub(crate) transport: Arc<dyn Transport>,
}

impl fmt::Debug for JiraClient {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("JiraClient").finish_non_exhaustive()
  }
}

impl JiraClient {
  /// Create a new Jira client for `base_url` (the Jira host) using the default
  /// Agile API path
  pub fn new(base_url: &str, auth: JiraAuth) -> anyhow::Result<Self> {
    let api_url = agile_api_url(base_url, DEFAULT_AGILE_API_PATH)?;
    Ok(Self::with_transport(Arc::new(HttpTransport::new(api_url, auth))))
  }

  /// Create a Jira client honoring the API path and timeout from `config`
  pub fn with_config(base_url: &str, auth: JiraAuth, config: &AgileConfig) -> anyhow::Result<Self> {
    let api_url = agile_api_url(base_url, &config.api_path)?;
    let transport = match config.timeout() {
      Some(timeout) => HttpTransport::with_timeout(api_url, auth, timeout)?,
      None => HttpTransport::new(api_url, auth),
    };
    Ok(Self::with_transport(Arc::new(transport)))
  }

  /// Create a Jira client on top of a custom transport
  pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
    Self { transport }
  }

  /// Epic operations
  pub fn epics(&self) -> EpicsService<'_> {
    EpicsService::new(self)
  }

  /// Board operations
  pub fn boards(&self) -> BoardsService<'_> {
    BoardsService::new(self)
  }

  /// Build a request without a body
  pub(crate) fn new_request(&self, method: Method, path: &str) -> Result<ApiRequest> {
    self.transport.new_request(method, path, None)
  }

  /// Build a request carrying `body` as JSON
  pub(crate) fn new_json_request<B: Serialize + ?Sized>(
    &self,
    method: Method,
    path: &str,
    body: &B,
  ) -> Result<ApiRequest> {
    let body = serde_json::to_value(body).map_err(Error::Encode)?;
    self.transport.new_request(method, path, Some(body))
  }

  /// Execute `request` and decode the response body into `T`
  pub(crate) async fn do_request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<(T, Response)> {
    let RawResponse { status, body } = self.transport.execute(request).await?;
    trace!("Jira API response body: {}", body);

    let value = serde_json::from_str::<T>(&body).map_err(Error::Decode)?;
    Ok((value, Response::new(status)))
  }

  /// Execute `request`, ignoring any response body
  pub(crate) async fn do_request_empty(&self, request: ApiRequest) -> Result<Response> {
    let raw = self.transport.execute(request).await?;
    Ok(Response::new(raw.status))
  }
}

/// Create a Jira client from credentials
pub fn create_jira_client(base_url: &str, username: &str, api_token: &str) -> anyhow::Result<JiraClient> {
  let auth = JiraAuth {
    username: username.to_string(),
    api_token: api_token.to_string(),
  };

  JiraClient::new(base_url, auth)
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use wiremock::matchers::{basic_auth, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::models::Epic;

  #[tokio::test]
  async fn test_jira_client_uses_agile_api_path() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    Mock::given(method("GET"))
      .and(path("/rest/agile/1.0/epic/EPIC-1"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 1, "key": "EPIC-1" })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let request = client.new_request(Method::GET, "epic/EPIC-1")?;
    let (epic, response): (Epic, Response) = client.do_request(request).await?;

    assert_eq!(epic.key, "EPIC-1");
    assert_eq!(response.status, reqwest::StatusCode::OK);
    assert!(response.pagination.is_none());
    Ok(())
  }

  #[tokio::test]
  async fn test_jira_client_with_config_api_path() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let auth = JiraAuth {
      username: "test_user".to_string(),
      api_token: "test_token".to_string(),
    };
    let config = AgileConfig {
      api_path: "jira/rest/agile/latest".to_string(),
      timeout_secs: Some(5),
      ..Default::default()
    };
    let client = JiraClient::with_config(&mock_server.uri(), auth, &config)?;

    Mock::given(method("GET"))
      .and(path("/jira/rest/agile/latest/epic/7"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 7 })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let (epic, _) = client.epics().get("7").await?;
    assert_eq!(epic.id, 7);
    assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    Ok(())
  }

  #[tokio::test]
  async fn test_do_request_reports_malformed_body() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    Mock::given(method("GET"))
      .and(path("/rest/agile/1.0/epic/EPIC-1"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
      .mount(&mock_server)
      .await;

    let request = client.new_request(Method::GET, "epic/EPIC-1")?;
    let result: Result<(Epic, Response)> = client.do_request(request).await;

    assert!(matches!(result, Err(Error::Decode(_))));
    Ok(())
  }

  #[test]
  fn test_jira_client_debug_hides_transport() {
    let client = create_jira_client("company.atlassian.net", "user", "secret-token").unwrap();
    let debug = format!("{client:?}");

    assert_eq!(debug, "JiraClient { .. }");
    assert!(!debug.contains("secret-token"));
    assert!(create_jira_client("", "user", "token").unwrap_err().to_string().contains("Host cannot be empty"));
  }

  #[test]
  fn test_create_jira_client_rejects_empty_host() {
    assert!(create_jira_client("  ", "user", "token").is_err());
  }
}
