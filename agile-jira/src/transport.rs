//! # Jira HTTP Transport
//!
//! The seam between endpoint code and the network. Endpoints only know how
//! to turn an operation into an [`ApiRequest`] and decode a [`RawResponse`];
//! a [`Transport`] resolves paths against the API base URL and performs the
//! exchange. [`HttpTransport`] is the reqwest-backed implementation used in
//! production.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, header};
use tracing::{debug, trace, warn};
use url::Url;

use crate::consts::{JSON_CONTENT_TYPE, USER_AGENT};
use crate::error::{Error, Result};
use crate::models::JiraAuth;

/// A fully resolved request, ready to be executed
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
  pub method: Method,
  pub url: Url,
  pub body: Option<serde_json::Value>,
}

/// Status and undecoded body of a successful exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
  pub status: StatusCode,
  pub body: String,
}

impl RawResponse {
  pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
    Self {
      status,
      body: body.into(),
    }
  }
}

/// Builds and executes requests against the Jira Agile API
#[async_trait]
pub trait Transport: Send + Sync {
  /// Resolve `path` (relative to the API base, query included) into a request
  fn new_request(&self, method: Method, path: &str, body: Option<serde_json::Value>) -> Result<ApiRequest>;

  /// Perform a single exchange.
  ///
  /// Non-2xx statuses are reported as [`Error::Api`].
  async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// Join a relative endpoint path onto the API base URL
pub(crate) fn resolve(base_url: &Url, path: &str) -> Result<Url> {
  base_url.join(path).map_err(|source| Error::InvalidUrl {
    path: path.to_string(),
    source,
  })
}

/// reqwest-backed [`Transport`] using Basic authentication
pub struct HttpTransport {
  client: Client,
  base_url: Url,
  auth: JiraAuth,
}

impl HttpTransport {
  /// Create a transport for the API rooted at `base_url`
  pub fn new(base_url: Url, auth: JiraAuth) -> Self {
    Self::with_client(Client::new(), base_url, auth)
  }

  /// Create a transport whose requests time out after `timeout`
  pub fn with_timeout(base_url: Url, auth: JiraAuth, timeout: Duration) -> Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self::with_client(client, base_url, auth))
  }

  /// Create a transport around an existing reqwest client
  pub fn with_client(client: Client, base_url: Url, auth: JiraAuth) -> Self {
    Self {
      client,
      base_url,
      auth,
    }
  }

  /// API base URL every path is resolved against
  pub fn base_url(&self) -> &Url {
    &self.base_url
  }
}

#[async_trait]
impl Transport for HttpTransport {
  fn new_request(&self, method: Method, path: &str, body: Option<serde_json::Value>) -> Result<ApiRequest> {
    let url = resolve(&self.base_url, path)?;
    Ok(ApiRequest { method, url, body })
  }

  async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
    trace!("Jira API request: {} {}", request.method, request.url);

    let mut builder = self
      .client
      .request(request.method.clone(), request.url.clone())
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .header(header::ACCEPT, JSON_CONTENT_TYPE)
      .header(header::USER_AGENT, USER_AGENT);
    if let Some(body) = &request.body {
      builder = builder.json(body);
    }

    let response = builder.send().await?;
    let status = response.status();
    debug!("Jira API response status: {}", status);

    let body = response.text().await?;
    if !status.is_success() {
      warn!("Jira API error for {} {}: HTTP {}", request.method, request.url, status);
      return Err(Error::from_response(status, &body));
    }

    Ok(RawResponse { status, body })
  }
}
