use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::client::JiraClient;
use crate::error::{Error, Result};
use crate::transport::{ApiRequest, RawResponse, Transport, resolve};

pub const BASE_URL: &str = "https://jira.example.com/rest/agile/1.0/";

/// In-memory transport that records every request and replays queued
/// responses in order
pub struct FakeTransport {
  base_url: Url,
  requests: Mutex<Vec<ApiRequest>>,
  responses: Mutex<VecDeque<Result<RawResponse>>>,
}

impl FakeTransport {
  pub fn new() -> Arc<Self> {
    Arc::new(Self {
      base_url: Url::parse(BASE_URL).unwrap(),
      requests: Mutex::new(Vec::new()),
      responses: Mutex::new(VecDeque::new()),
    })
  }

  pub fn respond(&self, status: StatusCode, body: &str) {
    self
      .responses
      .lock()
      .unwrap()
      .push_back(Ok(RawResponse::new(status, body)));
  }

  pub fn respond_error(&self, status: StatusCode, body: &str) {
    self
      .responses
      .lock()
      .unwrap()
      .push_back(Err(Error::from_response(status, body)));
  }

  pub fn requests(&self) -> Vec<ApiRequest> {
    self.requests.lock().unwrap().clone()
  }

  pub fn single_request(&self) -> ApiRequest {
    let requests = self.requests();
    assert_eq!(requests.len(), 1, "expected exactly one request, got {requests:?}");
    requests.into_iter().next().unwrap()
  }
}

#[async_trait]
impl Transport for FakeTransport {
  fn new_request(&self, method: Method, path: &str, body: Option<serde_json::Value>) -> Result<ApiRequest> {
    let url = resolve(&self.base_url, path)?;
    Ok(ApiRequest { method, url, body })
  }

  async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
    self.requests.lock().unwrap().push(request);
    self
      .responses
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Ok(RawResponse::new(StatusCode::NO_CONTENT, "")))
  }
}

pub fn fake_client() -> (JiraClient, Arc<FakeTransport>) {
  let transport = FakeTransport::new();
  let client = JiraClient::with_transport(transport.clone());
  (client, transport)
}
