use reqwest::{Method, StatusCode};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::support::fake_client;
use crate::client::create_jira_client;
use crate::error::Error;
use crate::models::{Epic, EpicRank, EpicTarget, IssueKeys, IssuesOptions};

const EPIC_BODY: &str = r#"{
  "id": 37,
  "key": "EPIC-37",
  "self": "https://jira.example.com/rest/agile/1.0/epic/37",
  "name": "Platform",
  "summary": "Platform work",
  "color": { "key": "color_4" },
  "done": true
}"#;

#[tokio::test]
async fn test_get_epic_issues_one_get() -> anyhow::Result<()> {
  let (client, transport) = fake_client();
  transport.respond(StatusCode::OK, EPIC_BODY);

  let (epic, response) = client.epics().get("EPIC-37").await?;

  let request = transport.single_request();
  assert_eq!(request.method, Method::GET);
  assert_eq!(
    request.url.as_str(),
    "https://jira.example.com/rest/agile/1.0/epic/EPIC-37"
  );
  assert!(request.body.is_none());

  assert_eq!(response.status, StatusCode::OK);
  assert!(response.pagination.is_none());
  assert_eq!(epic.id, 37);
  assert_eq!(epic.key, "EPIC-37");
  assert_eq!(epic.self_link, "https://jira.example.com/rest/agile/1.0/epic/37");
  assert_eq!(epic.name, "Platform");
  assert_eq!(epic.summary, "Platform work");
  assert_eq!(epic.color_key(), Some("color_4"));
  assert!(epic.done);
  Ok(())
}

#[tokio::test]
async fn test_get_epic_by_numeric_id_and_escaped_key() -> anyhow::Result<()> {
  let (client, transport) = fake_client();
  transport.respond(StatusCode::OK, r#"{"id": 42}"#);
  transport.respond(StatusCode::OK, r#"{"id": 43}"#);

  client.epics().get("42").await?;
  client.epics().get("odd key/1").await?;

  let requests = transport.requests();
  assert_eq!(requests.len(), 2);
  assert_eq!(requests[0].url.path(), "/rest/agile/1.0/epic/42");
  assert_eq!(requests[1].url.path(), "/rest/agile/1.0/epic/odd%20key%2F1");
  Ok(())
}

#[tokio::test]
async fn test_get_epic_rejects_reserved_id() {
  let (client, transport) = fake_client();

  for id in ["none", "NONE", " None "] {
    let error = client.epics().get(id).await.unwrap_err();
    assert!(matches!(error, Error::ReservedEpicId(_)), "{id}: {error}");
  }

  assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_dot_segment_ids_never_reach_transport() {
  let (client, transport) = fake_client();

  let error = client.epics().get("..").await.unwrap_err();
  assert!(matches!(error, Error::InvalidEpicId(_)));

  let error = client
    .epics()
    .list_issues(".", &IssuesOptions::default())
    .await
    .unwrap_err();
  assert!(matches!(error, Error::InvalidEpicId(_)));

  assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_get_epic_propagates_transport_error() {
  let (client, transport) = fake_client();
  transport.respond_error(
    StatusCode::NOT_FOUND,
    r#"{"errorMessages": ["Epic does not exist"], "errors": {}}"#,
  );

  let error = client.epics().get("EPIC-404").await.unwrap_err();
  assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
  assert_eq!(error.to_string(), "Jira returned HTTP 404 Not Found: Epic does not exist");
}

#[tokio::test]
async fn test_list_issues_query_and_pagination() -> anyhow::Result<()> {
  let (client, transport) = fake_client();
  transport.respond(
    StatusCode::OK,
    r#"{
      "expand": "names,schema",
      "startAt": 50,
      "maxResults": 2,
      "total": 53,
      "issues": [
        { "id": "10001", "key": "PROJ-1", "fields": { "summary": "First", "status": { "name": "To Do" } } },
        { "id": "10002", "key": "PROJ-2", "fields": { "summary": "Second", "flagged": true } }
      ]
    }"#,
  );

  let options = IssuesOptions::default()
    .with_start_at(50)
    .with_max_results(2)
    .with_done(false);
  let (issues, response) = client.epics().list_issues("EPIC-37", &options).await?;

  let request = transport.single_request();
  assert_eq!(request.method, Method::GET);
  assert_eq!(request.url.path(), "/rest/agile/1.0/epic/EPIC-37/issue");
  assert_eq!(request.url.query(), Some("startAt=50&maxResults=2&done=false"));

  assert_eq!(issues.len(), 2);
  assert_eq!(issues[0].key, "PROJ-1");
  assert_eq!(issues[0].fields.summary.as_deref(), Some("First"));
  assert_eq!(issues[1].fields.flagged, Some(true));

  let pagination = response.pagination.expect("list responses carry pagination");
  assert_eq!(pagination.start_at, 50);
  assert_eq!(pagination.max_results, 2);
  assert_eq!(pagination.total, Some(53));
  assert!(pagination.has_more(issues.len()));
  Ok(())
}

#[tokio::test]
async fn test_list_issues_without_options_sends_no_query() -> anyhow::Result<()> {
  let (client, transport) = fake_client();
  transport.respond(StatusCode::OK, r#"{"startAt": 0, "maxResults": 50, "total": 0, "issues": []}"#);

  let (issues, _) = client
    .epics()
    .list_issues("EPIC-37", &IssuesOptions::default())
    .await?;

  assert!(issues.is_empty());
  assert_eq!(transport.single_request().url.query(), None);
  Ok(())
}

#[tokio::test]
async fn test_list_issues_without_epic_targets_none() -> anyhow::Result<()> {
  let (client, transport) = fake_client();
  transport.respond(
    StatusCode::OK,
    r#"{"startAt": 0, "maxResults": 1, "isLast": true, "issues": [{ "id": "10009", "key": "PROJ-9" }]}"#,
  );

  let options = IssuesOptions::default().with_jql("project = PROJ");
  let (issues, response) = client.epics().list_issues_without_epic(&options).await?;

  let request = transport.single_request();
  assert_eq!(request.url.path(), "/rest/agile/1.0/epic/none/issue");
  assert_eq!(request.url.query(), Some("jql=project+%3D+PROJ"));
  assert_eq!(issues[0].key, "PROJ-9");
  assert!(response.pagination.is_some_and(|page| page.is_last));
  Ok(())
}

#[tokio::test]
async fn test_move_issues_to_success_only_on_204() -> anyhow::Result<()> {
  let (client, transport) = fake_client();
  let keys = IssueKeys::new(["PROJ-1", "PROJ-2"]);

  transport.respond(StatusCode::NO_CONTENT, "");
  let (moved, response) = client.epics().move_issues_to("EPIC-37", &keys).await?;
  assert!(moved);
  assert_eq!(response.status, StatusCode::NO_CONTENT);

  for status in [StatusCode::OK, StatusCode::CREATED, StatusCode::ACCEPTED] {
    transport.respond(status, "{}");
    let (moved, response) = client.epics().move_issues_to("EPIC-37", &keys).await?;
    assert!(!moved, "{status} must not count as success");
    assert_eq!(response.status, status);
  }

  let requests = transport.requests();
  assert_eq!(requests.len(), 4);
  for request in requests {
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url.path(), "/rest/agile/1.0/epic/EPIC-37/issue");
    assert_eq!(request.body, Some(json!({ "issues": ["PROJ-1", "PROJ-2"] })));
  }
  Ok(())
}

#[tokio::test]
async fn test_move_issues_to_error_statuses_are_not_success() {
  let (client, transport) = fake_client();
  let keys = IssueKeys::new(["PROJ-1"]);

  for status in [StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND] {
    transport.respond_error(status, "");
    let error = client.epics().move_issues_to("EPIC-37", &keys).await.unwrap_err();
    assert_eq!(error.status(), Some(status));
  }
}

#[tokio::test]
async fn test_move_more_than_limit_is_still_sent() -> anyhow::Result<()> {
  let (client, transport) = fake_client();
  let keys = IssueKeys::new((1..=51).map(|n| format!("PROJ-{n}")));

  let (moved, _) = client.epics().move_issues_to("EPIC-37", &keys).await?;

  assert!(moved);
  let body = transport.single_request().body.expect("move sends a body");
  assert_eq!(body["issues"].as_array().map(Vec::len), Some(51));
  Ok(())
}

#[tokio::test]
async fn test_remove_issues_from_matches_move_to_no_epic() -> anyhow::Result<()> {
  let (client, transport) = fake_client();
  let keys = IssueKeys::new(["PROJ-1", "PROJ-3"]);

  let (removed, _) = client.epics().remove_issues_from(&keys).await?;
  let (moved, _) = client
    .epics()
    .move_issues_to_target(&EpicTarget::NoEpic, &keys)
    .await?;

  assert!(removed);
  assert!(moved);
  let requests = transport.requests();
  assert_eq!(requests.len(), 2);
  assert_eq!(requests[0], requests[1]);
  assert_eq!(requests[0].url.as_str(), "https://jira.example.com/rest/agile/1.0/epic/none/issue");
  Ok(())
}

#[tokio::test]
async fn test_move_issues_to_reserved_id_is_rejected() {
  let (client, transport) = fake_client();

  let error = client
    .epics()
    .move_issues_to("none", &IssueKeys::new(["PROJ-1"]))
    .await
    .unwrap_err();

  assert!(matches!(error, Error::ReservedEpicId(id) if id == "none"));
  assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_rank_sends_empty_body_when_unset() -> anyhow::Result<()> {
  let (client, transport) = fake_client();

  let (ranked, _) = client.epics().rank("EPIC-37", &EpicRank::default()).await?;

  assert!(ranked);
  let request = transport.single_request();
  assert_eq!(request.method, Method::PUT);
  assert_eq!(request.url.path(), "/rest/agile/1.0/epic/EPIC-37/rank");
  assert_eq!(request.body, Some(json!({})));
  Ok(())
}

#[tokio::test]
async fn test_rank_success_only_on_204() -> anyhow::Result<()> {
  let (client, transport) = fake_client();
  transport.respond(StatusCode::OK, "");

  let rank = EpicRank::before("EPIC-12").with_custom_field("10019");
  let (ranked, response) = client.epics().rank("EPIC-37", &rank).await?;

  assert!(!ranked);
  assert_eq!(response.status, StatusCode::OK);
  assert_eq!(
    transport.single_request().body,
    Some(json!({ "rankBeforeEpic": "EPIC-12", "rankCustomFieldId": "10019" }))
  );
  Ok(())
}

#[tokio::test]
async fn test_partially_update_sends_only_set_fields() -> anyhow::Result<()> {
  let (client, transport) = fake_client();
  transport.respond(StatusCode::OK, EPIC_BODY);

  let update = Epic {
    name: "Platform".to_string(),
    ..Default::default()
  }
  .with_color("color_4");
  let (epic, response) = client.epics().partially_update("EPIC-37", &update).await?;

  let request = transport.single_request();
  assert_eq!(request.method, Method::POST);
  assert_eq!(request.url.path(), "/rest/agile/1.0/epic/EPIC-37");
  assert_eq!(
    request.body,
    Some(json!({ "name": "Platform", "color": { "key": "color_4" } }))
  );
  assert_eq!(response.status, StatusCode::OK);
  assert_eq!(epic.key, "EPIC-37");
  Ok(())
}

#[tokio::test]
async fn test_decoded_epic_reencodes_without_unset_fields() -> anyhow::Result<()> {
  let (client, transport) = fake_client();
  transport.respond(StatusCode::OK, r#"{"id": 5, "name": "Sparse", "summary": null}"#);
  transport.respond(StatusCode::OK, r#"{"id": 5, "name": "Sparse"}"#);

  let (epic, _) = client.epics().get("5").await?;
  client.epics().partially_update("5", &epic).await?;

  let requests = transport.requests();
  assert_eq!(requests[1].body, Some(json!({ "id": 5, "name": "Sparse" })));
  Ok(())
}

#[tokio::test]
async fn test_epic_endpoints_over_http() -> anyhow::Result<()> {
  let mock_server = MockServer::start().await;
  let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

  Mock::given(method("GET"))
    .and(path("/rest/agile/1.0/epic/EPIC-37/issue"))
    .and(basic_auth("test_user", "test_token"))
    .and(query_param("maxResults", "10"))
    .and(query_param("done", "true"))
    .and(query_param_is_missing("startAt"))
    .and(query_param_is_missing("jql"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "startAt": 0,
        "maxResults": 10,
        "total": 1,
        "issues": [{ "id": "10001", "key": "PROJ-1", "fields": { "summary": "Done thing" } }]
    })))
    .expect(1)
    .mount(&mock_server)
    .await;

  Mock::given(method("POST"))
    .and(path("/rest/agile/1.0/epic/none/issue"))
    .and(body_json(json!({ "issues": ["PROJ-1"] })))
    .respond_with(ResponseTemplate::new(204))
    .expect(1)
    .mount(&mock_server)
    .await;

  Mock::given(method("PUT"))
    .and(path("/rest/agile/1.0/epic/EPIC-37/rank"))
    .and(body_json(json!({ "rankAfterEpic": "EPIC-12" })))
    .respond_with(ResponseTemplate::new(204))
    .expect(1)
    .mount(&mock_server)
    .await;

  Mock::given(method("POST"))
    .and(path("/rest/agile/1.0/epic/EPIC-99/issue"))
    .respond_with(ResponseTemplate::new(400).set_body_json(json!({
        "errorMessages": [],
        "errors": { "issues": "Issue PROJ-1 does not exist" }
    })))
    .expect(1)
    .mount(&mock_server)
    .await;

  let options = IssuesOptions::default().with_max_results(10).with_done(true);
  let (issues, _) = client.epics().list_issues("EPIC-37", &options).await?;
  assert_eq!(issues[0].fields.summary.as_deref(), Some("Done thing"));

  let keys = IssueKeys::new(["PROJ-1"]);
  let (removed, _) = client.epics().remove_issues_from(&keys).await?;
  assert!(removed);

  let (ranked, _) = client.epics().rank("EPIC-37", &EpicRank::after("EPIC-12")).await?;
  assert!(ranked);

  let error = client.epics().move_issues_to("EPIC-99", &keys).await.unwrap_err();
  assert_eq!(error.status(), Some(StatusCode::BAD_REQUEST));
  assert!(error.to_string().contains("issues: Issue PROJ-1 does not exist"));
  Ok(())
}
