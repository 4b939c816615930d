//! Query string encoding for list options.
//!
//! Each options type lists its own parameters explicitly. Keys are emitted in
//! a fixed order, at most once, and unset values are skipped entirely.

use url::form_urlencoded;

use crate::models::{EpicsOptions, IssuesOptions};

/// Options that can be rendered as URL query parameters
pub trait QueryParams {
  /// Parameter pairs in the order they are sent
  fn query_pairs(&self) -> Vec<(&'static str, String)>;

  /// Encoded query string including the leading `?`, or an empty string when
  /// no parameter is set
  fn to_query_string(&self) -> String {
    let pairs = self.query_pairs();
    if pairs.is_empty() {
      return String::new();
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
      serializer.append_pair(key, value);
    }
    format!("?{}", serializer.finish())
  }
}

fn push<T: ToString>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<T>) {
  if let Some(value) = value {
    pairs.push((key, value.to_string()));
  }
}

impl QueryParams for IssuesOptions {
  fn query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    push(&mut pairs, "startAt", self.start_at);
    push(&mut pairs, "maxResults", self.max_results);
    push(&mut pairs, "jql", self.jql.as_deref().filter(|jql| !jql.is_empty()));
    push(&mut pairs, "validateQuery", self.validate_query);
    if !self.fields.is_empty() {
      pairs.push(("fields", self.fields.join(",")));
    }
    push(&mut pairs, "expand", self.expand.as_deref().filter(|expand| !expand.is_empty()));
    push(&mut pairs, "done", self.done);
    pairs
  }
}

impl QueryParams for EpicsOptions {
  fn query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    push(&mut pairs, "startAt", self.start_at);
    push(&mut pairs, "maxResults", self.max_results);
    push(&mut pairs, "done", self.done);
    pairs
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_options_produce_no_query() {
    assert_eq!(IssuesOptions::default().to_query_string(), "");
    assert_eq!(EpicsOptions::default().to_query_string(), "");
  }

  #[test]
  fn test_issues_options_stable_order() {
    let options = IssuesOptions::default()
      .with_done(false)
      .with_max_results(25)
      .with_start_at(50);

    assert_eq!(options.to_query_string(), "?startAt=50&maxResults=25&done=false");
  }

  #[test]
  fn test_issues_options_omits_unset_fields() {
    let options = IssuesOptions::default().with_max_results(10);
    assert_eq!(options.to_query_string(), "?maxResults=10");

    let options = IssuesOptions {
      jql: Some(String::new()),
      expand: Some(String::new()),
      ..Default::default()
    };
    assert_eq!(options.to_query_string(), "");
  }

  #[test]
  fn test_issues_options_encodes_values() {
    let options = IssuesOptions {
      jql: Some("status = \"In Progress\"".to_string()),
      validate_query: Some(true),
      fields: vec!["summary".to_string(), "status".to_string()],
      expand: Some("changelog".to_string()),
      ..Default::default()
    };

    assert_eq!(
      options.to_query_string(),
      "?jql=status+%3D+%22In+Progress%22&validateQuery=true&fields=summary%2Cstatus&expand=changelog"
    );
  }

  #[test]
  fn test_first_pair_follows_question_mark() {
    let query = EpicsOptions {
      max_results: Some(5),
      ..Default::default()
    }
    .to_query_string();

    assert_eq!(query, "?maxResults=5");
    assert!(!query.contains("?&"));
    assert!(!query.contains("&&"));
  }

  #[test]
  fn test_start_at_zero_is_sent() {
    let options = EpicsOptions {
      start_at: Some(0),
      done: Some(true),
      ..Default::default()
    };
    assert_eq!(options.to_query_string(), "?startAt=0&done=true");
  }

  #[test]
  fn test_each_key_appears_once() {
    let options = IssuesOptions::default()
      .with_start_at(1)
      .with_start_at(2)
      .with_done(true)
      .with_done(false);

    let query = options.to_query_string();
    assert_eq!(query.matches("startAt=").count(), 1);
    assert_eq!(query.matches("done=").count(), 1);
    assert_eq!(query, "?startAt=2&done=false");
  }
}
