//! Jira host and API URL helpers.
//!
//! Hosts come from `JIRA_HOST`, the config file, or a command-line flag, and
//! users write them in every shape imaginable (`company.atlassian.net`,
//! `https://company.atlassian.net/`, `http:/localhost:8080`). Everything is
//! normalized here before the client sees it.

use anyhow::{Context, Result};
use url::{Position, Url};

/// Environment variable storing the Jira host configuration.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// Path of the Jira Agile REST API, relative to the host.
pub const DEFAULT_AGILE_API_PATH: &str = "rest/agile/1.0/";

/// Get the $JIRA_HOST environment variable value with proper URL scheme.
///
/// If the host doesn't include a scheme (http:// or https://), assumes https://.
/// Returns an error if the environment variable is not set.
pub fn resolve_jira_base_url() -> Result<String> {
  match std::env::var(ENV_JIRA_HOST) {
    Ok(host) => ensure_url_scheme(&host),
    Err(_) => Err(anyhow::anyhow!(
      "Jira host environment variable '{ENV_JIRA_HOST}' not set"
    )),
  }
}

/// Build the absolute base URL of the Agile API for a host.
///
/// The result always ends with a slash so relative endpoint paths such as
/// `epic/EPIC-1` can be joined onto it without dropping the last segment.
pub fn agile_api_url(host: &str, api_path: &str) -> Result<Url> {
  let host = ensure_url_scheme(host)?;
  let mut base = Url::parse(&format!("{}/", host.trim_end_matches('/')))
    .with_context(|| format!("Failed to parse Jira host '{host}'"))?;

  let api_path = api_path.trim_matches('/');
  if !api_path.is_empty() {
    base = base
      .join(&format!("{api_path}/"))
      .with_context(|| format!("Failed to join API path '{api_path}' onto '{host}'"))?;
  }

  Ok(base)
}

/// Render a URL without the lone "/" path the `url` crate adds to bare hosts.
fn normalize_url(url: &Url) -> String {
  let mut result = url[..Position::BeforePath].to_string();

  let path = url.path();
  if path != "/" {
    result.push_str(path);
  }
  if let Some(query) = url.query() {
    result.push('?');
    result.push_str(query);
  }
  if let Some(fragment) = url.fragment() {
    result.push('#');
    result.push_str(fragment);
  }

  result
}

/// Parse a host that is missing its scheme by assuming https.
fn parse_with_https_prefix(input: &str) -> Result<Url> {
  let mut candidate = input;

  if let Some((scheme, remainder)) = input.split_once(':')
    && ["http", "https"].iter().any(|known| scheme.eq_ignore_ascii_case(known))
  {
    let remainder = remainder.trim_start_matches('/');
    if !remainder.is_empty() {
      candidate = remainder;
    }
  }

  Url::parse(&format!("https://{candidate}"))
    .map_err(|_| anyhow::anyhow!("Failed to parse URL: '{input}'. Ensure it has a valid scheme."))
}

/// Ensure a URL has a proper scheme (http:// or https://).
///
/// If the input doesn't include a scheme, assumes https://. Also handles
/// malformed schemes like "http:/example.com" (missing slash).
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow::anyhow!("Host cannot be empty"));
  }

  let lowered = trimmed.to_ascii_lowercase();
  let broken_scheme = (lowered.starts_with("http:") && !lowered.starts_with("http://"))
    || (lowered.starts_with("https:") && !lowered.starts_with("https://"));
  if broken_scheme {
    let remainder = trimmed.split_once(':').map(|(_, rest)| rest).unwrap_or("");
    return parse_with_https_prefix(remainder.trim_start_matches('/')).map(|url| normalize_url(&url));
  }

  let url = match Url::parse(trimmed) {
    Ok(url) if url.scheme().len() > 1 && url.host().is_some() => url,
    _ => parse_with_https_prefix(trimmed)?,
  };

  Ok(normalize_url(&url))
}
