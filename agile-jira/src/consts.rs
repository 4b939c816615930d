//! Constants for the agile-jira client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Accept and Content-Type header value for Jira requests
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Path segment Jira uses for "issues without an epic"
pub const NO_EPIC_SEGMENT: &str = "none";

/// Largest number of issues Jira accepts in one move/remove request
pub const MAX_ISSUES_PER_MOVE: usize = 50;

/// Machine name used as a fallback credential entry for Atlassian Cloud
pub const ATLASSIAN_CLOUD_MACHINE: &str = "atlassian.net";
