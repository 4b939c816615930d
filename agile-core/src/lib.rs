//! # Agile Core Library
//!
//! Shared building blocks for the agile workspace: configuration files and
//! directories, Jira host resolution, `.netrc` credential storage, and
//! terminal output helpers. Both the Jira client crate and the CLI depend on
//! it so host and credential discovery behave the same everywhere.

pub mod config;
pub mod creds;
pub mod output;
pub mod url;

// Re-export main types
pub use config::{AgileConfig, ConfigDirs, get_config_dirs};
pub use creds::Credentials;
pub use output::{ColorMode, print_error, print_info, print_success, print_warning};
pub use url::{ENV_JIRA_HOST, ensure_url_scheme, resolve_jira_base_url};
