//! Run configuration.
//!
//! One immutable [`RunConfig`] value is built up front (usually from a JSON
//! file) and handed to the page objects. Only the credentials are required;
//! URLs, titles, timeouts and paths default to the ProtonMail beta client.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Login page of the mail client
pub const DEFAULT_LOGIN_URL: &str = "https://beta.protonmail.com/login";

/// Folders/labels settings page
pub const DEFAULT_SETTINGS_URL: &str = "https://beta.protonmail.com/settings/labels";

/// Token the post-login page title contains
pub const DEFAULT_LANDING_TITLE_TOKEN: &str = "Inbox";

/// Exact title of the settings page
pub const DEFAULT_SETTINGS_TITLE: &str = "Folders/labels - ProtonMail";

/// Account used to log in
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs and reports.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Wait budgets, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Element, title and list waits
    pub element_ms: u64,
    /// Optional welcome overlay after login
    pub welcome_ms: u64,
    /// Success toast after a mutation
    pub notification_ms: u64,
    /// Interval between polls
    pub poll_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            element_ms: 5_000,
            welcome_ms: 5_000,
            notification_ms: 5_000,
            poll_ms: 100,
        }
    }
}

impl Timeouts {
    /// Element wait budget
    #[must_use]
    pub const fn element(&self) -> Duration {
        Duration::from_millis(self.element_ms)
    }

    /// Welcome overlay wait budget
    #[must_use]
    pub const fn welcome(&self) -> Duration {
        Duration::from_millis(self.welcome_ms)
    }

    /// Notification wait budget
    #[must_use]
    pub const fn notification(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    /// Same budgets scaled for the in-process simulation
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            element_ms: 200,
            welcome_ms: 100,
            notification_ms: 200,
            poll_ms: 10,
        }
    }
}

/// Browser launch options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserOptions {
    /// Run without a window
    pub headless: bool,
    /// Chromium binary (None = auto-detect)
    pub chromium_path: Option<PathBuf>,
    /// Disable the sandbox (containers/CI)
    pub no_sandbox: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            no_sandbox: false,
        }
    }
}

fn default_login_url() -> String {
    DEFAULT_LOGIN_URL.to_string()
}

fn default_settings_url() -> String {
    DEFAULT_SETTINGS_URL.to_string()
}

fn default_landing_token() -> String {
    DEFAULT_LANDING_TITLE_TOKEN.to_string()
}

fn default_settings_title() -> String {
    DEFAULT_SETTINGS_TITLE.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Complete configuration of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Account to log in with
    pub credentials: Credentials,
    /// Login page
    #[serde(default = "default_login_url")]
    pub login_url: String,
    /// Folders/labels settings page
    #[serde(default = "default_settings_url")]
    pub settings_url: String,
    /// Token the landing page title contains after login
    #[serde(default = "default_landing_token")]
    pub landing_title_token: String,
    /// Exact settings page title
    #[serde(default = "default_settings_title")]
    pub settings_title: String,
    /// Where failure screenshots go
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Wait budgets
    #[serde(default)]
    pub timeouts: Timeouts,
    /// Browser launch options
    #[serde(default)]
    pub browser: BrowserOptions,
}

impl RunConfig {
    /// Configuration with defaults for everything but the credentials
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            login_url: default_login_url(),
            settings_url: default_settings_url(),
            landing_title_token: default_landing_token(),
            settings_title: default_settings_title(),
            data_dir: default_data_dir(),
            timeouts: Timeouts::default(),
            browser: BrowserOptions::default(),
        }
    }

    /// Set the wait budgets
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Parse and validate a JSON document
    pub fn from_json(text: &str) -> ProbeResult<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| ProbeError::config(format!("malformed configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: &Path) -> ProbeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ProbeError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&text).map_err(|e| match e {
            ProbeError::Config { message } => {
                ProbeError::config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    /// Check required fields and value ranges
    pub fn validate(&self) -> ProbeResult<()> {
        if self.credentials.username.trim().is_empty() {
            return Err(ProbeError::config("credentials.username is empty"));
        }
        if self.credentials.password.is_empty() {
            return Err(ProbeError::config("credentials.password is empty"));
        }
        for (field, url) in [("login_url", &self.login_url), ("settings_url", &self.settings_url)] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ProbeError::config(format!(
                    "{field} must be an http(s) URL, got {url:?}"
                )));
            }
        }
        if self.landing_title_token.is_empty() || self.settings_title.is_empty() {
            return Err(ProbeError::config("page titles must not be empty"));
        }
        let t = &self.timeouts;
        if t.element_ms == 0 || t.welcome_ms == 0 || t.notification_ms == 0 || t.poll_ms == 0 {
            return Err(ProbeError::config("timeouts must be positive"));
        }
        if t.poll_ms >= t.element_ms {
            return Err(ProbeError::config(format!(
                "timeouts.poll_ms ({}) must be shorter than timeouts.element_ms ({})",
                t.poll_ms, t.element_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn minimal() -> &'static str {
        r#"{"credentials": {"username": "alice", "password": "pw"}}"#
    }

    #[test]
    fn test_minimal_document_gets_defaults() {
        let config = RunConfig::from_json(minimal()).unwrap();
        assert_eq!(config.credentials, Credentials::new("alice", "pw"));
        assert_eq!(config.login_url, DEFAULT_LOGIN_URL);
        assert_eq!(config.settings_url, DEFAULT_SETTINGS_URL);
        assert_eq!(config.settings_title, DEFAULT_SETTINGS_TITLE);
        assert_eq!(config.timeouts, Timeouts::default());
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.browser.headless);
    }

    #[test]
    fn test_partial_timeouts_keep_other_defaults() {
        let config = RunConfig::from_json(
            r#"{"credentials": {"username": "a", "password": "b"},
                "timeouts": {"notification_ms": 9000}}"#,
        )
        .unwrap();
        assert_eq!(config.timeouts.notification_ms, 9000);
        assert_eq!(config.timeouts.element_ms, 5000);
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let err = RunConfig::from_json("{}").unwrap_err();
        assert!(matches!(err, ProbeError::Config { .. }));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = RunConfig::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_empty_username_rejected() {
        let config = RunConfig::new(Credentials::new("  ", "pw"));
        assert!(config.validate().unwrap_err().to_string().contains("username"));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let mut config = RunConfig::new(Credentials::new("a", "b"));
        config.settings_url = "ftp://example.com".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("settings_url"));
    }

    #[test]
    fn test_poll_must_be_shorter_than_element_timeout() {
        let config = RunConfig::new(Credentials::new("a", "b")).with_timeouts(Timeouts {
            element_ms: 100,
            poll_ms: 100,
            ..Timeouts::default()
        });
        assert!(config.validate().is_err());
        let fast = RunConfig::new(Credentials::new("a", "b")).with_timeouts(Timeouts::fast());
        assert!(fast.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(minimal().as_bytes()).unwrap();
        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.credentials.username, "alice");
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = RunConfig::load(Path::new("/nonexistent/account.json")).unwrap_err();
        assert!(matches!(err, ProbeError::Config { .. }));
        assert!(err.to_string().contains("/nonexistent/account.json"));
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
