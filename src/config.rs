//! Client configuration.
//!
//! Defaults match the planner service's development setup; every field can
//! be overridden with the builder methods or, for the binary, environment
//! variables.

use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Server message that marks a 401 as a recoverable credential expiry.
pub const DEFAULT_EXPIRED_TOKEN_MESSAGE: &str = "Token has expired";

const ENV_API_URL: &str = "TRIPKIT_API_URL";
const ENV_TIMEOUT_SECS: &str = "TRIPKIT_TIMEOUT_SECS";
const ENV_CREDENTIALS: &str = "TRIPKIT_CREDENTIALS";

/// Configuration for [`ApiClient`](crate::client::ApiClient).
///
/// # Example
///
/// ```ignore
/// use tripkit::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("https://planner.example.com/api")
///     .with_timeout_secs(10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Renewal endpoint path
    pub refresh_path: String,
    /// Redirect target for unrecoverable session failures
    pub login_path: String,
    /// Request paths sent without an access credential
    pub public_paths: Vec<String>,
    /// `msg` value that marks a 401 as an expired credential
    pub expired_token_message: String,
    /// Transport timeout in seconds, applied to renewal calls as well
    pub timeout_secs: u64,
    /// Credentials file override (default `~/.tripkit/credentials.json`)
    pub credentials_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_path: "/refresh".to_string(),
            login_path: "/login".to_string(),
            public_paths: vec!["/login".to_string(), "/users/register".to_string()],
            expired_token_message: DEFAULT_EXPIRED_TOKEN_MESSAGE.to_string(),
            timeout_secs: 30,
            credentials_path: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_public_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_expired_token_message(mut self, message: impl Into<String>) -> Self {
        self.expired_token_message = message.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Defaults overridden by `TRIPKIT_API_URL`, `TRIPKIT_TIMEOUT_SECS` and
    /// `TRIPKIT_CREDENTIALS`. Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            config = config.with_base_url(url);
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config = config.with_timeout_secs(secs),
                _ => tracing::warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, raw),
            }
        }

        if let Ok(path) = std::env::var(ENV_CREDENTIALS) {
            config = config.with_credentials_path(path);
        }

        config
    }

    /// Full URL for a request path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| p == path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(ENV_API_URL);
        std::env::remove_var(ENV_TIMEOUT_SECS);
        std::env::remove_var(ENV_CREDENTIALS);
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.url("/refresh"), "http://localhost:5000/api/refresh");
        assert!(config.is_public("/login"));
        assert!(config.is_public("/users/register"));
        assert!(!config.is_public("/users/profile"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ClientConfig::default().with_base_url("https://example.com/api/");
        assert_eq!(config.url("/login"), "https://example.com/api/login");
    }

    #[test]
    fn test_public_paths_override() {
        let config = ClientConfig::default().with_public_paths(["/auth"]);
        assert!(config.is_public("/auth"));
        assert!(!config.is_public("/login"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        std::env::set_var(ENV_API_URL, "https://planner.example.com/api");
        std::env::set_var(ENV_TIMEOUT_SECS, "5");
        std::env::set_var(ENV_CREDENTIALS, "/tmp/creds.json");

        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, "https://planner.example.com/api");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.credentials_path, Some(PathBuf::from("/tmp/creds.json")));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_bad_timeout() {
        clear_env();
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");

        let config = ClientConfig::from_env();
        assert_eq!(config.timeout_secs, 30);

        clear_env();
    }
}
