//! Robot API connection settings.

use std::fmt;

use url::Url;

use crate::error::RobotError;

/// Base URL for the Hetzner Robot webservice.
pub const DEFAULT_BASE_URL: &str = "https://robot-ws.your-server.de";

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the webservice username.
pub const ENV_USERNAME: &str = "HETZNER_ROBOT_USERNAME";
/// Environment variable holding the webservice password.
pub const ENV_PASSWORD: &str = "HETZNER_ROBOT_PASSWORD";
/// Environment variable overriding the base URL.
pub const ENV_URL: &str = "HETZNER_ROBOT_URL";
/// Environment variable overriding the request timeout.
pub const ENV_TIMEOUT_SECS: &str = "HETZNER_ROBOT_TIMEOUT_SECS";

/// Credentials and endpoint for the Robot webservice.
#[derive(Clone)]
pub struct RobotConfig {
    /// Webservice username.
    pub username: String,
    /// Webservice password.
    pub password: String,
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl RobotConfig {
    /// Config against the public Robot endpoint with the default timeout.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Override the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load configuration from `HETZNER_ROBOT_*` environment variables.
    ///
    /// # Errors
    /// Returns error if credentials are missing or a value is malformed.
    pub fn from_env() -> Result<Self, RobotError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RobotError> {
        let username = lookup(ENV_USERNAME)
            .ok_or_else(|| RobotError::Config(format!("{ENV_USERNAME} is not set")))?;
        let password = lookup(ENV_PASSWORD)
            .ok_or_else(|| RobotError::Config(format!("{ENV_PASSWORD} is not set")))?;

        let mut config = Self::new(username, password);
        if let Some(url) = lookup(ENV_URL) {
            config = config.with_base_url(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.parse().map_err(|_| {
                RobotError::Config(format!("{ENV_TIMEOUT_SECS} must be an integer, got {raw:?}"))
            })?;
            config = config.with_timeout_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the settings can be used to build a client.
    ///
    /// # Errors
    /// Returns error on empty credentials, a non-http(s) base URL, or a zero timeout.
    pub fn validate(&self) -> Result<(), RobotError> {
        if self.username.trim().is_empty() {
            return Err(RobotError::Config("username must not be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(RobotError::Config("password must not be empty".to_string()));
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| RobotError::Config(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RobotError::Config(format!(
                "base URL must be http or https, got {:?}",
                url.scheme()
            )));
        }

        if self.timeout_secs == 0 {
            return Err(RobotError::Config("timeout must be greater than zero".to_string()));
        }

        Ok(())
    }
}

impl fmt::Debug for RobotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RobotConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
