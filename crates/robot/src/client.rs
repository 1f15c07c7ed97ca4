//! Hetzner Robot API transport.
//!
//! Issues authenticated requests against the Robot webservice and checks the
//! response status against the set the caller accepts.
//! API Documentation: <https://robot.hetzner.com/doc/webservice/en.html>

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use tracing::debug;

use crate::config::RobotConfig;
use crate::error::RobotError;

/// Statuses the Robot webservice uses for successful reads and writes.
pub const ACCEPTED_STATUSES: &[StatusCode] = &[StatusCode::OK, StatusCode::ACCEPTED];

/// Authenticated Robot webservice client.
#[derive(Clone)]
pub struct RobotClient {
    /// HTTP client.
    client: Client,
    /// Robot API username.
    username: String,
    /// Robot API password.
    password: String,
    /// API base URL, without trailing slash.
    base_url: String,
}

impl RobotClient {
    /// Create a new Robot client.
    ///
    /// # Errors
    /// Returns error if the config is invalid or the HTTP client cannot be created.
    pub fn new(config: RobotConfig) -> Result<Self, RobotError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            username: config.username,
            password: config.password,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one API call and return the raw body.
    ///
    /// `form` is sent form-encoded; repeated keys are kept in order.
    /// Dropping the returned future aborts the in-flight request.
    ///
    /// # Errors
    /// Transport failures are returned as [`RobotError::Http`]; a status not in
    /// `accepted` becomes [`RobotError::UnexpectedStatus`] carrying the body.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, String)]>,
        accepted: &[StatusCode],
    ) -> Result<Vec<u8>, RobotError> {
        if accepted.is_empty() {
            return Err(RobotError::Config(
                "accepted status set must not be empty".to_string(),
            ));
        }

        let url = format!("{}{path}", self.base_url);
        debug!(method = %method, url = %url, "Robot API request");

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password));
        if let Some(form) = form {
            request = request.form(form);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if accepted.contains(&status) {
            Ok(body.to_vec())
        } else {
            debug!(status = status.as_u16(), url = %url, "Robot API rejected request");
            Err(RobotError::UnexpectedStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    }

    /// GET `path`, accepting 200 and 202.
    pub(crate) async fn get(&self, path: &str) -> Result<Vec<u8>, RobotError> {
        self.call(Method::GET, path, None, ACCEPTED_STATUSES).await
    }

    /// POST a form to `path`, accepting 200 and 202.
    pub(crate) async fn post_form(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<Vec<u8>, RobotError> {
        self.call(Method::POST, path, Some(form), ACCEPTED_STATUSES)
            .await
    }
}
