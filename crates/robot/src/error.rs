//! Error types for Robot API and adapter operations.

use serde::Deserialize;
use thiserror::Error;

/// Robot error code returned when the requested boot profile is already active.
pub const BOOT_ALREADY_ENABLED: &str = "BOOT_ALREADY_ENABLED";

/// Errors that can occur while talking to the Robot API or mapping its data.
#[derive(Error, Debug)]
pub enum RobotError {
    /// HTTP request failed (network, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a status outside the accepted set.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Response body was not valid JSON for the expected shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// JSON was valid but nested differently than expected.
    #[error("Unexpected payload: {0}")]
    Payload(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Resource identifier could not be decoded into a server number.
    #[error("Invalid resource id: {0:?}")]
    InvalidId(String),

    /// Attribute missing, mistyped, or not declared in the schema.
    #[error("Attribute error: {0}")]
    Attribute(String),

    /// Boot profile name other than `linux` or `rescue`.
    #[error("Unknown boot profile: {0:?}")]
    UnknownProfile(String),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
}

impl RobotError {
    /// Structured Robot error code (`{"error": {"code": ...}}`) carried in the body, if any.
    #[must_use]
    pub fn vendor_code(&self) -> Option<String> {
        match self {
            Self::UnexpectedStatus { body, .. } => serde_json::from_str::<ErrorEnvelope>(body)
                .ok()
                .map(|envelope| envelope.error.code),
            _ => None,
        }
    }

    /// Whether this is the "boot already enabled" conflict.
    ///
    /// The structured code wins when the body carries one. Without it the
    /// rendered message is searched for the marker, which breaks if Robot
    /// ever changes its error text.
    #[must_use]
    pub fn is_boot_already_enabled(&self) -> bool {
        match self.vendor_code() {
            Some(code) => code == BOOT_ALREADY_ENABLED,
            None => self.to_string().contains(BOOT_ALREADY_ENABLED),
        }
    }
}
