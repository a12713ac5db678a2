//! Custom error types and handling
//!
//! This module defines the client's error taxonomy. Every variant is meant to be
//! surfaced as a transient notification; none of them should end the session.

use serde::Deserialize;

use crate::constants::conflict_codes;

/// Client-wide error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    // Client-detected errors, never reach the network
    #[error("Validation error: {0}")]
    Validation(String),

    // Transport errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    // Server-reported errors
    #[error("HTTP error {status}")]
    Http { status: u16, detail: Option<String> },

    #[error("State conflict: {0}")]
    StateConflict(String),

    // Session setup
    #[error("Identity error: {0}")]
    Identity(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error body returned by the server for non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ErrorBody {
    /// Parse an error body, tolerating empty or non-JSON payloads
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// Whether the body names one of the known conflict codes
    pub fn is_conflict_code(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| conflict_codes::ALL.contains(&code))
    }
}

impl ClientError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Http { .. } => "HTTP_ERROR",
            Self::StateConflict(_) => "STATE_CONFLICT",
            Self::Identity(_) => "IDENTITY_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Build an error from a non-2xx status and its (possibly empty) body
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let body = ErrorBody::parse(body);
        if status == 409 || body.is_conflict_code() {
            let message = body
                .detail
                .unwrap_or_else(|| format!("server rejected the request ({status})"));
            return Self::StateConflict(message);
        }
        Self::Http {
            status,
            detail: body.detail,
        }
    }

    /// Text suitable for a transient user-visible notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Http {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Validation(msg) | Self::StateConflict(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }

    /// Whether this error came back from the server as a 4xx/5xx
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::StateConflict(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
                detail: None,
            }
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(err.to_string())
    }
}

/// Result type alias using ClientError
pub type ClientResult<T> = Result<T, ClientError>;
