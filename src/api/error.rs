use std::fmt;

use serde_json::Value;

/// Errors surfaced by the request pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No refresh credential available; refresh was not attempted.
    /// Fatal for the session, handled identically to `RefreshRejected`.
    NoRefreshToken,
    /// The refresh exchange failed (expired/invalid credential or network).
    /// Fatal for the session: teardown has already run when this surfaces.
    RefreshRejected { message: String },
    /// Non-success HTTP status (or a 401 on an already-replayed request).
    /// No session impact; the caller decides what to show.
    Status { status: u16, message: String },
    /// Transport-level failure (connect, timeout, ...). No retry.
    Network { message: String },
    /// The response body could not be decoded.
    Decode { message: String },
}

impl ApiError {
    /// Creates a status error, extracting the FastAPI `detail` field from a
    /// JSON body when present.
    pub fn status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| {
                json.get("detail")
                    .and_then(|d| d.as_str())
                    .map(|d| format!("HTTP {}: {}", status, d))
            })
            .unwrap_or_else(|| format!("HTTP {}", status));
        Self::Status { status, message }
    }

    pub fn network(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("Request timed out: {}", err)
        } else if err.is_connect() {
            format!("Connection failed: {}", err)
        } else {
            format!("Network error: {}", err)
        };
        Self::Network { message }
    }

    pub fn decode(err: &reqwest::Error) -> Self {
        Self::Decode {
            message: format!("Failed to decode response: {}", err),
        }
    }

    /// Returns true for errors that ended the session (teardown already ran).
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, Self::NoRefreshToken | Self::RefreshRejected { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRefreshToken => write!(f, "no refresh token available"),
            Self::RefreshRejected { message } => write!(f, "session refresh rejected: {}", message),
            Self::Status { message, .. } => write!(f, "{}", message),
            Self::Network { message } => write!(f, "{}", message),
            Self::Decode { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {}
