use thiserror::Error;

/// Why a single attempt failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Invalid JSON: {0}")]
    Parse(String),
}

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 200;

impl FetchError {
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", cut, body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let reason = status.canonical_reason().unwrap_or("Unknown status");
        let reason = if body.trim().is_empty() {
            reason.to_string()
        } else {
            format!("{} ({})", reason, Self::truncate_body(body.trim()))
        };
        FetchError::Status {
            status: status.as_u16(),
            reason,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // Attempt timeouts are enforced by the loader, which reports the
        // configured duration; a client-side timeout is a transport failure.
        if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// A load that failed on every attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not load data from {resource}")]
pub struct LoadError {
    pub resource: String,
    #[source]
    pub cause: FetchError,
}
