// ── Core error types ──
//
// Operator-facing errors from roomctl-core. Consumers never match on HTTP
// transport details directly; the `From<roomctl_api::Error>` impl folds
// them into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session ──────────────────────────────────────────────────────
    /// The backend rejected the session; it has already been cleared.
    #[error("Session expired or not logged in")]
    Unauthenticated,

    // ── Local checks (no request was sent) ───────────────────────────
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Not permitted: {action}")]
    Forbidden { action: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to backend timed out")]
    Timeout,

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_owned(),
            message: message.into(),
        }
    }

    pub(crate) fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<roomctl_api::Error> for CoreError {
    fn from(err: roomctl_api::Error) -> Self {
        match err {
            roomctl_api::Error::Unauthenticated => CoreError::Unauthenticated,
            roomctl_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        status: e.status().map(|s| s.as_u16()),
                        message: e.to_string(),
                    }
                }
            }
            roomctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            roomctl_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            roomctl_api::Error::Api { status: 404, detail } => CoreError::NotFound {
                message: detail.unwrap_or_else(|| "resource does not exist".into()),
            },
            roomctl_api::Error::Api { status, detail } => CoreError::Api {
                status: Some(status),
                message: detail.unwrap_or_else(|| format!("Backend error (HTTP {status})")),
            },
            roomctl_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response from backend: {message}"))
            }
            roomctl_api::Error::InvalidRequest(message) => CoreError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_detail_becomes_message() {
        let err = CoreError::from(roomctl_api::Error::Api {
            status: 409,
            detail: Some("Room name already taken".into()),
        });
        assert_eq!(err.to_string(), "Room name already taken");
    }

    #[test]
    fn not_found_and_unauthenticated() {
        let err = CoreError::from(roomctl_api::Error::Api {
            status: 404,
            detail: None,
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert!(CoreError::from(roomctl_api::Error::Unauthenticated).is_unauthenticated());
    }
}
