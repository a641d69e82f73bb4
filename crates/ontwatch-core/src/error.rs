// ── Core error types ──
//
// Domain-level failures seen by the collector and its callers. The
// `From<ontwatch_api::Error>` impl folds transport and markup details into
// variants that say what went wrong with the appliance, not with HTTP.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to appliance at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The appliance dropped the session; only a fresh login recovers.
    #[error("Appliance session expired")]
    SessionExpired,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Appliance reported failure: {status}")]
    Appliance { status: String },

    #[error("Unexpected reply: {message}")]
    Protocol { message: String },

    #[error("HTTP error: {message}")]
    Http {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether this failure means the session must be re-established.
    pub fn is_session_loss(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired | Self::AuthenticationFailed { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ontwatch_api::Error> for CoreError {
    fn from(err: ontwatch_api::Error) -> Self {
        use ontwatch_api::{Error, ResultStatus};

        match err {
            Error::Authentication { message } => CoreError::AuthenticationFailed { message },
            Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Http {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Error::ClientBuild(message) => CoreError::Config { message },
            Error::Protocol { message, body: _ } => CoreError::Protocol { message },
            Error::Appliance {
                status: ResultStatus::SessionTimeout,
            } => CoreError::SessionExpired,
            Error::Appliance { status } => CoreError::Appliance {
                status: status.to_string(),
            },
        }
    }
}
