use thiserror::Error;

use crate::markup::ResultStatus;

/// Top-level error type for the `ontwatch-api` crate.
///
/// Covers every failure mode of a scrape: the login handshake, the HTTP
/// transport, unparseable replies, and statuses the appliance reports inside
/// its own response envelope. `ontwatch-core` decides which of these are
/// fatal for a collection cycle.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The appliance rejected the challenge-response login.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, timeout, non-2xx status, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The reply did not parse as the expected JSON or markup, with the raw
    /// body for debugging.
    #[error("Protocol error: {message}")]
    Protocol { message: String, body: String },

    /// The appliance's envelope reported a non-success status.
    #[error("Appliance reported {status}")]
    Appliance { status: ResultStatus },
}

impl Error {
    /// Build a protocol error, keeping at most a short preview of the body.
    pub(crate) fn protocol(message: impl Into<String>, body: &[u8]) -> Self {
        let body = String::from_utf8_lossy(body);
        Self::Protocol {
            message: message.into(),
            body: body.chars().take(512).collect(),
        }
    }

    /// Returns `true` if the appliance reported that the session went stale.
    ///
    /// Nothing in the pipeline acts on this automatically; the collector
    /// treats it exactly like any other failure.
    pub fn is_session_timeout(&self) -> bool {
        matches!(
            self,
            Self::Appliance {
                status: ResultStatus::SessionTimeout
            }
        )
    }

    /// Returns `true` if this is a transient transport error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
