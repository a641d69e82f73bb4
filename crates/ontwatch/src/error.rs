//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ontwatch_config::ConfigError;
use ontwatch_core::{CoreError, StepFailure};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to appliance at {url}")]
    #[diagnostic(
        code(ontwatch::connection_failed),
        help(
            "Check that the appliance web console is reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(ontwatch::timeout),
        help("Increase the limit with --timeout or check appliance responsiveness.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(ontwatch::auth_failed),
        help(
            "Verify --username and --password (or ONT_USERNAME / ONT_PASSWORD).\n\
             Some appliances lock the console after repeated failures."
        )
    )]
    AuthFailed { message: String },

    #[error("Appliance session expired")]
    #[diagnostic(
        code(ontwatch::session_expired),
        help("Another login to the web console may have replaced this session.")
    )]
    SessionExpired,

    // ── Appliance replies ────────────────────────────────────────────
    #[error("Appliance reported failure: {status}")]
    #[diagnostic(code(ontwatch::appliance))]
    Appliance { status: String },

    #[error("Unexpected reply from appliance: {message}")]
    #[diagnostic(
        code(ontwatch::protocol),
        help("The firmware may not be supported. Run with -vv to see request URLs.")
    )]
    Protocol { message: String },

    #[error("HTTP error: {message}")]
    #[diagnostic(code(ontwatch::http))]
    Http { message: String },

    #[error("Collection step '{step}' failed")]
    #[diagnostic(code(ontwatch::step_failed))]
    StepFailed {
        step: String,
        #[source]
        source: CoreError,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ontwatch::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(ontwatch::config),
        help("Check the config file and ENDPOINT / ONT_* environment variables.")
    )]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::SessionExpired => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::Config(_) => exit_code::USAGE,
            Self::StepFailed { source, .. } => match source {
                CoreError::ConnectionFailed { .. } => exit_code::CONNECTION,
                CoreError::Timeout { .. } => exit_code::TIMEOUT,
                err if err.is_session_loss() => exit_code::AUTH,
                _ => exit_code::GENERAL,
            },
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { url } => CliError::Timeout { url },
            CoreError::SessionExpired => CliError::SessionExpired,
            CoreError::Appliance { status } => CliError::Appliance { status },
            CoreError::Protocol { message } => CliError::Protocol { message },
            CoreError::Http { message, .. } => CliError::Http { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

impl From<StepFailure> for CliError {
    fn from(failure: StepFailure) -> Self {
        CliError::StepFailed {
            step: failure.step.to_string(),
            source: failure.error,
        }
    }
}
