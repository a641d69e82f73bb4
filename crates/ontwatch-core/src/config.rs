// ── Runtime exporter configuration ──
//
// Describes which appliance to scrape and how. Carries credentials and
// connection tuning but never touches disk or the environment; the binary
// builds an `ExporterConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use ontwatch_api::TransportConfig;

/// Configuration for scraping a single appliance.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Appliance base URL (e.g., `http://192.168.1.1`).
    pub endpoint: Url,
    pub username: String,
    pub password: SecretString,
    /// Delay between a fatal step failure and process exit, so a supervisor
    /// can observe the failing state before restarting.
    pub fatal_grace: Duration,
    /// Whole-request timeout.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Accept invalid TLS certificates.
    pub accept_invalid_certs: bool,
}

impl ExporterConfig {
    /// A config with default timeouts and a 60 second fatal grace delay.
    pub fn new(endpoint: Url, username: impl Into<String>, password: SecretString) -> Self {
        let transport = TransportConfig::default();
        Self {
            endpoint,
            username: username.into(),
            password,
            fatal_grace: Duration::from_secs(60),
            timeout: transport.timeout,
            connect_timeout: transport.connect_timeout,
            accept_invalid_certs: transport.accept_invalid_certs,
        }
    }

    /// Transport settings for the session's HTTP client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            accept_invalid_certs: self.accept_invalid_certs,
            cookie_jar: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_transport_defaults() {
        let config = ExporterConfig::new(
            Url::parse("http://192.168.1.1").unwrap(),
            "user",
            SecretString::from("user".to_owned()),
        );
        assert_eq!(config.fatal_grace, Duration::from_secs(60));
        let transport = config.transport();
        assert_eq!(transport.timeout, Duration::from_secs(30));
        assert_eq!(transport.connect_timeout, Duration::from_secs(10));
        assert!(!transport.accept_invalid_certs);
    }
}
