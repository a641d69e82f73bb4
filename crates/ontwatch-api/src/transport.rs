// Transport configuration for the appliance's HTTP client.
//
// The appliance carries its session in cookies, so every client built here
// owns a cookie jar. Explicit timeouts keep a hung request from stalling a
// collection cycle forever.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

use crate::error::Error;

/// Shared transport configuration for building the session's HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout (connect + headers + body).
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Accept invalid TLS certificates (appliances ship self-signed ones).
    pub accept_invalid_certs: bool,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// A fresh cookie jar is attached when the config doesn't carry one.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let jar = self
            .cookie_jar
            .clone()
            .unwrap_or_else(|| Arc::new(Jar::default()));

        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .user_agent(concat!("ontwatch/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(jar)
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }

    /// Create a config with a fresh cookie jar.
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }
}
