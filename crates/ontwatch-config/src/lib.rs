//! Configuration loading for ontwatch.
//!
//! Layers, lowest to highest precedence: built-in defaults, an optional TOML
//! file, the environment (`ENDPOINT` plus `ONT_*`), then command-line
//! overrides. The result is validated and translated into
//! `ontwatch_core::ExporterConfig`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use ontwatch_core::ExporterConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// `ONT_`-prefixed environment keys, after the prefix is stripped.
const PREFIXED_KEYS: [&str; 4] = ["sleep_quit", "timeout", "connect_timeout", "insecure"];

/// Credential variables, read verbatim. Figment would parse `0123` as a number.
const CREDENTIAL_VARS: [(&str, &str); 2] = [
    ("ONT_USERNAME", "username"),
    ("ONT_PASSWORD", "password"),
];

/// Flat, file-shaped configuration.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Appliance base URL (e.g., "http://192.168.1.1").
    pub endpoint: String,

    #[serde(deserialize_with = "lenient_string")]
    pub username: String,

    #[serde(deserialize_with = "lenient_string")]
    pub password: String,

    /// Seconds to wait after a fatal step failure before exiting.
    pub sleep_quit: u64,

    /// Whole-request timeout, seconds.
    pub timeout: u64,

    /// TCP connect timeout, seconds.
    pub connect_timeout: u64,

    /// Accept invalid TLS certificates.
    pub insecure: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "http://192.168.1.1".into(),
            username: "user".into(),
            password: "user".into(),
            sleep_quit: 60,
            timeout: 30,
            connect_timeout: 10,
            insecure: false,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("sleep_quit", &self.sleep_quit)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// Command-line values layered over everything else. `None` leaves the
/// lower layers untouched.
#[derive(Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_quit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config file location, if a home directory can be resolved.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ontwatch").map(|dirs| dirs.config_dir().join("config.toml"))
}

// ── Loading ─────────────────────────────────────────────────────────

impl Settings {
    /// The provider stack: defaults, optional file, environment, overrides.
    pub fn figment(file: Option<&Path>, overrides: &Overrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::raw().only(&["endpoint"]))
            .merge(Env::prefixed("ONT_").only(&PREFIXED_KEYS))
            .merge(Serialized::defaults(env_credentials()))
            .merge(Serialized::defaults(overrides))
    }

    /// Load settings.
    ///
    /// An explicit `file` must exist; otherwise the platform config file is
    /// read when present.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let path = match file {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::MissingFile { path: path.into() });
            }
            Some(path) => Some(path.to_path_buf()),
            None => config_path().filter(|p| p.is_file()),
        };
        Ok(Self::figment(path.as_deref(), overrides).extract()?)
    }

    /// Validate and translate into the runtime configuration.
    pub fn into_exporter_config(self) -> Result<ExporterConfig, ConfigError> {
        let raw = self.endpoint.trim().trim_end_matches('/');
        let endpoint = Url::parse(raw).map_err(|e| invalid("endpoint", format!("{e}: {raw}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid(
                "endpoint",
                format!("expected http or https, got '{}'", endpoint.scheme()),
            ));
        }
        if self.timeout == 0 {
            return Err(invalid("timeout", "must be greater than zero"));
        }
        if self.connect_timeout == 0 {
            return Err(invalid("connect_timeout", "must be greater than zero"));
        }

        let password = SecretString::from(self.password);
        let mut config = ExporterConfig::new(endpoint, self.username, password);
        config.fatal_grace = Duration::from_secs(self.sleep_quit);
        config.timeout = Duration::from_secs(self.timeout);
        config.connect_timeout = Duration::from_secs(self.connect_timeout);
        config.accept_invalid_certs = self.insecure;
        Ok(config)
    }
}

fn env_credentials() -> BTreeMap<&'static str, String> {
    CREDENTIAL_VARS
        .iter()
        .filter_map(|(var, key)| std::env::var(var).ok().map(|value| (*key, value)))
        .collect()
}

/// Accept any scalar as a string, so `password = 1234` in a file still loads.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct Lenient;

    impl Visitor<'_> for Lenient {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number, or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_char<E: de::Error>(self, v: char) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(Lenient)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn extract(file: Option<&Path>, overrides: &Overrides) -> Settings {
        Settings::figment(file, overrides).extract().unwrap()
    }

    #[test]
    fn defaults_without_sources() {
        Jail::expect_with(|_| {
            assert_eq!(extract(None, &Overrides::default()), Settings::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_env_then_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "ontwatch.toml",
                r#"
                    endpoint = "http://10.0.0.1"
                    username = "file-user"
                    timeout = 5
                "#,
            )?;
            jail.set_env("ENDPOINT", "http://10.0.0.2/");
            jail.set_env("ONT_USERNAME", "env-user");
            jail.set_env("ONT_SLEEP_QUIT", "0");

            let overrides = Overrides {
                username: Some("flag-user".into()),
                ..Overrides::default()
            };
            let settings = extract(Some(Path::new("ontwatch.toml")), &overrides);

            assert_eq!(settings.endpoint, "http://10.0.0.2/");
            assert_eq!(settings.username, "flag-user");
            assert_eq!(settings.timeout, 5);
            assert_eq!(settings.sleep_quit, 0);
            assert_eq!(settings.connect_timeout, 10);
            Ok(())
        });
    }

    #[test]
    fn numeric_env_credentials_stay_strings() {
        Jail::expect_with(|jail| {
            jail.set_env("ONT_USERNAME", "007");
            jail.set_env("ONT_PASSWORD", "0123");
            jail.set_env("ONT_INSECURE", "true");
            let settings = extract(None, &Overrides::default());
            assert_eq!(settings.username, "007");
            assert_eq!(settings.password, "0123");
            assert!(settings.insecure);

            jail.set_env("ONT_PASSWORD", "1.50");
            let settings = extract(None, &Overrides::default());
            assert_eq!(settings.password, "1.50");
            Ok(())
        });
    }

    #[test]
    fn numeric_file_credentials_load_as_strings() {
        Jail::expect_with(|jail| {
            jail.create_file("ontwatch.toml", "password = 1234")?;
            let settings = extract(Some(Path::new("ontwatch.toml")), &Overrides::default());
            assert_eq!(settings.password, "1234");
            Ok(())
        });
    }

    #[test]
    fn explicit_file_must_exist() {
        Jail::expect_with(|_| {
            let err = Settings::load(Some(Path::new("absent.toml")), &Overrides::default())
                .unwrap_err();
            assert!(matches!(err, ConfigError::MissingFile { .. }));
            Ok(())
        });
    }

    #[test]
    fn translates_into_exporter_config() {
        let settings = Settings {
            endpoint: "https://ont.lan/".into(),
            password: "secret".into(),
            sleep_quit: 5,
            insecure: true,
            ..Settings::default()
        };
        let config = settings.into_exporter_config().unwrap();
        assert_eq!(config.endpoint.as_str(), "https://ont.lan/");
        assert_eq!(config.username, "user");
        assert_eq!(config.password.expose_secret(), "secret");
        assert_eq!(config.fatal_grace, Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn rejects_bad_endpoint_and_timeouts() {
        let bad_scheme = Settings {
            endpoint: "ftp://192.168.1.1".into(),
            ..Settings::default()
        };
        assert!(matches!(
            bad_scheme.into_exporter_config(),
            Err(ConfigError::Validation { field, .. }) if field == "endpoint"
        ));

        let unparsable = Settings {
            endpoint: "not a url".into(),
            ..Settings::default()
        };
        assert!(unparsable.into_exporter_config().is_err());

        let zero = Settings {
            connect_timeout: 0,
            ..Settings::default()
        };
        assert!(matches!(
            zero.into_exporter_config(),
            Err(ConfigError::Validation { field, .. }) if field == "connect_timeout"
        ));
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", Settings::default());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("password: \"user\""));
    }
}
