// Authenticated appliance session
//
// Wraps a cookie-bearing `reqwest::Client` with the appliance's query-string
// URL scheme. The cookie jar is the real session carrier; the stored session
// token is kept only for callers that want to report it. Endpoint loaders
// (device info, clients, WLAN, ...) live in `crate::decode` as inherent
// methods on `Session`.

mod auth;

use bytes::Bytes;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::markup::Envelope;
use crate::resource::{MenuData, MenuView};

pub use auth::credential_digest;

/// One authenticated connection to the appliance.
///
/// Built once by [`Session::login`] and read-only afterwards. There is no
/// automatic renewal: a stale session surfaces as
/// `Error::Appliance { status: ResultStatus::SessionTimeout }`.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
    endpoint: Url,
    session_token: String,
}

impl Session {
    /// The appliance base URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Session token issued during login.
    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{endpoint}/?{query}`.
    pub(crate) fn url(&self, query: &str) -> Result<Url, Error> {
        query_url(&self.endpoint, query)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a URL and return the raw body. Non-2xx statuses are errors.
    pub(crate) async fn get(&self, url: Url) -> Result<Bytes, Error> {
        get_bytes(&self.http, url).await
    }

    /// Open a menu page, priming the appliance's per-page state.
    ///
    /// The body is discarded; transport errors are returned.
    pub async fn view(&self, view: MenuView) -> Result<(), Error> {
        let url = self.url(&view.query(timestamp()))?;
        self.get(url).await.map(drop)
    }

    /// Like [`Session::view`], but a failure only gets logged. Used before
    /// data calls, which report their own errors.
    pub(crate) async fn warm_up(&self, view: MenuView) {
        if let Err(e) = self.view(view).await {
            debug!(view = view.tag(), error = %e, "warm-up page view failed (ignored)");
        }
    }

    /// Fetch a data resource and parse its envelope.
    ///
    /// Status checking is left to the caller since strictness differs per
    /// resource.
    pub async fn fetch(&self, data: MenuData) -> Result<Envelope, Error> {
        let url = self.url(&data.query(timestamp()))?;
        let body = self.get(url).await?;
        Envelope::parse(&body)
    }
}

pub(crate) fn query_url(endpoint: &Url, query: &str) -> Result<Url, Error> {
    let base = endpoint.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/?{query}"))?)
}

pub(crate) async fn get_bytes(http: &reqwest::Client, url: Url) -> Result<Bytes, Error> {
    debug!("GET {}", url);
    let resp = http.get(url).send().await?.error_for_status()?;
    Ok(resp.bytes().await?)
}

/// Cache-buster sent with every menu request, in Unix seconds.
fn timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn query_url_joins_without_double_slash() {
        let endpoint = Url::parse("http://192.168.1.1/").unwrap();
        let url = query_url(&endpoint, "_type=loginData&_tag=login_entry").unwrap();
        assert_eq!(
            url.as_str(),
            "http://192.168.1.1/?_type=loginData&_tag=login_entry"
        );
    }

    #[test]
    fn query_url_keeps_endpoint_path() {
        let endpoint = Url::parse("https://ont.lan:8443/admin").unwrap();
        let url = query_url(&endpoint, "a=b").unwrap();
        assert_eq!(url.as_str(), "https://ont.lan:8443/admin/?a=b");
    }
}
