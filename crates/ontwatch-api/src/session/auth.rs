// Challenge-response login
//
// The appliance hands out an anonymous session token and a per-attempt
// challenge, then expects the form the web UI posts: the password salted
// with the challenge, hashed with SHA-256 and hex-encoded. All session state
// ends up in the client's cookie jar.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use url::Url;

use super::{Session, get_bytes, query_url};
use crate::error::Error;
use crate::markup::Envelope;
use crate::resource::{LOGIN_ENTRY, LOGIN_TOKEN};
use crate::transport::TransportConfig;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

#[derive(Debug, Deserialize)]
struct SessionTokenReply {
    #[serde(default)]
    sess_token: String,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    #[serde(default)]
    sess_token: String,
    #[serde(default)]
    login_need_refresh: bool,
}

/// Hex-encoded `SHA-256(password || challenge)`.
pub fn credential_digest(password: &SecretString, challenge: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.expose_secret().as_bytes());
    hasher.update(challenge.as_bytes());
    hex::encode(hasher.finalize())
}

impl Session {
    /// Log in and return the authenticated session.
    ///
    /// `endpoint` is the appliance root (e.g. `http://192.168.1.1`). The
    /// handshake is:
    /// 1. `GET login_entry` for the anonymous session token (JSON)
    /// 2. `GET login_token` for the challenge (markup root text)
    /// 3. `POST login_entry` with the salted digest
    /// 4. a final `GET {endpoint}` when the reply asks for a refresh
    ///
    /// A reply without `login_need_refresh` means the credentials were
    /// rejected.
    pub async fn login(
        endpoint: Url,
        username: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        let entry_url = query_url(&endpoint, LOGIN_ENTRY)?;

        debug!("logging in at {}", endpoint);

        let body = get_bytes(&http, entry_url.clone()).await?;
        let SessionTokenReply { sess_token } = parse_json(&body, "session token")?;

        let body = get_bytes(&http, query_url(&endpoint, LOGIN_TOKEN)?).await?;
        let challenge = Envelope::parse(&body)?.text().to_owned();
        if challenge.is_empty() {
            return Err(Error::protocol("login challenge is empty", &body));
        }

        let form = login_form(username, &credential_digest(password, &challenge), &sess_token);

        debug!("POST {}", entry_url);
        let resp = http
            .post(entry_url)
            .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form)
            .send()
            .await?
            .error_for_status()?;

        let body = resp.bytes().await?;
        let reply: LoginReply = parse_json(&body, "login reply")?;
        if !reply.login_need_refresh {
            return Err(Error::Authentication {
                message: format!("appliance rejected credentials for user {username:?}"),
            });
        }

        // Finalizes the server-side session; only the cookies matter.
        get_bytes(&http, endpoint.clone()).await?;

        info!(endpoint = %endpoint, "logged in");

        let session_token = if reply.sess_token.is_empty() {
            sess_token
        } else {
            reply.sess_token
        };
        Ok(Self {
            http,
            endpoint,
            session_token,
        })
    }
}

/// Form body in the key order the web UI sends.
fn login_form(username: &str, digest: &str, session_token: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("Password", digest)
        .append_pair("Username", username)
        .append_pair("_sessionTOKEN", session_token)
        .append_pair("action", "login")
        .finish()
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &[u8], what: &str) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|e| Error::protocol(format!("malformed {what}: {e}"), body))
}
