//! Stalker Portal Client
//!
//! HTTP client for the Stalker/Ministra middleware protocol: handshake,
//! channel enumeration, and stream-link creation against a single portal,
//! identifying as a fixed emulated MAG set-top box.

use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

use super::types::{
    ChannelListPayload, CreateLinkPayload, HandshakePayload, JsEnvelope, Session, StalkerError,
    UpstreamChannel,
};
use crate::config::Config;

/// Device-model header of the emulated set-top box
const X_USER_AGENT: &str = "Model: MAG250; Link: WiFi";

/// Timezone reported in the STB session cookie
const STB_TIMEZONE: &str = "Europe/Lisbon";

lazy_static! {
    static ref HANDSHAKES_TOTAL: IntCounter = register_int_counter!(
        "stalker_handshakes_total",
        "Portal handshakes attempted"
    )
    .unwrap();
    static ref HANDSHAKE_FAILURES: IntCounter = register_int_counter!(
        "stalker_handshake_failures_total",
        "Portal handshakes that failed"
    )
    .unwrap();
}

/// Client for one (portal, MAC) pair.
///
/// Holds no session state: `handshake` yields a [`Session`] that the data
/// calls take explicitly, so a client value can be created per request and
/// dropped with it.
pub struct StalkerClient {
    http: Client,
    base_url: String,
    mac: String,
}

impl StalkerClient {
    /// Create a client for one portal.
    ///
    /// `address` must already be normalized to the portal's entry script
    /// (see [`super::normalize::normalize_portal_url`]).
    pub fn new(address: &str, mac: &str, config: &Config) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.portal_timeout_ms))
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(true) // portals commonly run self-signed certs
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: address.to_string(),
            mac: mac.to_string(),
        }
    }

    /// STB session cookie: URL-encoded MAC plus the language/timezone
    /// fields portals expect, with any captured transport cookie appended
    fn stb_cookie(&self, session: Option<&Session>) -> String {
        let mut cookie = format!(
            "mac={}; stb_lang=en; timezone={}",
            urlencoding::encode(&self.mac),
            urlencoding::encode(STB_TIMEZONE)
        );
        if let Some(extra) = session.and_then(|s| s.cookie.as_deref()) {
            cookie.push_str("; ");
            cookie.push_str(extra);
        }
        cookie
    }

    /// Issue one authenticated GET against the entry script and unwrap the
    /// `{ js: ... }` envelope. Returns the payload and any session cookie
    /// set by the transport.
    async fn get_js<T: DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
        bearer: &str,
        session: Option<&Session>,
    ) -> Result<(T, Option<String>), StalkerError> {
        debug!("portal request {:?} -> {}", params, self.base_url);

        let response = self
            .http
            .get(&self.base_url)
            .query(params)
            .header("X-User-Agent", X_USER_AGENT)
            .header(COOKIE, self.stb_cookie(session))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(transport_error)?;

        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(first_cookie);

        let status = response.status();
        if !status.is_success() {
            return Err(StalkerError::UpstreamData(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| StalkerError::UpstreamData(e.to_string()))?;

        let envelope: JsEnvelope<T> = serde_json::from_str(&text).map_err(|e| {
            error!("failed to parse portal response: {}", e);
            debug!("response text: {}", &text[..text.len().min(500)]);
            StalkerError::UpstreamData(e.to_string())
        })?;

        Ok((envelope.js, cookie))
    }

    /// `type=stb&action=handshake`: authenticate as a virtual STB.
    ///
    /// The MAC rides both in the session cookie and as the bearer
    /// credential; portal variants differ in which one they check.
    /// Transport errors, timeouts, non-2xx statuses, malformed bodies,
    /// and bodies without a token all surface as [`StalkerError::Auth`].
    pub async fn handshake(&self) -> Result<Session, StalkerError> {
        HANDSHAKES_TOTAL.inc();

        let result = self
            .get_js::<HandshakePayload>(
                &[("type", "stb"), ("action", "handshake"), ("token", "")],
                &self.mac,
                None,
            )
            .await;

        match result {
            Ok((payload, cookie)) => match payload.token {
                Some(token) if !token.is_empty() => {
                    debug!("handshake ok for {} ({})", self.base_url, self.mac);
                    Ok(Session { token, cookie })
                }
                _ => {
                    HANDSHAKE_FAILURES.inc();
                    Err(StalkerError::Auth(
                        "handshake response carried no token".to_string(),
                    ))
                }
            },
            Err(e) => {
                HANDSHAKE_FAILURES.inc();
                Err(StalkerError::Auth(e.to_string()))
            }
        }
    }

    /// `type=itv&action=get_all_channels`: enumerate the portal's TV
    /// channel set
    pub async fn get_all_channels(
        &self,
        session: &Session,
    ) -> Result<Vec<UpstreamChannel>, StalkerError> {
        let (payload, _) = self
            .get_js::<ChannelListPayload>(
                &[("type", "itv"), ("action", "get_all_channels")],
                &session.token,
                Some(session),
            )
            .await?;

        Ok(payload.data)
    }

    /// `type=itv&action=create_link`: ask the portal for a playback
    /// command line for one channel
    pub async fn create_link(
        &self,
        session: &Session,
        cmd: &str,
    ) -> Result<String, StalkerError> {
        let (payload, _) = self
            .get_js::<CreateLinkPayload>(
                &[("type", "itv"), ("action", "create_link"), ("cmd", cmd)],
                &session.token,
                Some(session),
            )
            .await?;

        payload.cmd.ok_or_else(|| {
            StalkerError::UpstreamData("create_link response carried no cmd".to_string())
        })
    }
}

/// Map a reqwest failure to a typed error without leaking the raw cause
fn transport_error(e: reqwest::Error) -> StalkerError {
    if e.is_timeout() {
        StalkerError::UpstreamData("timeout - portal did not respond".to_string())
    } else if e.is_connect() {
        StalkerError::UpstreamData("connection failed - portal unreachable".to_string())
    } else {
        StalkerError::UpstreamData(format!("request failed: {}", e))
    }
}

/// Keep only the `name=value` part of a `Set-Cookie` header
fn first_cookie(header: &str) -> String {
    header.split(';').next().unwrap_or(header).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            portal_timeout_ms: 1000,
            ..Config::from_env()
        }
    }

    #[test]
    fn test_stb_cookie_encodes_mac() {
        let client = StalkerClient::new(
            "http://portal.example/stalker_portal/server/load.php",
            "00:1A:79:12:34:56",
            &test_config(),
        );
        let cookie = client.stb_cookie(None);
        assert!(cookie.starts_with("mac=00%3A1A%3A79%3A12%3A34%3A56"));
        assert!(cookie.contains("stb_lang=en"));
        assert!(cookie.contains("timezone=Europe%2FLisbon"));
    }

    #[test]
    fn test_stb_cookie_appends_session_cookie() {
        let client = StalkerClient::new(
            "http://portal.example/stalker_portal/server/load.php",
            "00:1A:79:12:34:56",
            &test_config(),
        );
        let session = Session {
            token: "tok".to_string(),
            cookie: Some("PHPSESSID=deadbeef".to_string()),
        };
        let cookie = client.stb_cookie(Some(&session));
        assert!(cookie.ends_with("; PHPSESSID=deadbeef"));
    }

    #[test]
    fn test_first_cookie() {
        assert_eq!(
            first_cookie("PHPSESSID=deadbeef; path=/; HttpOnly"),
            "PHPSESSID=deadbeef"
        );
        assert_eq!(first_cookie("plain=1"), "plain=1");
    }
}
