//! Stalker Portal Types
//!
//! Type definitions for portal configuration and the upstream
//! Stalker/Ministra middleware responses.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors produced by the portal bridge
#[derive(Debug, Error)]
pub enum StalkerError {
    /// Configuration token is missing, malformed, or inconsistent
    #[error("invalid configuration token: {0}")]
    ConfigDecode(String),
    /// Channel id was not minted by this bridge
    #[error("unrecognized channel id: {0}")]
    ChannelIdDecode(String),
    /// Channel id references a portal absent from the current configuration
    #[error("portal index {index} out of range ({configured} portals configured)")]
    PortalIndexOutOfRange { index: usize, configured: usize },
    /// Handshake transport failure, timeout, or missing token field
    #[error("portal authentication failed: {0}")]
    Auth(String),
    /// Channel list or link response did not match the expected shape
    #[error("unexpected portal response: {0}")]
    UpstreamData(String),
    /// Extracted command value does not carry a recognizable stream URL
    #[error("no playable url in command string: {0:?}")]
    StreamUrlUnrecognized(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// One configured portal: entry address plus the device MAC it is
/// subscribed under.
///
/// Wire names stay `portal` / `mac` so tokens minted by earlier builds of
/// the addon keep decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalEntry {
    #[serde(rename = "portal")]
    pub address: String,
    pub mac: String,
}

/// Ordered portal list. The position of an entry is its portal index and
/// is baked into every channel id handed to the player, so order must not
/// change for the lifetime of one installed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalsConfig {
    #[serde(default)]
    pub portals: Vec<PortalEntry>,
}

impl PortalsConfig {
    /// Look up an entry by portal index
    pub fn entry(&self, index: usize) -> Result<&PortalEntry, StalkerError> {
        self.portals
            .get(index)
            .ok_or(StalkerError::PortalIndexOutOfRange {
                index,
                configured: self.portals.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.portals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portals.is_empty()
    }
}

// ============================================================================
// Session & channel model
// ============================================================================

/// Result of one handshake, scoped to a single (address, mac) pair and a
/// single logical request. Never persisted or shared.
#[derive(Debug, Clone)]
pub struct Session {
    /// Short-lived bearer token from the handshake response
    pub token: String,
    /// Transport session cookie, present on portal variants that require
    /// cookie continuity on data calls
    pub cookie: Option<String>,
}

/// A channel as served to the catalog client, logo already resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
}

/// A resolved playable link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamLink {
    pub url: String,
}

// ============================================================================
// Upstream response shapes
// ============================================================================

/// Every portal response nests its payload under a `js` key
#[derive(Debug, Deserialize)]
pub struct JsEnvelope<T> {
    pub js: T,
}

/// Payload of `type=stb&action=handshake`
#[derive(Debug, Default, Deserialize)]
pub struct HandshakePayload {
    #[serde(default)]
    pub token: Option<String>,
}

/// Payload of `type=itv&action=get_all_channels`
#[derive(Debug, Default, Deserialize)]
pub struct ChannelListPayload {
    #[serde(default)]
    pub data: Vec<UpstreamChannel>,
}

/// One channel as reported by the portal. Some portal variants serialize
/// ids as JSON numbers, others as strings; both are accepted as opaque text.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamChannel {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Payload of `type=itv&action=create_link`
#[derive(Debug, Default, Deserialize)]
pub struct CreateLinkPayload {
    #[serde(default)]
    pub cmd: Option<String>,
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "channel id must be a string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_with_token() {
        let body = r#"{"js":{"token":"abc123"}}"#;
        let env: JsEnvelope<HandshakePayload> = serde_json::from_str(body).unwrap();
        assert_eq!(env.js.token.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_handshake_without_token() {
        let body = r#"{"js":{"msg":"denied"}}"#;
        let env: JsEnvelope<HandshakePayload> = serde_json::from_str(body).unwrap();
        assert!(env.js.token.is_none());
    }

    #[test]
    fn test_channel_id_number_or_string() {
        let body = r#"{"js":{"data":[
            {"id":4211,"name":"One"},
            {"id":"ab:7","name":"Two","logo":"two.png"}
        ]}}"#;
        let env: JsEnvelope<ChannelListPayload> = serde_json::from_str(body).unwrap();
        assert_eq!(env.js.data[0].id, "4211");
        assert_eq!(env.js.data[1].id, "ab:7");
        assert_eq!(env.js.data[1].logo.as_deref(), Some("two.png"));
    }

    #[test]
    fn test_channel_list_missing_data() {
        let body = r#"{"js":{}}"#;
        let env: JsEnvelope<ChannelListPayload> = serde_json::from_str(body).unwrap();
        assert!(env.js.data.is_empty());
    }

    #[test]
    fn test_channel_rejects_object_id() {
        let body = r#"{"js":{"data":[{"id":{"n":1},"name":"Bad"}]}}"#;
        let parsed: Result<JsEnvelope<ChannelListPayload>, _> = serde_json::from_str(body);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_entry_lookup_out_of_range() {
        let config = PortalsConfig {
            portals: vec![PortalEntry {
                address: "http://one.example".to_string(),
                mac: "00:1A:79:00:00:01".to_string(),
            }],
        };
        assert!(config.entry(0).is_ok());
        let err = config.entry(5).unwrap_err();
        assert!(matches!(
            err,
            StalkerError::PortalIndexOutOfRange { index: 5, configured: 1 }
        ));
    }
}
