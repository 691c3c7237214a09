//! Configuration Token Codec
//!
//! The portal list travels as an opaque query parameter: JSON wrapped in
//! URL-safe base64. The bridge itself stores nothing; whoever holds the
//! token holds the configuration.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

use super::types::{PortalsConfig, StalkerError};

/// Encode a portal list into a transport-safe opaque token
pub fn encode_config(config: &PortalsConfig) -> String {
    let json = serde_json::to_vec(config).expect("portal config serializes to JSON");
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a configuration token back into a portal list.
///
/// Tokens minted by earlier builds of the addon used the padded standard
/// alphabet, so that is accepted as a fallback. Malformed tokens and
/// entries with empty fields are a typed failure; callers degrade to "no
/// configuration present".
pub fn decode_config(token: &str) -> Result<PortalsConfig, StalkerError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(StalkerError::ConfigDecode("empty token".to_string()));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .or_else(|_| STANDARD.decode(token))
        .map_err(|e| StalkerError::ConfigDecode(format!("not base64: {}", e)))?;

    let config: PortalsConfig = serde_json::from_slice(&bytes)
        .map_err(|e| StalkerError::ConfigDecode(format!("not a portal list: {}", e)))?;

    for entry in &config.portals {
        if entry.address.trim().is_empty() || entry.mac.trim().is_empty() {
            return Err(StalkerError::ConfigDecode(
                "portal entry with empty address or mac".to_string(),
            ));
        }
    }

    Ok(config)
}

/// Canonicalize a device MAC: accepts `:` or `-` separators in any case,
/// emits the conventional upper-case colon form. Anything that is not six
/// hex byte pairs is rejected.
pub fn normalize_mac(input: &str) -> Result<String, StalkerError> {
    let cleaned = input.trim();
    let parts: Vec<&str> = cleaned.split([':', '-']).collect();

    let well_formed = parts.len() == 6
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()));

    if !well_formed {
        return Err(StalkerError::ConfigDecode(format!(
            "invalid mac address: {}",
            cleaned
        )));
    }

    Ok(parts.join(":").to_ascii_uppercase())
}
