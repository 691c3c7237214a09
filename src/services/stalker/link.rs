//! Stream Link Resolution
//!
//! Requests a playback link for one channel and digs the playable URL out
//! of the upstream command string. Portals return anything from a bare URL
//! to a multi-argument command line with a legacy media-player invocation
//! in front; extraction is a small ordered rule set, first match wins.

use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};
use tracing::{info, warn};

use super::client::StalkerClient;
use super::normalize::normalize_portal_url;
use super::types::{PortalEntry, StalkerError, StreamLink};
use crate::config::Config;

/// Player-invocation tokens seen in front of the URL in command strings
const PLAYER_PREFIXES: &[&str] = &["ffmpeg", "ffrt", "ffrt2", "ffrt3", "auto"];

/// Schemes accepted as playable
const URL_SCHEMES: &[&str] = &[
    "http://", "https://", "rtmp://", "rtsp://", "udp://", "rtp://",
];

lazy_static! {
    static ref LINKS_RESOLVED: IntCounter = register_int_counter!(
        "stalker_links_resolved_total",
        "Stream links successfully resolved"
    )
    .unwrap();
}

/// Resolve a playable URL for one channel of one portal, handshaking
/// first. Transport failures, failed handshakes, malformed responses,
/// and command strings without a recognizable URL all yield `None`.
pub async fn resolve_stream_link(
    entry: &PortalEntry,
    upstream_id: &str,
    config: &Config,
) -> Option<StreamLink> {
    match try_resolve(entry, upstream_id, config).await {
        Ok(link) => {
            LINKS_RESOLVED.inc();
            info!("resolved channel {} on {}", upstream_id, entry.address);
            Some(link)
        }
        Err(e) => {
            warn!(
                "stream degraded to empty for channel {} on {}: {}",
                upstream_id, entry.address, e
            );
            None
        }
    }
}

async fn try_resolve(
    entry: &PortalEntry,
    upstream_id: &str,
    config: &Config,
) -> Result<StreamLink, StalkerError> {
    let address = normalize_portal_url(&entry.address);
    let client = StalkerClient::new(&address, &entry.mac, config);
    let session = client.handshake().await?;

    let cmd = client
        .create_link(&session, &channel_command(upstream_id))
        .await?;

    let url =
        extract_stream_url(&cmd).ok_or_else(|| StalkerError::StreamUrlUnrecognized(cmd.clone()))?;

    Ok(StreamLink { url })
}

/// Build the `cmd` request parameter naming the target channel.
///
/// Upstream portals vary: some hand out full command strings as channel
/// references and expect them echoed back, others expect the legacy
/// player-invocation form around a localhost channel path.
fn channel_command(upstream_id: &str) -> String {
    let id = upstream_id.trim();
    let first = id.split_whitespace().next().unwrap_or("");

    if id.contains("://") || PLAYER_PREFIXES.contains(&first) {
        id.to_string()
    } else {
        format!("ffmpeg http://localhost/ch/{}", id)
    }
}

/// Extract the playable URL from an upstream command string.
///
/// Rules, in order, first match wins:
/// 1. an explicit `-i` input flag followed by a URL-looking token
/// 2. strip recognized leading invocation tokens, keep the rest whole
/// 3. the last whitespace-delimited token
///
/// The winner must start with a recognized scheme, otherwise there is no
/// link.
pub fn extract_stream_url(cmd: &str) -> Option<String> {
    let tokens: Vec<&str> = cmd.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    if let Some(pos) = tokens.iter().position(|t| *t == "-i") {
        if let Some(next) = tokens.get(pos + 1) {
            if is_stream_url(next) {
                return Some((*next).to_string());
            }
        }
    }

    let mut rest = tokens.as_slice();
    while let Some((first, tail)) = rest.split_first() {
        if PLAYER_PREFIXES.contains(first) {
            rest = tail;
        } else {
            break;
        }
    }

    let candidate = if rest.len() < tokens.len() {
        rest.join(" ")
    } else {
        (*tokens.last()?).to_string()
    };

    if is_stream_url(&candidate) {
        Some(candidate)
    } else {
        None
    }
}

fn is_stream_url(value: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| value.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_prefixed_forms() {
        assert_eq!(
            extract_stream_url("ffmpeg http://h/x.m3u8").as_deref(),
            Some("http://h/x.m3u8")
        );
        assert_eq!(
            extract_stream_url("ffrt http://h/x.m3u8").as_deref(),
            Some("http://h/x.m3u8")
        );
        assert_eq!(
            extract_stream_url("auto http://h/x.m3u8").as_deref(),
            Some("http://h/x.m3u8")
        );
    }

    #[test]
    fn test_extract_bare_url() {
        assert_eq!(
            extract_stream_url("http://h/x.m3u8").as_deref(),
            Some("http://h/x.m3u8")
        );
    }

    #[test]
    fn test_extract_input_flag_form() {
        assert_eq!(
            extract_stream_url("something -i http://h/x.m3u8 extra").as_deref(),
            Some("http://h/x.m3u8")
        );
    }

    #[test]
    fn test_extract_other_schemes() {
        assert_eq!(
            extract_stream_url("ffrt2 rtmp://h/live/ch1").as_deref(),
            Some("rtmp://h/live/ch1")
        );
        assert_eq!(
            extract_stream_url("udp://239.0.0.1:1234").as_deref(),
            Some("udp://239.0.0.1:1234")
        );
    }

    #[test]
    fn test_extract_rejects_non_urls() {
        assert_eq!(extract_stream_url(""), None);
        assert_eq!(extract_stream_url("   "), None);
        assert_eq!(extract_stream_url("ffmpeg"), None);
        assert_eq!(extract_stream_url("no stream here"), None);
        assert_eq!(extract_stream_url("-i notaurl"), None);
    }

    #[test]
    fn test_channel_command_wraps_bare_ids() {
        assert_eq!(
            channel_command("4211"),
            "ffmpeg http://localhost/ch/4211"
        );
    }

    #[test]
    fn test_channel_command_passes_through_full_refs() {
        assert_eq!(
            channel_command("ffmpeg http://localhost/ch/4211"),
            "ffmpeg http://localhost/ch/4211"
        );
        assert_eq!(
            channel_command("http://h/stream/7"),
            "http://h/stream/7"
        );
    }
}
