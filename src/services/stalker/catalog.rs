//! Channel Catalog Fetching
//!
//! Enumerates channels for one configured portal. Some configured portals
//! are transiently or permanently unreachable; upstream instability must
//! never break the catalog client, so every failure degrades to an empty
//! list.

use tracing::{info, warn};
use url::Url;

use super::client::StalkerClient;
use super::normalize::normalize_portal_url;
use super::types::{Channel, PortalEntry, StalkerError};
use crate::config::Config;

/// List the channels of one portal, handshaking first. Any transport,
/// authentication, or parse failure yields an empty list.
pub async fn fetch_channel_catalog(entry: &PortalEntry, config: &Config) -> Vec<Channel> {
    match try_fetch(entry, config).await {
        Ok(channels) => {
            info!("{} channels listed from {}", channels.len(), entry.address);
            channels
        }
        Err(e) => {
            warn!("catalog degraded to empty for {}: {}", entry.address, e);
            Vec::new()
        }
    }
}

async fn try_fetch(entry: &PortalEntry, config: &Config) -> Result<Vec<Channel>, StalkerError> {
    let address = normalize_portal_url(&entry.address);
    let client = StalkerClient::new(&address, &entry.mac, config);
    let session = client.handshake().await?;
    let upstream = client.get_all_channels(&session).await?;

    let channels = upstream
        .into_iter()
        .map(|ch| {
            let logo = resolve_logo(&address, ch.logo.as_deref());
            Channel {
                id: ch.id,
                name: ch.name,
                logo,
            }
        })
        .collect();

    Ok(channels)
}

/// Absolute logo URLs pass through; bare filenames are joined against the
/// portal address to produce a servable image URL
fn resolve_logo(address: &str, logo: Option<&str>) -> Option<String> {
    let logo = logo?.trim();
    if logo.is_empty() {
        return None;
    }
    if logo.starts_with("http://") || logo.starts_with("https://") {
        return Some(logo.to_string());
    }

    Url::parse(address)
        .and_then(|base| base.join(logo))
        .map(|joined| joined.to_string())
        .ok()
}
