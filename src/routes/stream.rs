//! Stream Route
//!
//! Resolves a composite channel id back to its portal and asks it for a
//! playable link. Same degrade-to-empty policy as the catalog: a request
//! that cannot be satisfied answers `{ "streams": [] }`, never an error
//! status.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::warn;

use super::manifest::ConfigQuery;
use crate::models::{StreamEntry, StreamsResponse};
use crate::services::stalker::{decode_channel_id, decode_config, resolve_stream_link};
use crate::AppState;

/// GET /stream/tv/:id
pub async fn stream(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ConfigQuery>,
) -> impl IntoResponse {
    let streams = build_streams(&state, &id, query.config.as_deref()).await;
    Json(StreamsResponse { streams })
}

async fn build_streams(state: &AppState, id: &str, token: Option<&str>) -> Vec<StreamEntry> {
    let id = id.strip_suffix(".json").unwrap_or(id);

    let (index, upstream_id) = match decode_channel_id(id) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("stream degraded to empty: {}", e);
            return Vec::new();
        }
    };

    let Some(token) = token else {
        warn!("stream request without configuration");
        return Vec::new();
    };

    let config = match decode_config(token) {
        Ok(config) => config,
        Err(e) => {
            warn!("stream degraded to empty: {}", e);
            return Vec::new();
        }
    };

    let entry = match config.entry(index) {
        Ok(entry) => entry,
        Err(e) => {
            warn!("stream degraded to empty: {}", e);
            return Vec::new();
        }
    };

    match resolve_stream_link(entry, &upstream_id, &state.config).await {
        Some(link) => vec![StreamEntry {
            title: "Stalker IPTV".to_string(),
            url: link.url,
        }],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::services::stalker::{
        decode_channel_id, PortalEntry, PortalsConfig, StalkerError,
    };

    fn two_portals() -> PortalsConfig {
        PortalsConfig {
            portals: vec![
                PortalEntry {
                    address: "http://one.example".to_string(),
                    mac: "00:1A:79:11:11:11".to_string(),
                },
                PortalEntry {
                    address: "http://two.example".to_string(),
                    mac: "00:1A:79:22:22:22".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_channel_id_routes_to_addressed_portal_only() {
        let config = two_portals();
        let (index, upstream_id) = decode_channel_id("stalker:1:4211").unwrap();
        let entry = config.entry(index).unwrap();
        assert_eq!(entry.address, "http://two.example");
        assert_eq!(entry.mac, "00:1A:79:22:22:22");
        assert_eq!(upstream_id, "4211");
    }

    #[test]
    fn test_out_of_range_portal_index() {
        let config = two_portals();
        let (index, _) = decode_channel_id("stalker:5:4211").unwrap();
        assert!(matches!(
            config.entry(index),
            Err(StalkerError::PortalIndexOutOfRange {
                index: 5,
                configured: 2
            })
        ));
    }
}
