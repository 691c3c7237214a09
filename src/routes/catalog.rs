//! Catalog Route
//!
//! Lists the channels of one configured portal as catalog metas. The
//! portal index rides in the catalog id; the portal list rides in the
//! config token. Per the degrade-to-empty policy, every failure produces
//! an empty catalog, never an error status.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::warn;

use super::manifest::ConfigQuery;
use crate::models::{CatalogResponse, MetaPreview};
use crate::services::stalker::{decode_config, encode_channel_id, fetch_channel_catalog};
use crate::AppState;

/// Catalog id prefix; the trailing number is the portal index
const CATALOG_PREFIX: &str = "stalker_tv";

/// Mint the catalog id for one portal index
pub fn catalog_id(portal_index: usize) -> String {
    format!("{}_{}", CATALOG_PREFIX, portal_index)
}

/// Parse the portal index out of a catalog id. The bare legacy id (no
/// index suffix) addresses portal 0 so single-portal installs made by
/// earlier builds keep working.
pub fn catalog_index(id: &str) -> Option<usize> {
    let id = id.strip_suffix(".json").unwrap_or(id);
    if id == CATALOG_PREFIX {
        return Some(0);
    }
    id.strip_prefix(CATALOG_PREFIX)?
        .strip_prefix('_')?
        .parse()
        .ok()
}

/// GET /catalog/tv/:id
pub async fn catalog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ConfigQuery>,
) -> impl IntoResponse {
    let metas = build_catalog(&state, &id, query.config.as_deref()).await;
    Json(CatalogResponse { metas })
}

async fn build_catalog(state: &AppState, id: &str, token: Option<&str>) -> Vec<MetaPreview> {
    let Some(index) = catalog_index(id) else {
        warn!("unknown catalog id: {}", id);
        return Vec::new();
    };

    let Some(token) = token else {
        warn!("catalog request without configuration");
        return Vec::new();
    };

    let config = match decode_config(token) {
        Ok(config) => config,
        Err(e) => {
            warn!("catalog degraded to empty: {}", e);
            return Vec::new();
        }
    };

    let entry = match config.entry(index) {
        Ok(entry) => entry,
        Err(e) => {
            warn!("catalog degraded to empty: {}", e);
            return Vec::new();
        }
    };

    fetch_channel_catalog(entry, &state.config)
        .await
        .into_iter()
        .map(|channel| MetaPreview {
            id: encode_channel_id(index, &channel.id),
            media_type: "tv".to_string(),
            name: channel.name,
            poster: channel.logo,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_id_round_trip() {
        for index in [0, 1, 42] {
            assert_eq!(catalog_index(&catalog_id(index)), Some(index));
        }
    }

    #[test]
    fn test_catalog_index_accepts_json_suffix() {
        assert_eq!(catalog_index("stalker_tv_3.json"), Some(3));
    }

    #[test]
    fn test_catalog_index_legacy_bare_id() {
        assert_eq!(catalog_index("stalker_tv"), Some(0));
        assert_eq!(catalog_index("stalker_tv.json"), Some(0));
    }

    #[test]
    fn test_catalog_index_rejects_foreign_ids() {
        assert_eq!(catalog_index("other_catalog"), None);
        assert_eq!(catalog_index("stalker_tv_x"), None);
        assert_eq!(catalog_index("stalker_tv_"), None);
    }
}
