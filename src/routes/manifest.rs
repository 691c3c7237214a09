//! Manifest Route
//!
//! The manifest tells the catalog client what this addon serves: one TV
//! catalog per configured portal, each catalog id carrying its portal
//! index.

use axum::{extract::Query, response::IntoResponse, Json};
use serde::Deserialize;
use url::Url;

use super::catalog::catalog_id;
use crate::models::{BehaviorHints, CatalogDef, Manifest};
use crate::services::stalker::{decode_config, normalize_portal_url, PortalsConfig};

/// Stable addon identifier
const ADDON_ID: &str = "org.stalkerbridge.multiportal";

/// Query parameters common to the addon endpoints
#[derive(Deserialize, Default)]
pub struct ConfigQuery {
    pub config: Option<String>,
}

/// GET /manifest.json
///
/// A missing or malformed config token yields a manifest with no
/// catalogs; the addon still installs and can be configured later.
pub async fn manifest(Query(query): Query<ConfigQuery>) -> impl IntoResponse {
    let config = query
        .config
        .as_deref()
        .and_then(|token| decode_config(token).ok())
        .unwrap_or_default();

    Json(Manifest {
        id: ADDON_ID.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: "Stalker IPTV (Multi-Portal)".to_string(),
        description: "Watch live TV from Stalker/Ministra portals".to_string(),
        types: vec!["tv".to_string()],
        resources: vec!["catalog".to_string(), "stream".to_string()],
        catalogs: catalog_defs(&config),
        behavior_hints: BehaviorHints {
            configurable: true,
            configuration_required: false,
        },
    })
}

fn catalog_defs(config: &PortalsConfig) -> Vec<CatalogDef> {
    config
        .portals
        .iter()
        .enumerate()
        .map(|(index, entry)| CatalogDef {
            media_type: "tv".to_string(),
            id: catalog_id(index),
            name: catalog_name(index, &entry.address),
        })
        .collect()
}

/// Label a catalog by its portal host where possible
fn catalog_name(index: usize, address: &str) -> String {
    Url::parse(&normalize_portal_url(address))
        .ok()
        .and_then(|url| url.host_str().map(|host| format!("Stalker IPTV ({})", host)))
        .unwrap_or_else(|| format!("Stalker IPTV {}", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stalker::PortalEntry;

    #[test]
    fn test_catalog_defs_one_per_portal() {
        let config = PortalsConfig {
            portals: vec![
                PortalEntry {
                    address: "http://one.example".to_string(),
                    mac: "00:1A:79:11:11:11".to_string(),
                },
                PortalEntry {
                    address: "http://two.example/c".to_string(),
                    mac: "00:1A:79:22:22:22".to_string(),
                },
            ],
        };
        let defs = catalog_defs(&config);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].id, "stalker_tv_0");
        assert_eq!(defs[1].id, "stalker_tv_1");
        assert_eq!(defs[0].name, "Stalker IPTV (one.example)");
        assert_eq!(defs[1].name, "Stalker IPTV (two.example)");
    }

    #[test]
    fn test_catalog_name_falls_back_to_index() {
        assert_eq!(catalog_name(2, "not a url"), "Stalker IPTV 3");
    }
}
