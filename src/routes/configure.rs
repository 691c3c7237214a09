//! Configuration Routes
//!
//! Serves the portal configuration form and turns submissions into the
//! opaque config token baked into the addon install URL. This is the one
//! place where bad input is a user-visible error instead of an empty
//! result.

use axum::{
    extract::{RawForm, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Json,
};
use std::sync::Arc;

use crate::services::stalker::{
    encode_config, normalize_mac, normalize_portal_url, PortalEntry, PortalsConfig,
};
use crate::AppState;

const FORM_PAGE: &str = r##"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Stalker Bridge</title>
  <style>
    body { font-family: sans-serif; max-width: 480px; margin: 2rem auto; padding: 0 1rem; }
    fieldset { border: 1px solid #ccc; border-radius: 6px; margin-bottom: 1rem; }
    label { display: block; margin-top: .5rem; }
    input { width: 100%; padding: .4rem; margin-top: .2rem; box-sizing: border-box; }
    button { margin-top: 1rem; margin-right: .5rem; padding: .5rem 1rem; }
  </style>
</head>
<body>
  <h2>Configure Stalker IPTV</h2>
  <form method="POST" action="/configure">
    <div id="portals">
      <fieldset class="portal">
        <legend>Portal</legend>
        <label>Portal URL</label>
        <input name="portal" placeholder="http://portal.example/c" required>
        <label>MAC Address</label>
        <input name="mac" placeholder="00:1A:79:12:34:56" required>
      </fieldset>
    </div>
    <button type="button" onclick="addPortal()">Add another portal</button>
    <button type="submit">Save &amp; Install</button>
  </form>
  <script>
    function addPortal() {
      const first = document.querySelector("#portals .portal");
      const copy = first.cloneNode(true);
      copy.querySelectorAll("input").forEach((input) => { input.value = ""; });
      document.getElementById("portals").appendChild(copy);
    }
  </script>
</body>
</html>
"##;

/// GET /configure - portal configuration form
pub async fn configure_page() -> impl IntoResponse {
    Html(FORM_PAGE)
}

/// POST /configure - validate the submitted (portal, mac) pairs and
/// redirect to the addon install URL carrying the encoded configuration
pub async fn submit_configuration(
    State(state): State<Arc<AppState>>,
    RawForm(body): RawForm,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let (portals, macs) = parse_portal_pairs(&body);

    let config = build_config(portals, macs)
        .map_err(|msg| (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": msg }))))?;

    let token = encode_config(&config);
    let host = state
        .config
        .base_url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let install_url = format!("stremio://{}/manifest.json?config={}", host, token);

    tracing::info!("configuration submitted: {} portal(s)", config.len());

    Ok(Redirect::to(&install_url))
}

/// Collect repeated `portal` / `mac` form fields in submission order
fn parse_portal_pairs(body: &[u8]) -> (Vec<String>, Vec<String>) {
    let mut portals = Vec::new();
    let mut macs = Vec::new();

    for (key, value) in url::form_urlencoded::parse(body) {
        match key.as_ref() {
            "portal" => portals.push(value.into_owned()),
            "mac" => macs.push(value.into_owned()),
            _ => {}
        }
    }

    (portals, macs)
}

/// Pair up addresses and MACs into a validated portal list. Addresses are
/// normalized and MACs canonicalized here, so the token always carries
/// clean entries.
fn build_config(portals: Vec<String>, macs: Vec<String>) -> Result<PortalsConfig, String> {
    if portals.is_empty() {
        return Err("at least one portal is required".to_string());
    }
    if portals.len() != macs.len() {
        return Err("every portal needs a matching mac address".to_string());
    }

    let mut entries = Vec::with_capacity(portals.len());
    for (portal, mac) in portals.into_iter().zip(macs) {
        if portal.trim().is_empty() {
            return Err("portal address must not be empty".to_string());
        }
        let mac = normalize_mac(&mac).map_err(|e| e.to_string())?;
        entries.push(PortalEntry {
            address: normalize_portal_url(&portal),
            mac,
        });
    }

    Ok(PortalsConfig { portals: entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_portal_pairs_in_order() {
        let body = b"portal=http%3A%2F%2Fone.example&mac=00%3A1A%3A79%3A11%3A11%3A11\
                     &portal=http%3A%2F%2Ftwo.example&mac=00%3A1A%3A79%3A22%3A22%3A22";
        let (portals, macs) = parse_portal_pairs(body);
        assert_eq!(portals, vec!["http://one.example", "http://two.example"]);
        assert_eq!(
            macs,
            vec!["00:1A:79:11:11:11", "00:1A:79:22:22:22"]
        );
    }

    #[test]
    fn test_build_config_normalizes_entries() {
        let config = build_config(
            vec!["http://one.example/c/".to_string()],
            vec!["00-1a-79-ab-cd-ef".to_string()],
        )
        .unwrap();
        assert_eq!(
            config.portals[0].address,
            "http://one.example/stalker_portal/server/load.php"
        );
        assert_eq!(config.portals[0].mac, "00:1A:79:AB:CD:EF");
    }

    #[test]
    fn test_build_config_rejects_bad_input() {
        assert!(build_config(vec![], vec![]).is_err());
        assert!(build_config(
            vec!["http://one.example".to_string()],
            vec![]
        )
        .is_err());
        assert!(build_config(
            vec!["http://one.example".to_string()],
            vec!["not-a-mac".to_string()]
        )
        .is_err());
        assert!(build_config(
            vec!["   ".to_string()],
            vec!["00:1A:79:AB:CD:EF".to_string()]
        )
        .is_err());
    }
}
