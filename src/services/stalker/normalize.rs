//! Portal URL Normalization
//!
//! Canonicalizes a user-entered portal address into the entry-script
//! endpoint used for the handshake and all data calls.

/// Entry scripts historically used by Stalker/Ministra installs. An address
/// already naming one of these is taken as-is.
const ENTRY_SCRIPTS: &[&str] = &["load.php", "portal.php"];

/// Default entry-script path appended to bare portal addresses
const DEFAULT_ENTRY_PATH: &str = "/stalker_portal/server/load.php";

/// Normalize a portal address into its entry-script endpoint.
///
/// Rules, in order:
/// 1. trim surrounding whitespace and strip trailing slashes
/// 2. addresses already naming a known entry script pass through unchanged
/// 3. a trailing `/c` STB-portal alias is replaced by the default entry path
/// 4. anything else gets the default entry path appended
///
/// The transform is pure and idempotent: normalizing an already-normalized
/// address is a no-op.
pub fn normalize_portal_url(input: &str) -> String {
    let url = input.trim().trim_end_matches('/');

    if ENTRY_SCRIPTS.iter().any(|script| url.contains(script)) {
        return url.to_string();
    }

    if let Some(base) = url.strip_suffix("/c") {
        return format!("{}{}", base, DEFAULT_ENTRY_PATH);
    }

    format!("{}{}", url, DEFAULT_ENTRY_PATH)
}
