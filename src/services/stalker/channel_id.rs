//! Composite Channel Ids
//!
//! A channel id handed to the catalog client must route a later stream
//! request back to the right portal, so it binds the portal index to the
//! upstream channel id: `stalker:<index>:<upstream-id>`.

use super::types::StalkerError;

/// Fixed prefix marking ids minted by this bridge
const ID_PREFIX: &str = "stalker:";

/// Encode a (portal index, upstream id) pair into a composite channel id
pub fn encode_channel_id(portal_index: usize, upstream_id: &str) -> String {
    format!("{}{}:{}", ID_PREFIX, portal_index, upstream_id)
}

/// Decode a composite channel id back into its (portal index, upstream id)
/// pair.
///
/// The upstream id is opaque and may itself contain the separator; the
/// decoder takes everything after the index. Range-checking the index
/// against the configuration is the caller's concern.
pub fn decode_channel_id(id: &str) -> Result<(usize, String), StalkerError> {
    let rest = id
        .strip_prefix(ID_PREFIX)
        .ok_or_else(|| StalkerError::ChannelIdDecode(id.to_string()))?;

    let (index, upstream_id) = rest
        .split_once(':')
        .ok_or_else(|| StalkerError::ChannelIdDecode(id.to_string()))?;

    let index: usize = index
        .parse()
        .map_err(|_| StalkerError::ChannelIdDecode(id.to_string()))?;

    if upstream_id.is_empty() {
        return Err(StalkerError::ChannelIdDecode(id.to_string()));
    }

    Ok((index, upstream_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for (index, upstream) in [(0, "4211"), (1, "abc"), (17, "99")] {
            let id = encode_channel_id(index, upstream);
            assert_eq!(decode_channel_id(&id).unwrap(), (index, upstream.to_string()));
        }
    }

    #[test]
    fn test_round_trip_separator_in_upstream_id() {
        let id = encode_channel_id(2, "ch:live:7");
        assert_eq!(id, "stalker:2:ch:live:7");
        assert_eq!(decode_channel_id(&id).unwrap(), (2, "ch:live:7".to_string()));
    }

    #[test]
    fn test_decode_foreign_ids() {
        for bad in [
            "",
            "4211",
            "tt0903747",
            "stalker:",
            "stalker:abc",
            "stalker:notanumber:42",
            "stalker:1:",
            "stalker:-1:42",
        ] {
            assert!(
                matches!(decode_channel_id(bad), Err(StalkerError::ChannelIdDecode(_))),
                "expected decode failure for {:?}",
                bad
            );
        }
    }
}
