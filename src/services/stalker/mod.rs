//! Stalker/Ministra Portal Integration
//!
//! This module is the protocol core of the bridge: everything that talks
//! to, or encodes identity for, a Stalker/Ministra IPTV portal.
//!
//! # Overview
//!
//! A portal is addressed by a user-entered URL plus a device MAC. The
//! bridge authenticates as a virtual MAG set-top box and drives three
//! portal actions:
//!
//! - **handshake**: exchange the MAC for a short-lived bearer token
//! - **get_all_channels**: enumerate the portal's TV channel set
//! - **create_link**: turn a channel reference into a playable URL
//!
//! Several portals can be configured at once. The whole list travels as an
//! opaque token and every channel id carries the index of the portal that
//! owns it, so the stateless handlers can route back to the right one:
//!
//! ```text
//! config token -> PortalsConfig -[index]-> PortalEntry
//!                                              | normalize_portal_url
//!                                              v
//!                                        StalkerClient -> handshake
//!                                              |
//!                              get_all_channels / create_link
//! ```
//!
//! Nothing is cached or shared between requests: each catalog or stream
//! request decodes its own config, handshakes, and drops the session.

pub mod catalog;
pub mod channel_id;
pub mod client;
pub mod config;
pub mod link;
pub mod normalize;
pub mod types;

// Re-exports for convenience
pub use catalog::fetch_channel_catalog;
pub use channel_id::{decode_channel_id, encode_channel_id};
pub use client::StalkerClient;
pub use config::{decode_config, encode_config, normalize_mac};
pub use link::{extract_stream_url, resolve_stream_link};
pub use normalize::normalize_portal_url;
pub use types::{
    Channel, PortalEntry, PortalsConfig, Session, StalkerError, StreamLink, UpstreamChannel,
};
