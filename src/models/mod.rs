pub mod addon;

pub use addon::{
    BehaviorHints, CatalogDef, CatalogResponse, Manifest, MetaPreview, StreamEntry,
    StreamsResponse,
};
