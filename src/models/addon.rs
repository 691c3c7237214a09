use serde::Serialize;

/// Addon manifest served to the catalog client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub types: Vec<String>,
    pub resources: Vec<String>,
    pub catalogs: Vec<CatalogDef>,
    pub behavior_hints: BehaviorHints,
}

/// One catalog entry in the manifest; the id carries the portal index
#[derive(Debug, Serialize)]
pub struct CatalogDef {
    #[serde(rename = "type")]
    pub media_type: String,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    pub configurable: bool,
    pub configuration_required: bool,
}

/// Catalog response envelope
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub metas: Vec<MetaPreview>,
}

/// One channel as presented in a catalog
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

/// Stream response envelope
#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<StreamEntry>,
}

/// One playable stream
#[derive(Debug, Serialize)]
pub struct StreamEntry {
    pub title: String,
    pub url: String,
}
