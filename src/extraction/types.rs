use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

/// Upper bound on links returned by a discovery call.
pub const DISCOVERY_LIMIT: usize = 25;

/// JSON schema the extraction service fills in alongside the markdown.
pub fn article_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "author": { "type": "string" },
            "publishedAt": { "type": "string" }
        }
    })
}

/// Normalized result of a scrape call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedPage {
    pub markdown: Option<String>,
    pub metadata: PageMetadata,
    /// Raw schema-constrained extraction, validated later by the importer.
    pub json: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub og_image: Option<String>,
}

/// Seed and optional filter for a discovery call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverRequest {
    pub url: String,
    pub search: Option<String>,
}

impl DiscoverRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            search: None,
        }
    }

    /// Blank filters are dropped rather than sent as `""`.
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DiscoveredLink {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// --- Wire types for the v2 API ---

#[derive(Debug, Serialize)]
pub(crate) struct Location<'a> {
    pub country: &'a str,
    pub languages: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum ScrapeFormat {
    Named(&'static str),
    Json {
        #[serde(rename = "type")]
        kind: &'static str,
        schema: Value,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScrapeRequest<'a> {
    pub url: &'a str,
    pub formats: Vec<ScrapeFormat>,
    pub location: Location<'a>,
    pub only_main_content: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScrapeResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<ScrapeData>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScrapeData {
    pub markdown: Option<String>,
    pub json: Option<Value>,
    #[serde(default)]
    pub metadata: PageMetadata,
}

#[derive(Debug, Serialize)]
pub(crate) struct MapRequest<'a> {
    pub url: &'a str,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<&'a str>,
    pub location: Location<'a>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MapResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub links: Vec<DiscoveredLink>,
    pub error: Option<String>,
}

/// Metadata fields sometimes come back as arrays (one entry per matching
/// meta tag). Keep the first string, ignore anything else.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Array(items)) => items.into_iter().find_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        }),
        _ => None,
    })
}
