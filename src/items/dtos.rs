use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::IntoDeserializer};
use url::Url;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::{ItemStatus, SavedItem};
use crate::extraction::{DiscoverRequest, DiscoveredLink};
use crate::import::BatchReport;
use crate::repositories::ItemFilter;

const MAX_URL_LEN: usize = 2048;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportItemRequest {
    pub url: String,
}

impl ImportItemRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_url(&self.url)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchImportRequest {
    pub urls: Vec<String>,
}

impl BatchImportRequest {
    /// All or nothing: one bad URL rejects the whole batch.
    pub fn validate(&self) -> Result<(), String> {
        for (index, url) in self.urls.iter().enumerate() {
            validate_url(url).map_err(|e| format!("urls[{}]: {}", index, e))?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DiscoverLinksRequest {
    pub url: String,
    pub search: Option<String>,
}

impl DiscoverLinksRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_url(&self.url)
    }
}

impl From<DiscoverLinksRequest> for DiscoverRequest {
    fn from(request: DiscoverLinksRequest) -> Self {
        DiscoverRequest::new(request.url).with_search(request.search)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListItemsQuery {
    /// Case-insensitive match against title or tags.
    pub q: Option<String>,
    /// Exact status; `all` or empty means no status filter.
    #[serde(default, deserialize_with = "status_filter")]
    pub status: Option<ItemStatus>,
}

fn status_filter<'de, D>(deserializer: D) -> Result<Option<ItemStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => ItemStatus::deserialize(IntoDeserializer::<D::Error>::into_deserializer(
            s.to_ascii_uppercase(),
        ))
        .map(Some),
    }
}

impl From<ListItemsQuery> for ItemFilter {
    fn from(query: ListItemsQuery) -> Self {
        ItemFilter {
            q: query
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            status: query.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub url: String,
    pub status: ItemStatus,
    pub title: Option<String>,
    pub content: Option<String>,
    pub og_image: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SavedItem> for ItemResponse {
    fn from(item: SavedItem) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            url: item.url,
            status: item.status,
            title: item.title,
            content: item.content,
            og_image: item.og_image,
            author: item.author,
            published_at: item.published_at,
            tags: item.tags,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemListResponse {
    pub items: Vec<ItemResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchImportResponse {
    /// One entry per submitted URL, in submission order.
    pub items: Vec<ItemResponse>,
    pub completed: usize,
    pub failed: usize,
}

impl From<BatchReport> for BatchImportResponse {
    fn from(report: BatchReport) -> Self {
        let completed = report.completed();
        let failed = report.failed();
        Self {
            items: report
                .outcomes
                .into_iter()
                .map(|outcome| outcome.item.into())
                .collect(),
            completed,
            failed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiscoverLinksResponse {
    pub links: Vec<DiscoveredLink>,
}

fn validate_url(raw: &str) -> Result<(), String> {
    if raw.trim().is_empty() {
        return Err("URL cannot be empty".to_string());
    }
    if raw.len() > MAX_URL_LEN {
        return Err("URL too long".to_string());
    }
    let url = Url::parse(raw).map_err(|_| "Invalid URL".to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err("URL must use http or https".to_string());
    }
    Ok(())
}
