use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::{ExtractionConfig, ScrapeLocale};
use crate::extraction::{
    Extractor,
    errors::ExtractionError,
    types::{
        DISCOVERY_LIMIT, DiscoverRequest, DiscoveredLink, Location, MapRequest, MapResponse,
        ScrapeFormat, ScrapeRequest, ScrapeResponse, ScrapedPage, article_schema,
    },
};

const USER_AGENT: &str = "StashBot/0.1 (+https://stash.example.com)";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ERROR_MESSAGE_LEN: usize = 300;

/// Client for the hosted Firecrawl extraction API (v2).
pub struct FirecrawlClient {
    client: Client,
    base_url: String,
    api_key: String,
    locale: ScrapeLocale,
}

impl FirecrawlClient {
    pub fn new(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        let client = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            locale: config.locale.clone(),
        })
    }

    fn location(&self) -> Location<'_> {
        Location {
            country: &self.locale.country,
            languages: &self.locale.languages,
        }
    }

    async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<R, ExtractionError> {
        let url = format!("{}/v2/{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(ExtractionError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api {
                status,
                message: api_error_message(&text),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(ExtractionError::from_reqwest_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl Extractor for FirecrawlClient {
    #[instrument(skip_all, fields(url = %url))]
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, ExtractionError> {
        url::Url::parse(url)?;

        let request = ScrapeRequest {
            url,
            formats: vec![
                ScrapeFormat::Named("markdown"),
                ScrapeFormat::Json {
                    kind: "json",
                    schema: article_schema(),
                },
            ],
            location: self.location(),
            only_main_content: true,
        };

        let response: ScrapeResponse = self.post("scrape", &request).await?;
        if !response.success {
            return Err(ExtractionError::Unsuccessful(
                response.error.unwrap_or_else(|| "scrape failed".to_string()),
            ));
        }
        let data = response
            .data
            .ok_or_else(|| ExtractionError::MalformedResponse("missing data".to_string()))?;

        debug!(
            markdown_bytes = data.markdown.as_ref().map_or(0, String::len),
            has_json = data.json.is_some(),
            "scrape succeeded"
        );

        Ok(ScrapedPage {
            markdown: data.markdown,
            metadata: data.metadata,
            json: data.json,
        })
    }

    #[instrument(skip_all, fields(url = %request.url, search = ?request.search))]
    async fn map(&self, request: &DiscoverRequest) -> Result<Vec<DiscoveredLink>, ExtractionError> {
        url::Url::parse(&request.url)?;

        let body = MapRequest {
            url: &request.url,
            limit: DISCOVERY_LIMIT,
            search: request.search.as_deref(),
            location: self.location(),
        };

        let response: MapResponse = self.post("map", &body).await?;
        if !response.success {
            return Err(ExtractionError::Unsuccessful(
                response.error.unwrap_or_else(|| "map failed".to_string()),
            ));
        }

        let mut links = response.links;
        links.truncate(DISCOVERY_LIMIT);
        debug!(links = links.len(), "map succeeded");
        Ok(links)
    }
}

/// Firecrawl reports errors as `{"success": false, "error": "..."}`; fall
/// back to the raw body for anything else.
fn api_error_message(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    message.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}
