pub mod client;
pub mod errors;
pub mod types;

use async_trait::async_trait;

pub use client::FirecrawlClient;
pub use errors::ExtractionError;
pub use types::{DiscoverRequest, DiscoveredLink, PageMetadata, ScrapedPage};

/// Seam between the import pipeline and the hosted extraction service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Scrape one page as markdown plus the article JSON extraction.
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, ExtractionError>;

    /// Enumerate candidate links under a seed URL, at most
    /// [`types::DISCOVERY_LIMIT`] of them.
    async fn map(&self, request: &DiscoverRequest) -> Result<Vec<DiscoveredLink>, ExtractionError>;
}
