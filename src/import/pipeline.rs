use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::context::RequestContext;
use crate::entities::{ItemStatus, SavedItem};
use crate::extraction::{DiscoverRequest, DiscoveredLink, ExtractionError, Extractor};
use crate::import::normalize::normalize_page;
use crate::repositories::{ItemContent, ItemRepositoryTrait};

/// Status every imported row starts in, for single and batch imports alike.
pub const INITIAL_STATUS: ItemStatus = ItemStatus::Processing;

/// Why an item ended up `FAILED`.
#[derive(Error, Debug)]
pub enum ImportFailure {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("could not store extracted content: {0}")]
    Store(anyhow::Error),
}

impl ImportFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Extraction(err) => err.kind(),
            Self::Store(_) => "store",
        }
    }
}

/// Terminal row for one imported URL, plus the failure cause if any.
#[derive(Debug)]
pub struct ImportOutcome {
    pub item: SavedItem,
    pub failure: Option<ImportFailure>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per input URL, in input order.
    pub outcomes: Vec<ImportOutcome>,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.item.status == ItemStatus::Completed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.item.status == ItemStatus::Failed)
            .count()
    }
}

/// Creates items, drives the extraction service and records the result.
///
/// Everything is sequential: one scrape in flight per call, batches walk
/// their URLs in order. Extraction problems only ever flip the item to
/// `FAILED`; errors returned from here come from the item store.
pub struct ImportPipeline {
    items: Arc<dyn ItemRepositoryTrait + Send + Sync>,
    extractor: Arc<dyn Extractor>,
}

impl ImportPipeline {
    pub fn new(
        items: Arc<dyn ItemRepositoryTrait + Send + Sync>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        Self { items, extractor }
    }

    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id, request_id = %ctx.request_id()))]
    pub async fn import_url(&self, ctx: &RequestContext, url: &str) -> anyhow::Result<ImportOutcome> {
        let item = self.items.create(ctx.user_id, url, INITIAL_STATUS).await?;
        self.process(item).await
    }

    #[instrument(skip_all, fields(user_id = %ctx.user_id, request_id = %ctx.request_id(), total = urls.len()))]
    pub async fn import_batch(
        &self,
        ctx: &RequestContext,
        urls: &[String],
    ) -> anyhow::Result<BatchReport> {
        let mut report = BatchReport {
            outcomes: Vec::with_capacity(urls.len()),
        };
        for url in urls {
            let outcome = self.import_url(ctx, url).await?;
            report.outcomes.push(outcome);
        }

        info!(
            completed = report.completed(),
            failed = report.failed(),
            "batch import finished"
        );
        Ok(report)
    }

    /// Read-only: nothing is persisted for discovered links.
    #[instrument(skip_all, fields(user_id = %ctx.user_id, request_id = %ctx.request_id(), url = %request.url))]
    pub async fn discover(
        &self,
        ctx: &RequestContext,
        request: &DiscoverRequest,
    ) -> Result<Vec<DiscoveredLink>, ExtractionError> {
        let links = self.extractor.map(request).await?;
        info!(links = links.len(), "discovered links");
        Ok(links)
    }

    async fn process(&self, item: SavedItem) -> anyhow::Result<ImportOutcome> {
        let failure = match self.extract(&item.url).await {
            Ok(content) => match self.items.mark_completed(item.id, &content).await {
                Ok(item) => {
                    info!(item_id = %item.id, "item imported");
                    return Ok(ImportOutcome {
                        item,
                        failure: None,
                    });
                }
                Err(err) => ImportFailure::Store(err),
            },
            Err(err) => ImportFailure::Extraction(err),
        };

        warn!(
            item_id = %item.id,
            url = %item.url,
            kind = failure.kind(),
            error = %failure,
            "item import failed"
        );
        let item = self.items.mark_failed(item.id).await?;
        Ok(ImportOutcome {
            item,
            failure: Some(failure),
        })
    }

    async fn extract(&self, url: &str) -> Result<ItemContent, ExtractionError> {
        let page = self.extractor.scrape(url).await?;
        normalize_page(page)
    }
}
