//! Turns a scrape result into the fields stored on an item.
//!
//! The extraction service is loose about shapes: metadata may be missing,
//! strings may be empty, and the published date is free text produced by a
//! model. Everything here is total: a bad date becomes `None`, never an
//! error. Only a missing or mistyped JSON extraction rejects the page.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::extraction::{ExtractionError, ScrapedPage};
use crate::repositories::ItemContent;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleFields {
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

pub fn normalize_page(page: ScrapedPage) -> Result<ItemContent, ExtractionError> {
    let json = page.json.ok_or_else(|| {
        ExtractionError::MalformedResponse("missing json extraction".to_string())
    })?;
    let fields: ArticleFields = serde_json::from_value(json)
        .map_err(|e| ExtractionError::MalformedResponse(format!("json extraction: {}", e)))?;

    Ok(ItemContent {
        title: non_empty(page.metadata.title),
        content: non_empty(page.markdown),
        og_image: non_empty(page.metadata.og_image),
        author: non_empty(fields.author),
        published_at: fields.published_at.as_deref().and_then(parse_published_at),
    })
}

/// Best-effort parse of a human or machine written publication date.
/// Values without an offset are taken as UTC; bare dates as midnight UTC.
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
