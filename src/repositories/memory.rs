//! In-memory item store for unit tests.

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Mutex;
use uuid::Uuid;

use crate::entities::{ItemStatus, SavedItem};
use crate::repositories::item::{ItemContent, ItemFilter, ItemRepositoryTrait};

#[derive(Default)]
pub struct InMemoryItemRepository {
    items: Mutex<Vec<SavedItem>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored row, in insertion order.
    pub fn snapshot(&self) -> Vec<SavedItem> {
        self.items.lock().unwrap().clone()
    }

    fn update(&self, id: Uuid, apply: impl FnOnce(&mut SavedItem)) -> Result<SavedItem> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| anyhow!("item {} not found", id))?;
        if item.status.is_terminal() {
            bail!("item {} is not awaiting extraction", id);
        }
        apply(item);
        item.updated_at = Utc::now();
        Ok(item.clone())
    }
}

/// Same semantics as the SQL in `ItemRepository::list_for_user`.
fn filter_matches(filter: &ItemFilter, item: &SavedItem) -> bool {
    let status_ok = filter.status.is_none_or(|status| item.status == status);
    let query_ok = match filter.q.as_deref() {
        None => true,
        Some(q) => {
            let needle = q.to_lowercase();
            item.title
                .as_deref()
                .is_some_and(|title| title.to_lowercase().contains(&needle))
                || item
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle))
        }
    };
    status_ok && query_ok
}

#[async_trait]
impl ItemRepositoryTrait for InMemoryItemRepository {
    async fn create(&self, user_id: Uuid, url: &str, status: ItemStatus) -> Result<SavedItem> {
        let mut items = self.items.lock().unwrap();
        // Strictly increasing timestamps, even within one clock tick.
        let created_at = match items.last() {
            Some(last) => (last.created_at + Duration::microseconds(1)).max(Utc::now()),
            None => Utc::now(),
        };
        let item = SavedItem {
            id: Uuid::new_v4(),
            user_id,
            url: url.to_string(),
            status,
            title: None,
            content: None,
            og_image: None,
            author: None,
            published_at: None,
            tags: Vec::new(),
            created_at,
            updated_at: created_at,
        };
        items.push(item.clone());
        Ok(item)
    }

    async fn mark_completed(&self, id: Uuid, content: &ItemContent) -> Result<SavedItem> {
        self.update(id, |item| {
            item.title = content.title.clone();
            item.content = content.content.clone();
            item.og_image = content.og_image.clone();
            item.author = content.author.clone();
            item.published_at = content.published_at;
            item.status = ItemStatus::Completed;
        })
    }

    async fn mark_failed(&self, id: Uuid) -> Result<SavedItem> {
        self.update(id, |item| item.status = ItemStatus::Failed)
    }

    async fn list_for_user(&self, user_id: Uuid, filter: &ItemFilter) -> Result<Vec<SavedItem>> {
        let mut items: Vec<SavedItem> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| item.user_id == user_id && filter_matches(filter, item))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<SavedItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id == id && item.user_id == user_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: Option<&str>, tags: &[&str], status: ItemStatus) -> SavedItem {
        let now = Utc::now();
        SavedItem {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            url: "https://example.com".to_string(),
            status,
            title: title.map(str::to_string),
            content: None,
            og_image: None,
            author: None,
            published_at: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ItemFilter::default();
        assert!(filter_matches(&filter, &item(None, &[], ItemStatus::Failed)));
    }

    #[test]
    fn test_filter_matches_title_case_insensitively() {
        let filter = ItemFilter {
            q: Some("RUST".to_string()),
            status: None,
        };
        assert!(filter_matches(&filter, &item(Some("Learning Rust"), &[], ItemStatus::Completed)));
        assert!(!filter_matches(&filter, &item(Some("Learning Go"), &[], ItemStatus::Completed)));
        assert!(!filter_matches(&filter, &item(None, &[], ItemStatus::Completed)));
    }

    #[test]
    fn test_filter_matches_tags() {
        let filter = ItemFilter {
            q: Some("async".to_string()),
            status: None,
        };
        assert!(filter_matches(&filter, &item(Some("Tokio"), &["Async-IO"], ItemStatus::Completed)));
    }

    #[test]
    fn test_filter_combines_status_and_query() {
        let filter = ItemFilter {
            q: Some("rust".to_string()),
            status: Some(ItemStatus::Completed),
        };
        assert!(filter_matches(&filter, &item(Some("rust"), &[], ItemStatus::Completed)));
        assert!(!filter_matches(&filter, &item(Some("rust"), &[], ItemStatus::Failed)));
    }

    #[tokio::test]
    async fn test_list_applies_filter_per_owner() {
        let repo = InMemoryItemRepository::new();
        let owner = Uuid::new_v4();
        let kept = repo
            .create(owner, "https://example.com/a", ItemStatus::Processing)
            .await
            .unwrap();
        repo.mark_failed(kept.id).await.unwrap();
        repo.create(owner, "https://example.com/b", ItemStatus::Processing)
            .await
            .unwrap();
        repo.create(Uuid::new_v4(), "https://example.com/c", ItemStatus::Processing)
            .await
            .unwrap();

        let filter = ItemFilter {
            q: None,
            status: Some(ItemStatus::Failed),
        };
        let listed = repo.list_for_user(owner, &filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, kept.id);
    }
}
