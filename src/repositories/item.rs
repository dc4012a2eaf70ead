use crate::entities::{ItemStatus, SavedItem};
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const ITEM_COLUMNS: &str = "id, user_id, url, status, title, content, og_image, author, \
                            published_at, tags, created_at, updated_at";

/// Content written to an item when extraction succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemContent {
    pub title: Option<String>,
    pub content: Option<String>,
    pub og_image: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Narrows a listing. Empty filter returns everything the owner has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Case-insensitive substring of the title or of any tag.
    pub q: Option<String>,
    pub status: Option<ItemStatus>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepositoryTrait {
    /// Insert a placeholder row for `url` owned by `user_id`.
    async fn create(&self, user_id: Uuid, url: &str, status: ItemStatus) -> Result<SavedItem>;
    async fn mark_completed(&self, id: Uuid, content: &ItemContent) -> Result<SavedItem>;
    async fn mark_failed(&self, id: Uuid) -> Result<SavedItem>;
    /// Owner's items, newest first.
    async fn list_for_user(&self, user_id: Uuid, filter: &ItemFilter) -> Result<Vec<SavedItem>>;
    /// `None` both for unknown ids and for ids owned by someone else.
    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<SavedItem>>;
}

#[derive(Clone)]
pub struct ItemRepository {
    pool: Pool<Postgres>,
}

impl ItemRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepositoryTrait for ItemRepository {
    async fn create(&self, user_id: Uuid, url: &str, status: ItemStatus) -> Result<SavedItem> {
        let item = sqlx::query_as::<_, SavedItem>(&format!(
            r#"
            INSERT INTO saved_items (user_id, url, status)
            VALUES ($1, $2, $3)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(url)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn mark_completed(&self, id: Uuid, content: &ItemContent) -> Result<SavedItem> {
        let item = sqlx::query_as::<_, SavedItem>(&format!(
            r#"
            UPDATE saved_items
            SET title        = $2,
                content      = $3,
                og_image     = $4,
                author       = $5,
                published_at = $6,
                status       = 'COMPLETED',
                updated_at   = clock_timestamp()
            WHERE id = $1 AND status IN ('PENDING', 'PROCESSING')
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(content.title.as_deref())
        .bind(content.content.as_deref())
        .bind(content.og_image.as_deref())
        .bind(content.author.as_deref())
        .bind(content.published_at)
        .fetch_optional(&self.pool)
        .await?;

        match item {
            Some(item) => Ok(item),
            None => bail!("item {} is not awaiting extraction", id),
        }
    }

    async fn mark_failed(&self, id: Uuid) -> Result<SavedItem> {
        let item = sqlx::query_as::<_, SavedItem>(&format!(
            r#"
            UPDATE saved_items
            SET status     = 'FAILED',
                updated_at = clock_timestamp()
            WHERE id = $1 AND status IN ('PENDING', 'PROCESSING')
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match item {
            Some(item) => Ok(item),
            None => bail!("item {} is not awaiting extraction", id),
        }
    }

    async fn list_for_user(&self, user_id: Uuid, filter: &ItemFilter) -> Result<Vec<SavedItem>> {
        let pattern = filter.q.as_deref().map(like_pattern);
        let items = sqlx::query_as::<_, SavedItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM saved_items
            WHERE user_id = $1
              AND ($2::item_status IS NULL OR status = $2)
              AND ($3::text IS NULL
                   OR title ILIKE $3
                   OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $3))
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(filter.status)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<SavedItem>> {
        let item = sqlx::query_as::<_, SavedItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM saved_items
            WHERE id = $1 AND user_id = $2
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }
}

/// Wrap a user query for ILIKE, escaping its own wildcards.
fn like_pattern(q: &str) -> String {
    let mut escaped = String::with_capacity(q.len() + 2);
    escaped.push('%');
    for c in q.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
