//! Feed and search service.

use crate::services::pin::resolve_title;
use pinboard_common::AppResult;
use pinboard_db::repositories::{PinRepository, PinRow};
use serde::Serialize;

/// Default number of entries returned by the feed.
const DEFAULT_FEED_LIMIT: u64 = 20;

/// One entry of the feed or a search result, with the display title
/// already resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub pin_id: String,
    pub title: String,
    pub tags: Option<String>,
    pub source_url: Option<String>,
    pub original_pin_id: Option<String>,
    pub image_url: Option<String>,
    pub board_id: String,
    pub board_name: String,
    pub user_id: String,
    pub username: String,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<PinRow> for FeedEntry {
    fn from(row: PinRow) -> Self {
        let title = resolve_title(
            row.title.as_deref(),
            row.tags.as_deref(),
            row.source_url.as_deref(),
        );
        Self {
            pin_id: row.pin_id,
            title,
            tags: row.tags,
            source_url: row.source_url,
            original_pin_id: row.original_pin_id,
            image_url: row.image_url,
            board_id: row.board_id,
            board_name: row.board_name,
            user_id: row.user_id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

/// Feed service for business logic.
#[derive(Clone)]
pub struct FeedService {
    pin_repo: PinRepository,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(pin_repo: PinRepository) -> Self {
        Self { pin_repo }
    }

    /// The user's feed: recent pins on boards they follow, newest
    /// first. Boards reachable through several streams are not
    /// deduplicated.
    pub async fn feed(&self, user_id: &str, limit: Option<u64>) -> AppResult<Vec<FeedEntry>> {
        let limit = limit.unwrap_or(DEFAULT_FEED_LIMIT);
        let rows = self.pin_repo.feed_for_user(user_id, limit).await?;
        Ok(rows.into_iter().map(FeedEntry::from).collect())
    }

    /// Case-insensitive search over pin tags and source URLs.
    pub async fn search(&self, query: &str) -> AppResult<Vec<FeedEntry>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let rows = self.pin_repo.search(query.trim()).await?;
        Ok(rows.into_iter().map(FeedEntry::from).collect())
    }
}
