//! Feed and search endpoints.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use pinboard_common::AppResult;
use pinboard_core::feed::FeedEntry;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Query parameters for the feed.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<u64>,
}

/// Query parameters for search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// The viewer's feed: recent pins on boards they follow.
async fn feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<ApiResponse<Vec<FeedEntry>>> {
    let entries = state.feed_service.feed(&user.id, query.limit).await?;
    Ok(ApiResponse::ok(entries))
}

/// Search pins by tags or source URL.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<ApiResponse<Vec<FeedEntry>>> {
    let entries = state.feed_service.search(&query.q).await?;
    Ok(ApiResponse::ok(entries))
}

/// Create the feed router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feed", get(feed))
        .route("/search", get(search))
}
