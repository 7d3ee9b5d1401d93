//! Pin endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use pinboard_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Query parameters for the recent pins listing.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u64>,
}

/// Pin detail response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinDetailResponse {
    pub id: String,
    pub title: String,
    pub tags: Option<String>,
    pub source_url: Option<String>,
    pub original_pin_id: Option<String>,
    pub image_url: Option<String>,
    pub board_id: String,
    pub board_name: String,
    pub user_id: String,
    pub username: String,
    pub like_count: u64,
    pub liked: bool,
}

/// Get a pin with its board, author, picture and like state.
async fn get_pin(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(pin_id): Path<String>,
) -> AppResult<ApiResponse<PinDetailResponse>> {
    let pin = state.pin_service.get_detail(&pin_id).await?;
    let like_count = state.engagement_service.like_count(&pin_id).await?;

    let liked = match &viewer {
        Some(user) => state.engagement_service.has_liked(&user.id, &pin_id).await?,
        None => false,
    };

    Ok(ApiResponse::ok(PinDetailResponse {
        title: pinboard_core::pin::resolve_title(
            pin.title.as_deref(),
            pin.tags.as_deref(),
            pin.source_url.as_deref(),
        ),
        id: pin.pin_id,
        tags: pin.tags,
        source_url: pin.source_url,
        original_pin_id: pin.original_pin_id,
        image_url: pin.image_url,
        board_id: pin.board_id,
        board_name: pin.board_name,
        user_id: pin.user_id,
        username: pin.username,
        like_count,
        liked,
    }))
}

/// List the newest pins across all boards.
async fn list_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<ApiResponse<Vec<pinboard_core::feed::FeedEntry>>> {
    let rows = state
        .pin_service
        .list_recent(query.limit.unwrap_or(20))
        .await?;

    Ok(ApiResponse::ok(
        rows.into_iter().map(Into::into).collect(),
    ))
}

/// Delete a pin owned by the authenticated user.
async fn delete_pin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(pin_id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.pin_service.delete(&user.id, &pin_id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "deleted": true })))
}

/// Repin request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepinRequest {
    pub board_id: String,
}

/// Repin response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepinResponse {
    pub id: String,
    pub board_id: String,
    pub original_pin_id: String,
    pub title: String,
}

/// Repin an existing pin onto one of the viewer's boards.
async fn repin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(pin_id): Path<String>,
    Json(req): Json<RepinRequest>,
) -> AppResult<ApiResponse<RepinResponse>> {
    let board = state.board_service.get(&req.board_id).await?;
    if board.user_id != user.id {
        return Err(pinboard_common::AppError::Forbidden(
            "Can only repin to your own board".to_string(),
        ));
    }

    let pin = state.pin_service.repin(&user.id, &pin_id, &board.id).await?;

    Ok(ApiResponse::ok(RepinResponse {
        title: pinboard_core::pin::resolve_title(
            pin.title.as_deref(),
            pin.tags.as_deref(),
            pin.source_url.as_deref(),
        ),
        id: pin.id,
        board_id: pin.board_id,
        original_pin_id: pin.original_pin_id.unwrap_or_default(),
    }))
}

/// Like a pin.
async fn like_pin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(pin_id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.engagement_service.like(&user.id, &pin_id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "liked": true })))
}

/// Remove a like from a pin.
async fn unlike_pin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(pin_id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.engagement_service.unlike(&user.id, &pin_id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "liked": false })))
}

/// Comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub text: String,
}

/// Comment in a listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub text: String,
    pub user_id: String,
    pub username: Option<String>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

/// Comment on a pin.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(pin_id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .engagement_service
        .comment(&user.id, &pin_id, &req.text)
        .await?;

    Ok(ApiResponse::ok(CommentResponse {
        id: comment.id,
        text: comment.text,
        user_id: comment.user_id,
        username: Some(user.username),
        created_at: comment.created_at,
    }))
}

/// List a pin's comments, oldest first.
async fn list_comments(
    State(state): State<AppState>,
    Path(pin_id): Path<String>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state.engagement_service.comments(&pin_id).await?;

    Ok(ApiResponse::ok(
        comments
            .into_iter()
            .map(|c| CommentResponse {
                id: c.comment_id,
                text: c.text,
                user_id: c.user_id,
                username: Some(c.username),
                created_at: c.created_at,
            })
            .collect(),
    ))
}

/// Create the pins router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recent))
        .route("/{id}", get(get_pin).delete(delete_pin))
        .route("/{id}/repin", post(repin))
        .route("/{id}/like", post(like_pin).delete(unlike_pin))
        .route("/{id}/comments", get(list_comments).post(create_comment))
}
