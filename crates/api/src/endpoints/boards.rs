//! Board endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use pinboard_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Create board request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Board response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
}

/// Create a board owned by the authenticated user.
async fn create_board(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateBoardRequest>,
) -> AppResult<ApiResponse<BoardResponse>> {
    let input = pinboard_core::board::CreateBoardInput {
        name: req.name,
        description: req.description,
    };

    let board = state.board_service.create(&user.id, input).await?;

    Ok(ApiResponse::ok(BoardResponse {
        id: board.id,
        name: board.name,
        description: board.description,
        user_id: board.user_id,
    }))
}

/// Board detail with owner, pins and the viewer's follow state.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDetailResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub owner_username: String,
    pub following: bool,
    pub pins: Vec<PinSummary>,
}

/// Pin summary in a board listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub original_pin_id: Option<String>,
}

/// Get a board with its pins, most recent pin first.
async fn get_board(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> AppResult<ApiResponse<BoardDetailResponse>> {
    let board = state.board_service.get_with_owner(&board_id).await?;
    let pins = state.pin_service.list_for_board(&board_id).await?;

    let following = match &viewer {
        Some(user) => {
            state
                .follow_stream_service
                .is_following(&user.id, &board_id)
                .await?
        }
        None => false,
    };

    Ok(ApiResponse::ok(BoardDetailResponse {
        id: board.board_id,
        name: board.name,
        description: board.description,
        owner_id: board.user_id,
        owner_username: board.username,
        following,
        pins: pins
            .into_iter()
            .map(|p| PinSummary {
                title: pinboard_core::pin::resolve_title(
                    p.title.as_deref(),
                    p.tags.as_deref(),
                    p.source_url.as_deref(),
                ),
                id: p.pin_id,
                description: p.tags,
                image_url: p.image_url,
                original_pin_id: p.original_pin_id,
            })
            .collect(),
    }))
}

/// Delete a board owned by the authenticated user.
async fn delete_board(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.board_service.delete(&user.id, &board_id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "deleted": true })))
}

/// Create pin request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePinRequest {
    pub title: Option<String>,
    pub tags: Option<String>,
    pub source_url: Option<String>,
    pub image_url: String,
}

/// Pin response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinResponse {
    pub id: String,
    pub board_id: String,
    pub title: String,
}

/// Create an original pin on a board the authenticated user owns.
async fn create_pin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Json(req): Json<CreatePinRequest>,
) -> AppResult<ApiResponse<PinResponse>> {
    let board = state.board_service.get(&board_id).await?;
    if board.user_id != user.id {
        return Err(pinboard_common::AppError::Forbidden(
            "Only the board owner can pin to it".to_string(),
        ));
    }

    let input = pinboard_core::pin::CreatePinInput {
        title: req.title,
        tags: req.tags,
        source_url: req.source_url,
        image_url: req.image_url,
    };

    let pin = state.pin_service.create(&user.id, &board_id, input).await?;

    Ok(ApiResponse::ok(PinResponse {
        title: pinboard_core::pin::resolve_title(
            pin.title.as_deref(),
            pin.tags.as_deref(),
            pin.source_url.as_deref(),
        ),
        id: pin.id,
        board_id: pin.board_id,
    }))
}

/// Follow a board (adds it to the viewer's default stream).
async fn follow_board(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .follow_stream_service
        .follow_board(&user.id, &board_id)
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({ "following": true })))
}

/// Whether the viewer follows a board.
async fn following_board(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let following = state
        .follow_stream_service
        .is_following(&user.id, &board_id)
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({ "following": following })))
}

/// Unfollow a board.
async fn unfollow_board(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .follow_stream_service
        .unfollow_board(&user.id, &board_id)
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({ "following": false })))
}

/// Create the boards router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_board))
        .route("/{id}", get(get_board).delete(delete_board))
        .route("/{id}/pins", post(create_pin))
        .route("/{id}/follow", post(follow_board))
        .route("/{id}/unfollow", post(unfollow_board))
        .route("/{id}/following", get(following_board))
}
