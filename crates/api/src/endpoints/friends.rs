//! Friendship endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use pinboard_common::{AppError, AppResult};
use pinboard_core::RequestOutcome;
use pinboard_db::repositories::RelationRow;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Friend request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    pub username: String,
}

/// Friend request outcome.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendship_id: Option<String>,
}

/// Send a friend request to a user by username.
async fn send_request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FriendRequestBody>,
) -> AppResult<ApiResponse<FriendRequestResponse>> {
    let target = state
        .user_service
        .find_by_username(&req.username)
        .await?
        .ok_or_else(|| AppError::UserNotFound(req.username.clone()))?;

    let outcome = state.friendship_service.request(&user.id, &target.id).await?;

    let response = match outcome {
        RequestOutcome::Requested { friendship_id } => FriendRequestResponse {
            status: "pending".to_string(),
            friendship_id: Some(friendship_id),
        },
        RequestOutcome::AlreadyRelated { status } => FriendRequestResponse {
            status: format!("{status:?}").to_lowercase(),
            friendship_id: None,
        },
    };

    Ok(ApiResponse::ok(response))
}

/// Accept a pending friend request addressed to the viewer.
async fn accept_request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(friendship_id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.friendship_service.accept(&user.id, &friendship_id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "accepted": true })))
}

/// Remove a friendship (or withdraw/decline a request) with a user.
async fn remove_friend(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.friendship_service.remove(&user.id, &user_id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "removed": true })))
}

/// A user in a friendship listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationResponse {
    pub friendship_id: String,
    pub user_id: String,
    pub username: String,
}

impl From<RelationRow> for RelationResponse {
    fn from(row: RelationRow) -> Self {
        Self {
            friendship_id: row.friendship_id,
            user_id: row.user_id,
            username: row.username,
        }
    }
}

/// List accepted friends, ordered by username.
async fn list_friends(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<RelationResponse>>> {
    let rows = state.friendship_service.friends(&user.id).await?;
    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// List pending requests the viewer has sent, newest first.
async fn list_sent(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<RelationResponse>>> {
    let rows = state.friendship_service.sent_requests(&user.id).await?;
    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// List pending requests addressed to the viewer, newest first.
async fn list_received(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<RelationResponse>>> {
    let rows = state.friendship_service.received_requests(&user.id).await?;
    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Create the friends router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_friends))
        .route("/requests", post(send_request))
        .route("/requests/sent", get(list_sent))
        .route("/requests/received", get(list_received))
        .route("/requests/{id}/accept", post(accept_request))
        .route("/{userId}", delete(remove_friend))
}
