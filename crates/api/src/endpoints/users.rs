//! User endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use pinboard_common::{AppError, AppResult};
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Public user profile with their boards.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: String,
    pub username: String,
    pub boards: Vec<BoardSummary>,
}

/// Board summary in a profile listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Get a user's profile by username, with their boards oldest first.
async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<UserProfileResponse>> {
    let user = state
        .user_service
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::UserNotFound(username))?;

    let boards = state.board_service.list_for_user(&user.id).await?;

    Ok(ApiResponse::ok(UserProfileResponse {
        id: user.id,
        username: user.username,
        boards: boards
            .into_iter()
            .map(|b| BoardSummary {
                id: b.id,
                name: b.name,
                description: b.description,
            })
            .collect(),
    }))
}

/// Create the users router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{username}", get(get_profile))
}
