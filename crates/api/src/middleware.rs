//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use pinboard_core::{
    BoardService, EngagementService, FeedService, FollowStreamService, FriendshipService,
    PinService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub board_service: BoardService,
    pub pin_service: PinService,
    pub friendship_service: FriendshipService,
    pub follow_stream_service: FollowStreamService,
    pub feed_service: FeedService,
    pub engagement_service: EngagementService,
}

/// Authentication middleware.
///
/// Resolves a Bearer token to its user and stashes the model in the
/// request extensions for the extractors.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
