//! API endpoints.

mod auth;
mod boards;
mod feed;
mod friends;
mod pins;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/boards", boards::router())
        .nest("/pins", pins::router())
        .nest("/friends", friends::router())
        .merge(feed::router())
}
