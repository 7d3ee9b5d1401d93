//! Integration tests for the HTTP API.
//!
//! Each test drives the full router against a mock database whose
//! canned results match the exact query sequence of the endpoint
//! under test.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    middleware,
};
use chrono::Utc;
use pinboard_api::middleware::{AppState, auth_middleware};
use pinboard_core::{
    BoardService, EngagementService, FeedService, FollowStreamService, FriendshipService,
    PinService, UserService,
};
use pinboard_db::entities::user;
use pinboard_db::repositories::{
    BoardRepository, CommentRepository, FollowStreamRepository, FriendshipRepository,
    LikeRepository, PinRepository, UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
use tower::ServiceExt;

fn build_state(db: Arc<DatabaseConnection>) -> AppState {
    let user_repo = UserRepository::new(Arc::clone(&db));
    let board_repo = BoardRepository::new(Arc::clone(&db));
    let pin_repo = PinRepository::new(Arc::clone(&db));
    let friendship_repo = FriendshipRepository::new(Arc::clone(&db));
    let follow_stream_repo = FollowStreamRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));

    AppState {
        user_service: UserService::new(user_repo.clone()),
        board_service: BoardService::new(board_repo.clone()),
        pin_service: PinService::new(pin_repo.clone()),
        friendship_service: FriendshipService::new(friendship_repo, user_repo),
        follow_stream_service: FollowStreamService::new(follow_stream_repo, board_repo),
        feed_service: FeedService::new(pin_repo.clone()),
        engagement_service: EngagementService::new(like_repo, comment_repo, pin_repo),
    }
}

/// Router shaped like the server binary builds it: endpoints nested
/// under `/api` with the token-resolving middleware layered on top.
fn test_app(db: Arc<DatabaseConnection>) -> Router {
    let state = build_state(db);
    Router::new()
        .nest("/api", pinboard_api::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn test_user(id: &str, username: &str, token: Option<&str>) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$test".to_string(),
        token: token.map(ToString::to_string),
        created_at: Utc::now().into(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_signup_returns_token() {
    // Username lookup, email lookup, then the insert's returned row.
    let created = test_user("u1", "alice", Some("tok-alice"));
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([[created]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection(),
    );

    let app = test_app(db);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/signup")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"alice","email":"alice@example.com","password":"secret-pw"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "alice");
    assert_eq!(json["data"]["token"], "tok-alice");
}

#[tokio::test]
async fn test_signup_duplicate_username_conflicts() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u1", "alice", None)]])
            .into_connection(),
    );

    let app = test_app(db);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/signup")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"alice","email":"other@example.com","password":"secret-pw"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_feed_without_token_is_unauthorized() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let app = test_app(db);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/feed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_board_detail_lists_pins_camel_case() {
    let board_row: BTreeMap<&str, Value> = maplit::btreemap! {
        "board_id" => Value::from("b1"),
        "name" => Value::from("Recipes"),
        "description" => Value::String(None),
        "user_id" => Value::from("u1"),
        "username" => Value::from("alice"),
        "created_at" => Value::from(Utc::now().fixed_offset()),
    };
    let pin_row: BTreeMap<&str, Value> = maplit::btreemap! {
        "pin_id" => Value::from("p1"),
        "title" => Value::String(None),
        "tags" => Value::from("beach,sand"),
        "source_url" => Value::String(None),
        "original_pin_id" => Value::String(None),
        "user_id" => Value::from("u1"),
        "username" => Value::from("alice"),
        "board_id" => Value::from("b1"),
        "board_name" => Value::from("Recipes"),
        "image_url" => Value::from("/static/uploads/a.jpg"),
        "created_at" => Value::from(Utc::now().fixed_offset()),
    };

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![board_row]])
            .append_query_results([vec![pin_row]])
            .into_connection(),
    );

    let app = test_app(db);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/boards/b1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["ownerUsername"], "alice");
    assert!(!json["data"]["following"].as_bool().unwrap());
    assert_eq!(json["data"]["pins"][0]["title"], "Beach");
    assert_eq!(json["data"]["pins"][0]["imageUrl"], "/static/uploads/a.jpg");
}

#[tokio::test]
async fn test_accept_friend_request_with_token() {
    // Token resolution first, then the guarded status flip.
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u2", "bob", Some("tok-bob"))]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection(),
    );

    let app = test_app(db);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/friends/requests/f1/accept")
                .method("POST")
                .header("Authorization", "Bearer tok-bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["accepted"].as_bool().unwrap());
}

#[tokio::test]
async fn test_accept_stale_request_is_not_found() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u2", "bob", Some("tok-bob"))]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection(),
    );

    let app = test_app(db);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/friends/requests/f1/accept")
                .method("POST")
                .header("Authorization", "Bearer tok-bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let app = test_app(db);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
