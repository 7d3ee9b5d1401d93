//! HTTP API layer for pinboard-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: boards, pins, friendships, feed and search
//! - **Extractors**: authentication
//! - **Middleware**: token resolution, application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
