//! Core business logic for pinboard-rs.

pub mod services;

pub use services::*;
