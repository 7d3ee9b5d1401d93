//! Business logic services.

#![allow(missing_docs)]

pub mod board;
pub mod engagement;
pub mod feed;
pub mod follow_stream;
pub mod friendship;
pub mod pin;
pub mod user;

pub use board::BoardService;
pub use engagement::EngagementService;
pub use feed::FeedService;
pub use follow_stream::FollowStreamService;
pub use friendship::{FriendshipService, RequestOutcome};
pub use pin::PinService;
pub use user::UserService;
