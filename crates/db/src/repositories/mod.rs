//! Repositories for database operations.

mod board;
mod comment;
mod follow_stream;
mod friendship;
mod like;
mod pin;
mod user;

pub use board::{BoardRepository, BoardRow};
pub use comment::{CommentRepository, CommentRow};
pub use follow_stream::FollowStreamRepository;
pub use friendship::{FriendshipRepository, RelationRow};
pub use like::LikeRepository;
pub use pin::{PinRepository, PinRow};
pub use user::UserRepository;
