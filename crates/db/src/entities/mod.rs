//! Database entities.

pub mod board;
pub mod comment;
pub mod follow_stream;
pub mod follow_stream_board;
pub mod friendship;
pub mod like;
pub mod picture;
pub mod pin;
pub mod user;

pub use board::Entity as Board;
pub use comment::Entity as Comment;
pub use follow_stream::Entity as FollowStream;
pub use follow_stream_board::Entity as FollowStreamBoard;
pub use friendship::Entity as Friendship;
pub use like::Entity as Like;
pub use picture::Entity as Picture;
pub use pin::Entity as Pin;
pub use user::Entity as User;
