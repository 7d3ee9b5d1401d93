//! Follow stream entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reserved name of the lazily-created default stream.
///
/// Every follow/unfollow/feed operation goes through the stream with
/// this name; other named streams are possible but not populated by
/// the current feature set.
pub const DEFAULT_STREAM_NAME: &str = "__default__";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "follow_stream")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Stream name; unique per user
    pub name: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(has_many = "super::follow_stream_board::Entity")]
    FollowStreamBoard,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::follow_stream_board::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FollowStreamBoard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
