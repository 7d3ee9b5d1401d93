//! Pin entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pin")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Containing board ID
    #[sea_orm(indexed)]
    pub board_id: String,

    /// Explicit title; NULL means the display title is derived from
    /// tags or the source URL at read time.
    #[sea_orm(nullable)]
    pub title: Option<String>,

    /// Comma-delimited tag string
    #[sea_orm(column_type = "Text", nullable)]
    pub tags: Option<String>,

    /// Where the pinned content came from
    #[sea_orm(nullable)]
    pub source_url: Option<String>,

    /// Lineage pointer: the pin this one was repinned from.
    /// NULL for original content.
    #[sea_orm(nullable, indexed)]
    pub original_pin_id: Option<String>,

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

    #[sea_orm(
        belongs_to = "super::board::Entity",
        from = "Column::BoardId",
        to = "super::board::Column::Id"
    )]
    Board,

    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::OriginalPinId",
        to = "Column::Id"
    )]
    OriginalPin,

    #[sea_orm(has_one = "super::picture::Entity")]
    Picture,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::board::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Board.def()
    }
}

impl Related<super::picture::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Picture.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
