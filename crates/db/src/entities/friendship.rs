//! Friendship entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Friendship states.
///
/// A row is created in `Pending` by the requester and moves to
/// `Accepted` only when the requested party acts. Removal is a hard
/// delete, so there is no terminal state here.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum FriendshipStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "friendship")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// User who sent the request
    #[sea_orm(indexed)]
    pub requester_id: String,

    /// User the request was sent to
    #[sea_orm(indexed)]
    pub requested_id: String,

    pub status: FriendshipStatus,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequesterId",
        to = "super::user::Column::Id"
    )]
    Requester,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequestedId",
        to = "super::user::Column::Id"
    )]
    Requested,
}

impl ActiveModelBehavior for ActiveModel {}
