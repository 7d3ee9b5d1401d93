//! Picture entity.
//!
//! Exactly one picture per pin. Either the binary payload or the
//! uploaded URL is populated; the upload path always stores a URL.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "picture")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Parent pin ID (1:1)
    #[sea_orm(unique)]
    pub pin_id: String,

    /// Raw image bytes (unused by the upload path)
    #[sea_orm(column_type = "VarBinary(StringLen::None)", nullable)]
    pub image_blob: Option<Vec<u8>>,

    /// Locally served path or externally reachable URL
    #[sea_orm(nullable)]
    pub uploaded_url: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pin::Entity",
        from = "Column::PinId",
        to = "super::pin::Column::Id"
    )]
    Pin,
}

impl Related<super::pin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
