//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment, user};
use pinboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

/// Comment joined with its author's identity.
#[derive(Debug, Clone, FromQueryResult)]
pub struct CommentRow {
    pub comment_id: String,
    pub text: String,
    pub user_id: String,
    pub username: String,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
}

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a pin's comments with their authors, oldest first.
    pub async fn find_by_pin(&self, pin_id: &str) -> AppResult<Vec<CommentRow>> {
        Comment::find()
            .select_only()
            .column_as(comment::Column::Id, "comment_id")
            .column(comment::Column::Text)
            .column(comment::Column::UserId)
            .column(comment::Column::CreatedAt)
            .column(user::Column::Username)
            .join(JoinType::InnerJoin, comment::Relation::User.def())
            .filter(comment::Column::PinId.eq(pin_id))
            .order_by_asc(comment::Column::CreatedAt)
            .into_model::<CommentRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
