//! Board repository.

use std::sync::Arc;

use crate::entities::{Board, board, user};
use pinboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

/// Board joined with its owner's identity.
#[derive(Debug, Clone, FromQueryResult)]
pub struct BoardRow {
    pub board_id: String,
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub username: String,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
}

/// Board repository for database operations.
#[derive(Clone)]
pub struct BoardRepository {
    db: Arc<DatabaseConnection>,
}

impl BoardRepository {
    /// Create a new board repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a board by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<board::Model>> {
        Board::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a board by ID, failing if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<board::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BoardNotFound(id.to_string()))
    }

    /// Find a board joined with its owner.
    pub async fn find_with_owner(&self, id: &str) -> AppResult<Option<BoardRow>> {
        Board::find()
            .select_only()
            .column_as(board::Column::Id, "board_id")
            .column(board::Column::Name)
            .column(board::Column::Description)
            .column(board::Column::UserId)
            .column(board::Column::CreatedAt)
            .column(user::Column::Username)
            .join(JoinType::InnerJoin, board::Relation::User.def())
            .filter(board::Column::Id.eq(id))
            .into_model::<BoardRow>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's boards, oldest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<board::Model>> {
        Board::find()
            .filter(board::Column::UserId.eq(user_id))
            .order_by_asc(board::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new board.
    pub async fn create(&self, model: board::ActiveModel) -> AppResult<board::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a board; the store cascades to its pins.
    pub async fn delete(&self, model: board::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
