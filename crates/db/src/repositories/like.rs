//! Like repository.
//!
//! Likes are idempotent at the storage layer: inserting one that
//! already exists and removing one that never did are both no-ops.

use std::sync::Arc;

use crate::entities::{Like, like};
use pinboard_common::{AppError, AppResult};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a like unless the user already likes the pin. Returns
    /// whether a new row was written.
    pub async fn insert_ignoring_conflict(&self, model: like::ActiveModel) -> AppResult<bool> {
        let rows = Like::insert(model)
            .on_conflict(
                OnConflict::columns([like::Column::UserId, like::Column::PinId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows > 0)
    }

    /// Remove a user's like from a pin.
    pub async fn delete_by_user_and_pin(&self, user_id: &str, pin_id: &str) -> AppResult<u64> {
        let result = Like::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PinId.eq(pin_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Whether a user likes a pin.
    pub async fn has_liked(&self, user_id: &str, pin_id: &str) -> AppResult<bool> {
        let count = Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PinId.eq(pin_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// How many users like a pin.
    pub async fn count_by_pin(&self, pin_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::PinId.eq(pin_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
