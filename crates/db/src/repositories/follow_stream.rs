//! Follow stream repository.
//!
//! Streams group the boards a user follows. Creation of the per-user
//! default stream and of stream/board memberships uses guarded inserts
//! so concurrent callers converge on one row instead of erroring.

use std::sync::Arc;

use crate::entities::{FollowStream, FollowStreamBoard, follow_stream, follow_stream_board};
use pinboard_common::{AppError, AppResult};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Follow stream repository for database operations.
#[derive(Clone)]
pub struct FollowStreamRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowStreamRepository {
    /// Create a new follow stream repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's stream by name.
    pub async fn find_by_user_and_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> AppResult<Option<follow_stream::Model>> {
        FollowStream::find()
            .filter(follow_stream::Column::UserId.eq(user_id))
            .filter(follow_stream::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a stream unless the user already has one with that name.
    /// Returns whether a new row was written.
    pub async fn insert_ignoring_conflict(
        &self,
        model: follow_stream::ActiveModel,
    ) -> AppResult<bool> {
        let rows = FollowStream::insert(model)
            .on_conflict(
                OnConflict::columns([follow_stream::Column::UserId, follow_stream::Column::Name])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows > 0)
    }

    /// Add a board to a stream. A duplicate membership is left alone;
    /// the return value says whether a new row was written.
    pub async fn add_board(&self, model: follow_stream_board::ActiveModel) -> AppResult<bool> {
        let rows = FollowStreamBoard::insert(model)
            .on_conflict(
                OnConflict::columns([
                    follow_stream_board::Column::StreamId,
                    follow_stream_board::Column::BoardId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows > 0)
    }

    /// Remove a board from a stream. Removing an absent membership is
    /// a no-op.
    pub async fn remove_board(&self, stream_id: &str, board_id: &str) -> AppResult<u64> {
        let result = FollowStreamBoard::delete_many()
            .filter(follow_stream_board::Column::StreamId.eq(stream_id))
            .filter(follow_stream_board::Column::BoardId.eq(board_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Whether a stream contains a board.
    pub async fn contains_board(&self, stream_id: &str, board_id: &str) -> AppResult<bool> {
        let count = FollowStreamBoard::find()
            .filter(follow_stream_board::Column::StreamId.eq(stream_id))
            .filter(follow_stream_board::Column::BoardId.eq(board_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }
}
