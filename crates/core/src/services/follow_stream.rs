//! Follow stream service.
//!
//! Every user gets one implicit default stream, created lazily the
//! first time it is needed. The unique (user, name) index in the store
//! makes the lazy creation safe under concurrency: losers of the
//! insert race re-read the winner's row.

use pinboard_common::{AppError, AppResult, IdGenerator};
use pinboard_db::{
    entities::follow_stream::{self, DEFAULT_STREAM_NAME},
    entities::follow_stream_board,
    repositories::{BoardRepository, FollowStreamRepository},
};
use sea_orm::Set;

/// Follow stream service for business logic.
#[derive(Clone)]
pub struct FollowStreamService {
    stream_repo: FollowStreamRepository,
    board_repo: BoardRepository,
    id_gen: IdGenerator,
}

impl FollowStreamService {
    /// Create a new follow stream service.
    #[must_use]
    pub fn new(stream_repo: FollowStreamRepository, board_repo: BoardRepository) -> Self {
        Self {
            stream_repo,
            board_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get the user's default stream ID, creating the stream if it
    /// does not exist yet.
    pub async fn default_stream_id(&self, user_id: &str) -> AppResult<String> {
        if let Some(stream) = self
            .stream_repo
            .find_by_user_and_name(user_id, DEFAULT_STREAM_NAME)
            .await?
        {
            return Ok(stream.id);
        }

        let model = follow_stream::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            name: Set(DEFAULT_STREAM_NAME.to_string()),
            ..Default::default()
        };

        self.stream_repo.insert_ignoring_conflict(model).await?;

        // Re-read regardless of who won the insert race.
        self.stream_repo
            .find_by_user_and_name(user_id, DEFAULT_STREAM_NAME)
            .await?
            .map(|stream| stream.id)
            .ok_or_else(|| AppError::Internal("Default stream vanished after insert".to_string()))
    }

    /// Follow a board: add it to the user's default stream. Following
    /// an already-followed board is a no-op.
    pub async fn follow_board(&self, user_id: &str, board_id: &str) -> AppResult<()> {
        self.board_repo.get_by_id(board_id).await?;

        let stream_id = self.default_stream_id(user_id).await?;

        let model = follow_stream_board::ActiveModel {
            id: Set(self.id_gen.generate()),
            stream_id: Set(stream_id),
            board_id: Set(board_id.to_string()),
            ..Default::default()
        };

        self.stream_repo.add_board(model).await?;
        Ok(())
    }

    /// Unfollow a board: remove it from the user's default stream.
    /// Unfollowing a board that was never followed is a no-op.
    pub async fn unfollow_board(&self, user_id: &str, board_id: &str) -> AppResult<()> {
        let stream_id = self.default_stream_id(user_id).await?;
        self.stream_repo.remove_board(&stream_id, board_id).await?;
        Ok(())
    }

    /// Whether the user's default stream contains the board.
    pub async fn is_following(&self, user_id: &str, board_id: &str) -> AppResult<bool> {
        let Some(stream) = self
            .stream_repo
            .find_by_user_and_name(user_id, DEFAULT_STREAM_NAME)
            .await?
        else {
            return Ok(false);
        };

        self.stream_repo.contains_board(&stream.id, board_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pinboard_db::entities::board;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_stream(id: &str, user_id: &str) -> follow_stream::Model {
        follow_stream::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: DEFAULT_STREAM_NAME.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn test_board(id: &str) -> board::Model {
        board::Model {
            id: id.to_string(),
            user_id: "owner".to_string(),
            name: "Recipes".to_string(),
            description: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> FollowStreamService {
        FollowStreamService::new(
            FollowStreamRepository::new(db.clone()),
            BoardRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_default_stream_id_existing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_stream("s1", "u1")]])
                .into_connection(),
        );

        let id = service(db).default_stream_id("u1").await.unwrap();

        assert_eq!(id, "s1");
    }

    #[tokio::test]
    async fn test_default_stream_id_lost_race_rereads_winner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow_stream::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([[test_stream("s-winner", "u1")]])
                .into_connection(),
        );

        let id = service(db).default_stream_id("u1").await.unwrap();

        assert_eq!(id, "s-winner");
    }

    #[tokio::test]
    async fn test_follow_board_missing_board() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<board::Model>::new()])
                .into_connection(),
        );

        let result = service(db).follow_board("u1", "missing").await;

        assert!(matches!(result, Err(AppError::BoardNotFound(_))));
    }

    #[tokio::test]
    async fn test_follow_board_duplicate_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_board("b1")]])
                .append_query_results([[test_stream("s1", "u1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let result = service(db).follow_board("u1", "b1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_is_following_without_stream() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow_stream::Model>::new()])
                .into_connection(),
        );

        let following = service(db).is_following("u1", "b1").await.unwrap();

        assert!(!following);
    }
}
