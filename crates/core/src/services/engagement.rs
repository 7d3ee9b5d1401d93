//! Engagement service: likes and comments on pins.

use pinboard_common::{AppError, AppResult, IdGenerator};
use pinboard_db::{
    entities::{comment, like},
    repositories::{CommentRepository, CommentRow, LikeRepository, PinRepository},
};
use sea_orm::Set;

/// Engagement service for business logic.
#[derive(Clone)]
pub struct EngagementService {
    like_repo: LikeRepository,
    comment_repo: CommentRepository,
    pin_repo: PinRepository,
    id_gen: IdGenerator,
}

impl EngagementService {
    /// Create a new engagement service.
    #[must_use]
    pub fn new(
        like_repo: LikeRepository,
        comment_repo: CommentRepository,
        pin_repo: PinRepository,
    ) -> Self {
        Self {
            like_repo,
            comment_repo,
            pin_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like a pin. Liking a pin twice is a no-op.
    pub async fn like(&self, user_id: &str, pin_id: &str) -> AppResult<()> {
        self.pin_repo.get_by_id(pin_id).await?;

        let model = like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            pin_id: Set(pin_id.to_string()),
            ..Default::default()
        };

        self.like_repo.insert_ignoring_conflict(model).await?;
        Ok(())
    }

    /// Remove a like. Unliking a pin that was never liked is a no-op.
    pub async fn unlike(&self, user_id: &str, pin_id: &str) -> AppResult<()> {
        self.like_repo.delete_by_user_and_pin(user_id, pin_id).await?;
        Ok(())
    }

    /// Whether the user likes the pin.
    pub async fn has_liked(&self, user_id: &str, pin_id: &str) -> AppResult<bool> {
        self.like_repo.has_liked(user_id, pin_id).await
    }

    /// How many users like the pin.
    pub async fn like_count(&self, pin_id: &str) -> AppResult<u64> {
        self.like_repo.count_by_pin(pin_id).await
    }

    /// Comment on a pin. Blank text is rejected.
    pub async fn comment(
        &self,
        user_id: &str,
        pin_id: &str,
        text: &str,
    ) -> AppResult<comment::Model> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation(
                "Comment text cannot be empty".to_string(),
            ));
        }

        self.pin_repo.get_by_id(pin_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            pin_id: Set(pin_id.to_string()),
            text: Set(text.to_string()),
            ..Default::default()
        };

        self.comment_repo.create(model).await
    }

    /// The pin's comments with their authors, oldest first.
    pub async fn comments(&self, pin_id: &str) -> AppResult<Vec<CommentRow>> {
        self.comment_repo.find_by_pin(pin_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pinboard_db::entities::pin;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_pin(id: &str) -> pin::Model {
        pin::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            board_id: "b1".to_string(),
            title: None,
            tags: None,
            source_url: None,
            original_pin_id: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> EngagementService {
        EngagementService::new(
            LikeRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            PinRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_like_missing_pin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<pin::Model>::new()])
                .into_connection(),
        );

        let result = service(db).like("u1", "missing").await;

        assert!(matches!(result, Err(AppError::PinNotFound(_))));
    }

    #[tokio::test]
    async fn test_like_twice_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_pin("p1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let result = service(db).like("u1", "p1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unlike_never_liked_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let result = service(db).unlike("u1", "p1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_comment_blank_text_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db).comment("u1", "p1", "   ").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_comment_trims_text() {
        let created = comment::Model {
            id: "c1".to_string(),
            user_id: "u1".to_string(),
            pin_id: "p1".to_string(),
            text: "Love this".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_pin("p1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[created]])
                .into_connection(),
        );

        let result = service(db).comment("u1", "p1", "  Love this  ").await.unwrap();

        assert_eq!(result.text, "Love this");
    }
}
