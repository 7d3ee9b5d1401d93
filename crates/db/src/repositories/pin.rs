//! Pin repository.
//!
//! Owns the enriched pin queries shared by board listings, the feed
//! and search: pin joined with its board, author and picture.

use std::sync::Arc;

use crate::entities::{Pin, board, follow_stream, follow_stream_board, picture, pin, user};
use pinboard_common::{AppError, AppResult};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    JoinType, ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    TransactionTrait,
};

/// Pin joined with board, author and picture.
///
/// `title` is the stored value; display-title derivation happens in
/// the core layer.
#[derive(Debug, Clone, FromQueryResult)]
pub struct PinRow {
    pub pin_id: String,
    pub title: Option<String>,
    pub tags: Option<String>,
    pub source_url: Option<String>,
    pub original_pin_id: Option<String>,
    pub user_id: String,
    pub username: String,
    pub board_id: String,
    pub board_name: String,
    pub image_url: Option<String>,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
}

/// Pin repository for database operations.
#[derive(Clone)]
pub struct PinRepository {
    db: Arc<DatabaseConnection>,
}

impl PinRepository {
    /// Create a new pin repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a pin by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<pin::Model>> {
        Pin::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a pin by ID, failing if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<pin::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PinNotFound(id.to_string()))
    }

    /// Insert a pin and its picture as a single atomic unit.
    ///
    /// A reader must never observe a pin without its picture, so both
    /// rows go through one transaction.
    pub async fn create_with_picture(
        &self,
        pin_model: pin::ActiveModel,
        picture_model: picture::ActiveModel,
    ) -> AppResult<pin::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = pin_model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        picture_model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Find a pin with its board, author and picture.
    pub async fn find_detail(&self, id: &str) -> AppResult<Option<PinRow>> {
        Self::enriched_select()
            .filter(pin::Column::Id.eq(id))
            .into_model::<PinRow>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a board's pins, most recently created first.
    pub async fn find_by_board(&self, board_id: &str) -> AppResult<Vec<PinRow>> {
        Self::enriched_select()
            .filter(pin::Column::BoardId.eq(board_id))
            .order_by_desc(pin::Column::CreatedAt)
            .into_model::<PinRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the newest pins across all boards (home page listing).
    pub async fn find_recent(&self, limit: u64) -> AppResult<Vec<PinRow>> {
        Self::enriched_select()
            .order_by_desc(pin::Column::CreatedAt)
            .limit(limit)
            .into_model::<PinRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the feed for a user: pins on boards reachable through any of
    /// the user's follow streams, most recent first.
    pub async fn feed_for_user(&self, user_id: &str, limit: u64) -> AppResult<Vec<PinRow>> {
        let followed_boards = Query::select()
            .column(follow_stream_board::Column::BoardId)
            .from(follow_stream_board::Entity)
            .inner_join(
                follow_stream::Entity,
                Expr::col((follow_stream::Entity, follow_stream::Column::Id)).equals((
                    follow_stream_board::Entity,
                    follow_stream_board::Column::StreamId,
                )),
            )
            .and_where(
                Expr::col((follow_stream::Entity, follow_stream::Column::UserId)).eq(user_id),
            )
            .to_owned();

        Self::enriched_select()
            .filter(pin::Column::BoardId.in_subquery(followed_boards))
            .order_by_desc(pin::Column::CreatedAt)
            .limit(limit)
            .into_model::<PinRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Case-insensitive substring search over tags and source URL.
    pub async fn search(&self, query: &str) -> AppResult<Vec<PinRow>> {
        let pattern = format!("%{query}%");

        Self::enriched_select()
            .filter(
                Condition::any()
                    .add(Expr::col((pin::Entity, pin::Column::Tags)).ilike(pattern.clone()))
                    .add(Expr::col((pin::Entity, pin::Column::SourceUrl)).ilike(pattern)),
            )
            .order_by_desc(pin::Column::CreatedAt)
            .into_model::<PinRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a pin; the store cascades to its picture, repins, likes
    /// and comments.
    pub async fn delete(&self, model: pin::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    fn enriched_select() -> Select<Pin> {
        Pin::find()
            .select_only()
            .column_as(pin::Column::Id, "pin_id")
            .column(pin::Column::Title)
            .column(pin::Column::Tags)
            .column(pin::Column::SourceUrl)
            .column(pin::Column::OriginalPinId)
            .column(pin::Column::UserId)
            .column(pin::Column::BoardId)
            .column(pin::Column::CreatedAt)
            .column_as(board::Column::Name, "board_name")
            .column(user::Column::Username)
            .column_as(picture::Column::UploadedUrl, "image_url")
            .join(JoinType::InnerJoin, pin::Relation::Board.def())
            .join(JoinType::InnerJoin, pin::Relation::User.def())
            .join(JoinType::LeftJoin, pin::Relation::Picture.def())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set, Value};

    fn create_test_pin(id: &str, user_id: &str, board_id: &str) -> pin::Model {
        pin::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            board_id: board_id.to_string(),
            title: None,
            tags: Some("beach,sand".to_string()),
            source_url: None,
            original_pin_id: None,
            created_at: Utc::now().into(),
        }
    }

    fn mock_pin_row(pin_id: &str, board_id: &str) -> std::collections::BTreeMap<&'static str, Value> {
        let mut row = std::collections::BTreeMap::new();
        row.insert("pin_id", Value::from(pin_id.to_string()));
        row.insert("title", Value::String(None));
        row.insert("tags", Value::from("beach,sand"));
        row.insert("source_url", Value::String(None));
        row.insert("original_pin_id", Value::String(None));
        row.insert("user_id", Value::from("u1"));
        row.insert("username", Value::from("alice"));
        row.insert("board_id", Value::from(board_id.to_string()));
        row.insert("board_name", Value::from("Recipes"));
        row.insert("image_url", Value::from("/static/uploads/a.jpg"));
        row.insert("created_at", Value::from(Utc::now().fixed_offset()));
        row
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let pin = create_test_pin("p1", "u1", "b1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pin.clone()]])
                .into_connection(),
        );

        let repo = PinRepository::new(db);
        let result = repo.find_by_id("p1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().tags.as_deref(), Some("beach,sand"));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<pin::Model>::new()])
                .into_connection(),
        );

        let repo = PinRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        match result {
            Err(AppError::PinNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected PinNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_create_with_picture_commits_both_inserts() {
        let pin = create_test_pin("p1", "u1", "b1");
        let picture = picture::Model {
            id: "pc1".to_string(),
            pin_id: "p1".to_string(),
            image_blob: None,
            uploaded_url: Some("/static/uploads/a.jpg".to_string()),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .append_query_results([[pin.clone()]])
                .append_query_results([[picture.clone()]])
                .into_connection(),
        );

        let repo = PinRepository::new(db);

        let pin_model = pin::ActiveModel {
            id: Set("p1".to_string()),
            user_id: Set("u1".to_string()),
            board_id: Set("b1".to_string()),
            tags: Set(Some("beach,sand".to_string())),
            ..Default::default()
        };
        let picture_model = picture::ActiveModel {
            id: Set("pc1".to_string()),
            pin_id: Set("p1".to_string()),
            uploaded_url: Set(Some("/static/uploads/a.jpg".to_string())),
            ..Default::default()
        };

        let created = repo
            .create_with_picture(pin_model, picture_model)
            .await
            .unwrap();

        assert_eq!(created.id, "p1");
    }

    #[tokio::test]
    async fn test_find_by_board() {
        let rows = vec![mock_pin_row("p2", "b1"), mock_pin_row("p1", "b1")];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );

        let repo = PinRepository::new(db);
        let result = repo.find_by_board("b1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].pin_id, "p2");
        assert_eq!(result[0].board_name, "Recipes");
    }

    #[tokio::test]
    async fn test_feed_for_user_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );

        let repo = PinRepository::new(db);
        let result = repo.feed_for_user("u1", 20).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_search_returns_enriched_rows() {
        let rows = vec![mock_pin_row("p1", "b1")];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );

        let repo = PinRepository::new(db);
        let result = repo.search("beach").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].image_url.as_deref(), Some("/static/uploads/a.jpg"));
    }
}
