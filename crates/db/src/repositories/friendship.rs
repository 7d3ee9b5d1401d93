//! Friendship repository.
//!
//! A friendship row is directional (requester -> requested) while the
//! relation itself is symmetric once accepted, so pair lookups and
//! deletes always check both orientations.

use std::sync::Arc;

use crate::entities::friendship::FriendshipStatus;
use crate::entities::{Friendship, friendship, user};
use pinboard_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

/// A friendship row joined with the counterpart user's identity.
#[derive(Debug, Clone, FromQueryResult)]
pub struct RelationRow {
    pub friendship_id: String,
    pub user_id: String,
    pub username: String,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
}

/// Friendship repository for database operations.
#[derive(Clone)]
pub struct FriendshipRepository {
    db: Arc<DatabaseConnection>,
}

impl FriendshipRepository {
    /// Create a new friendship repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a friendship by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<friendship::Model>> {
        Friendship::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the friendship between two users in either orientation,
    /// whatever its status.
    pub async fn find_by_pair(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> AppResult<Option<friendship::Model>> {
        Friendship::find()
            .filter(Self::pair_condition(user_a, user_b))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a friendship request unless a row for the pair already
    /// exists in either orientation. The unique index is over the
    /// normalized pair, so a reversed concurrent request conflicts
    /// too. Returns whether a new row was written.
    pub async fn insert_ignoring_conflict(
        &self,
        model: friendship::ActiveModel,
    ) -> AppResult<bool> {
        let rows = Friendship::insert(model)
            .on_conflict(
                OnConflict::new()
                    .exprs([
                        Expr::cust("LEAST(requester_id, requested_id)"),
                        Expr::cust("GREATEST(requester_id, requested_id)"),
                    ])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows > 0)
    }

    /// Flip a pending request to accepted, but only if `acting_user_id`
    /// is its recipient and it is still pending. Returns whether a row
    /// changed; a stale or foreign request leaves the store untouched.
    pub async fn accept_pending(
        &self,
        friendship_id: &str,
        acting_user_id: &str,
    ) -> AppResult<bool> {
        let result = Friendship::update_many()
            .col_expr(
                friendship::Column::Status,
                Expr::value(FriendshipStatus::Accepted),
            )
            .filter(friendship::Column::Id.eq(friendship_id))
            .filter(friendship::Column::RequestedId.eq(acting_user_id))
            .filter(friendship::Column::Status.eq(FriendshipStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Delete the friendship between two users in either orientation.
    /// Returns the number of rows removed (zero when none existed).
    pub async fn delete_pair(&self, user_a: &str, user_b: &str) -> AppResult<u64> {
        let result = Friendship::delete_many()
            .filter(Self::pair_condition(user_a, user_b))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Get the users `user_id` has an accepted friendship with, in
    /// either orientation, ordered by username.
    pub async fn accepted_counterparts(&self, user_id: &str) -> AppResult<Vec<RelationRow>> {
        let sent = Self::counterpart_select(friendship::Relation::Requested)
            .filter(friendship::Column::RequesterId.eq(user_id))
            .filter(friendship::Column::Status.eq(FriendshipStatus::Accepted))
            .into_model::<RelationRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let received = Self::counterpart_select(friendship::Relation::Requester)
            .filter(friendship::Column::RequestedId.eq(user_id))
            .filter(friendship::Column::Status.eq(FriendshipStatus::Accepted))
            .into_model::<RelationRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut rows: Vec<RelationRow> = sent.into_iter().chain(received).collect();
        rows.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(rows)
    }

    /// Get the pending requests `user_id` has sent, newest first.
    pub async fn pending_sent(&self, user_id: &str) -> AppResult<Vec<RelationRow>> {
        Self::counterpart_select(friendship::Relation::Requested)
            .filter(friendship::Column::RequesterId.eq(user_id))
            .filter(friendship::Column::Status.eq(FriendshipStatus::Pending))
            .order_by_desc(friendship::Column::CreatedAt)
            .into_model::<RelationRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the pending requests addressed to `user_id`, newest first.
    pub async fn pending_received(&self, user_id: &str) -> AppResult<Vec<RelationRow>> {
        Self::counterpart_select(friendship::Relation::Requester)
            .filter(friendship::Column::RequestedId.eq(user_id))
            .filter(friendship::Column::Status.eq(FriendshipStatus::Pending))
            .order_by_desc(friendship::Column::CreatedAt)
            .into_model::<RelationRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn pair_condition(user_a: &str, user_b: &str) -> Condition {
        Condition::any()
            .add(
                Condition::all()
                    .add(friendship::Column::RequesterId.eq(user_a))
                    .add(friendship::Column::RequestedId.eq(user_b)),
            )
            .add(
                Condition::all()
                    .add(friendship::Column::RequesterId.eq(user_b))
                    .add(friendship::Column::RequestedId.eq(user_a)),
            )
    }

    fn counterpart_select(side: friendship::Relation) -> sea_orm::Select<Friendship> {
        Friendship::find()
            .select_only()
            .column_as(friendship::Column::Id, "friendship_id")
            .column_as(user::Column::Id, "user_id")
            .column(user::Column::Username)
            .column(friendship::Column::CreatedAt)
            .join(JoinType::InnerJoin, side.def())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set, Value};

    fn create_test_friendship(
        id: &str,
        requester: &str,
        requested: &str,
        status: FriendshipStatus,
    ) -> friendship::Model {
        friendship::Model {
            id: id.to_string(),
            requester_id: requester.to_string(),
            requested_id: requested.to_string(),
            status,
            created_at: Utc::now().into(),
        }
    }

    fn mock_relation_row(friendship_id: &str, user_id: &str, username: &str) -> std::collections::BTreeMap<&'static str, Value> {
        maplit::btreemap! {
            "friendship_id" => Value::from(friendship_id.to_string()),
            "user_id" => Value::from(user_id.to_string()),
            "username" => Value::from(username.to_string()),
            "created_at" => Value::from(Utc::now().fixed_offset()),
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let friendship = create_test_friendship("f1", "u1", "u2", FriendshipStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[friendship]])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let result = repo.find_by_pair("u2", "u1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().status, FriendshipStatus::Pending);
    }

    fn pending_model(id: &str, requester: &str, requested: &str) -> friendship::ActiveModel {
        friendship::ActiveModel {
            id: Set(id.to_string()),
            requester_id: Set(requester.to_string()),
            requested_id: Set(requested.to_string()),
            status: Set(FriendshipStatus::Pending),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_ignoring_conflict_new_pair() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let inserted = repo
            .insert_ignoring_conflict(pending_model("f1", "u1", "u2"))
            .await
            .unwrap();

        assert!(inserted);
    }

    #[tokio::test]
    async fn test_insert_ignoring_conflict_reversed_pair_exists() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let inserted = repo
            .insert_ignoring_conflict(pending_model("f2", "u2", "u1"))
            .await
            .unwrap();

        assert!(!inserted);
    }

    #[tokio::test]
    async fn test_accept_pending_flips_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let accepted = repo.accept_pending("f1", "u2").await.unwrap();

        assert!(accepted);
    }

    #[tokio::test]
    async fn test_accept_pending_stale_request() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let accepted = repo.accept_pending("f1", "u3").await.unwrap();

        assert!(!accepted);
    }

    #[tokio::test]
    async fn test_delete_pair_idempotent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let removed = repo.delete_pair("u1", "u2").await.unwrap();

        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn test_accepted_counterparts_merges_both_directions() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![mock_relation_row("f1", "u2", "zoe")]])
                .append_query_results([vec![mock_relation_row("f2", "u3", "bob")]])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let rows = repo.accepted_counterparts("u1").await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].username, "bob");
        assert_eq!(rows[1].username, "zoe");
    }

    #[tokio::test]
    async fn test_pending_received() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![mock_relation_row("f1", "u2", "bob")]])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let rows = repo.pending_received("u1").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].friendship_id, "f1");
    }
}
