//! Friendship service.

use pinboard_common::{AppError, AppResult, IdGenerator};
use pinboard_db::{
    entities::friendship::{self, FriendshipStatus},
    repositories::{FriendshipRepository, RelationRow, UserRepository},
};
use sea_orm::Set;

/// Outcome of a friendship request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A new pending request was created.
    Requested { friendship_id: String },
    /// A friendship or request already exists between the pair.
    AlreadyRelated { status: FriendshipStatus },
}

/// Friendship service for business logic.
#[derive(Clone)]
pub struct FriendshipService {
    friendship_repo: FriendshipRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FriendshipService {
    /// Create a new friendship service.
    #[must_use]
    pub fn new(friendship_repo: FriendshipRepository, user_repo: UserRepository) -> Self {
        Self {
            friendship_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Send a friendship request from `requester_id` to `requested_id`.
    ///
    /// An existing relation in either orientation, whatever its
    /// status, makes this a no-op reported through the outcome.
    pub async fn request(
        &self,
        requester_id: &str,
        requested_id: &str,
    ) -> AppResult<RequestOutcome> {
        if requester_id == requested_id {
            return Err(AppError::BadRequest(
                "Cannot send a friend request to yourself".to_string(),
            ));
        }

        self.user_repo.get_by_id(requested_id).await?;

        if let Some(existing) = self
            .friendship_repo
            .find_by_pair(requester_id, requested_id)
            .await?
        {
            return Ok(RequestOutcome::AlreadyRelated {
                status: existing.status,
            });
        }

        let friendship_id = self.id_gen.generate();
        let model = friendship::ActiveModel {
            id: Set(friendship_id.clone()),
            requester_id: Set(requester_id.to_string()),
            requested_id: Set(requested_id.to_string()),
            status: Set(FriendshipStatus::Pending),
            ..Default::default()
        };

        // The insert is guarded by a unique index over the normalized
        // pair, so a concurrent request in either orientation makes it
        // a no-op. Re-read to report the row that won.
        if self.friendship_repo.insert_ignoring_conflict(model).await? {
            return Ok(RequestOutcome::Requested { friendship_id });
        }

        let status = self
            .friendship_repo
            .find_by_pair(requester_id, requested_id)
            .await?
            .map_or(FriendshipStatus::Pending, |existing| existing.status);

        Ok(RequestOutcome::AlreadyRelated { status })
    }

    /// Accept a pending request addressed to `acting_user_id`.
    ///
    /// The flip happens in one guarded update, so a request that was
    /// withdrawn, already accepted, or addressed to someone else fails
    /// without touching the store.
    pub async fn accept(&self, acting_user_id: &str, friendship_id: &str) -> AppResult<()> {
        let accepted = self
            .friendship_repo
            .accept_pending(friendship_id, acting_user_id)
            .await?;

        if accepted {
            Ok(())
        } else {
            Err(AppError::NotFound(
                "No pending request to accept".to_string(),
            ))
        }
    }

    /// Remove the relation between the acting user and another user,
    /// whichever direction it was created in. Removing a relation that
    /// does not exist is a no-op.
    pub async fn remove(&self, acting_user_id: &str, other_user_id: &str) -> AppResult<()> {
        self.friendship_repo
            .delete_pair(acting_user_id, other_user_id)
            .await?;
        Ok(())
    }

    /// The user's accepted friends, ordered by username.
    pub async fn friends(&self, user_id: &str) -> AppResult<Vec<RelationRow>> {
        self.friendship_repo.accepted_counterparts(user_id).await
    }

    /// Pending requests the user has sent, newest first.
    pub async fn sent_requests(&self, user_id: &str) -> AppResult<Vec<RelationRow>> {
        self.friendship_repo.pending_sent(user_id).await
    }

    /// Pending requests addressed to the user, newest first.
    pub async fn received_requests(&self, user_id: &str) -> AppResult<Vec<RelationRow>> {
        self.friendship_repo.pending_received(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pinboard_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user-{id}"),
            email: format!("{id}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            token: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> FriendshipService {
        FriendshipService::new(
            FriendshipRepository::new(db.clone()),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_request_to_self_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db).request("u1", "u1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_request_existing_relation_is_noop() {
        let existing = friendship::Model {
            id: "f1".to_string(),
            requester_id: "u2".to_string(),
            requested_id: "u1".to_string(),
            status: FriendshipStatus::Accepted,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("u2")]])
                .append_query_results([[existing]])
                .into_connection(),
        );

        let outcome = service(db).request("u1", "u2").await.unwrap();

        assert_eq!(
            outcome,
            RequestOutcome::AlreadyRelated {
                status: FriendshipStatus::Accepted
            }
        );
    }

    #[tokio::test]
    async fn test_request_creates_pending_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("u2")]])
                .append_query_results([Vec::<friendship::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let outcome = service(db).request("u1", "u2").await.unwrap();

        assert!(matches!(outcome, RequestOutcome::Requested { .. }));
    }

    #[tokio::test]
    async fn test_request_lost_race_reports_existing_relation() {
        // The pair check sees nothing, but a reversed request lands
        // before the insert; the guarded insert writes no row and the
        // re-read reports the winner.
        let winner = friendship::Model {
            id: "f9".to_string(),
            requester_id: "u2".to_string(),
            requested_id: "u1".to_string(),
            status: FriendshipStatus::Pending,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("u2")]])
                .append_query_results([Vec::<friendship::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([[winner]])
                .into_connection(),
        );

        let outcome = service(db).request("u1", "u2").await.unwrap();

        assert_eq!(
            outcome,
            RequestOutcome::AlreadyRelated {
                status: FriendshipStatus::Pending
            }
        );
    }

    #[tokio::test]
    async fn test_accept_stale_request_fails() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let result = service(db).accept("u2", "f1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let result = service(db).remove("u1", "u2").await;

        assert!(result.is_ok());
    }
}
