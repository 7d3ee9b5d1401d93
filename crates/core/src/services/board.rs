//! Board service.

use pinboard_common::{AppError, AppResult, IdGenerator};
use pinboard_db::{
    entities::board,
    repositories::{BoardRepository, BoardRow},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Board service for business logic.
#[derive(Clone)]
pub struct BoardService {
    board_repo: BoardRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new board.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

impl BoardService {
    /// Create a new board service.
    #[must_use]
    pub fn new(board_repo: BoardRepository) -> Self {
        Self {
            board_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a board owned by `user_id`.
    pub async fn create(&self, user_id: &str, input: CreateBoardInput) -> AppResult<board::Model> {
        input.validate()?;

        let model = board::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            name: Set(input.name),
            description: Set(input.description),
            ..Default::default()
        };

        self.board_repo.create(model).await
    }

    /// Get a board by ID.
    pub async fn get(&self, board_id: &str) -> AppResult<board::Model> {
        self.board_repo.get_by_id(board_id).await
    }

    /// Get a board joined with its owner.
    pub async fn get_with_owner(&self, board_id: &str) -> AppResult<BoardRow> {
        self.board_repo
            .find_with_owner(board_id)
            .await?
            .ok_or_else(|| AppError::BoardNotFound(board_id.to_string()))
    }

    /// List a user's boards, oldest first.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<board::Model>> {
        self.board_repo.find_by_user(user_id).await
    }

    /// Delete a board. Only the owner may do this; the store cascades
    /// to the board's pins.
    pub async fn delete(&self, acting_user_id: &str, board_id: &str) -> AppResult<()> {
        let board = self.board_repo.get_by_id(board_id).await?;

        if board.user_id != acting_user_id {
            return Err(AppError::Forbidden(
                "Only the board owner can delete it".to_string(),
            ));
        }

        self.board_repo.delete(board).await
    }
}
