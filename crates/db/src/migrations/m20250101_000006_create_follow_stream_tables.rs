//! Create follow stream tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FollowStream::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FollowStream::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FollowStream::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FollowStream::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(FollowStream::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_stream_user")
                            .from(FollowStream::Table, FollowStream::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, name) - the guard that makes lazy
        // default-stream creation race-safe.
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_stream_user_name")
                    .table(FollowStream::Table)
                    .col(FollowStream::UserId)
                    .col(FollowStream::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FollowStreamBoard::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FollowStreamBoard::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FollowStreamBoard::StreamId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FollowStreamBoard::BoardId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FollowStreamBoard::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_stream_board_stream")
                            .from(FollowStreamBoard::Table, FollowStreamBoard::StreamId)
                            .to(FollowStream::Table, FollowStream::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_stream_board_board")
                            .from(FollowStreamBoard::Table, FollowStreamBoard::BoardId)
                            .to(Board::Table, Board::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (stream_id, board_id) - one follow per pair
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_stream_board_pair")
                    .table(FollowStreamBoard::Table)
                    .col(FollowStreamBoard::StreamId)
                    .col(FollowStreamBoard::BoardId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: board_id (for follower lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_stream_board_board_id")
                    .table(FollowStreamBoard::Table)
                    .col(FollowStreamBoard::BoardId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowStreamBoard::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FollowStream::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FollowStream {
    Table,
    Id,
    UserId,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum FollowStreamBoard {
    Table,
    Id,
    StreamId,
    BoardId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Board {
    Table,
    Id,
}
