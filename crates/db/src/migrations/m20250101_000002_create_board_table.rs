//! Create board table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Board::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Board::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Board::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Board::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Board::Description).text())
                    .col(
                        ColumnDef::new(Board::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_board_user")
                            .from(Board::Table, Board::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's boards)
        manager
            .create_index(
                Index::create()
                    .name("idx_board_user_id")
                    .table(Board::Table)
                    .col(Board::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Board::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Board {
    Table,
    Id,
    UserId,
    Name,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
