//! Create pin table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pin::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pin::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pin::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Pin::BoardId).string_len(32).not_null())
                    .col(ColumnDef::new(Pin::Title).string_len(256))
                    .col(ColumnDef::new(Pin::Tags).text())
                    .col(ColumnDef::new(Pin::SourceUrl).string_len(2048))
                    .col(ColumnDef::new(Pin::OriginalPinId).string_len(32))
                    .col(
                        ColumnDef::new(Pin::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pin_user")
                            .from(Pin::Table, Pin::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pin_board")
                            .from(Pin::Table, Pin::BoardId)
                            .to(Board::Table, Board::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    // Deleting a pin deletes the pins repinned from it.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pin_original_pin")
                            .from(Pin::Table, Pin::OriginalPinId)
                            .to(Pin::Table, Pin::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: board_id (for board listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_pin_board_id")
                    .table(Pin::Table)
                    .col(Pin::BoardId)
                    .to_owned(),
            )
            .await?;

        // Index: original_pin_id (for lineage lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_pin_original_pin_id")
                    .table(Pin::Table)
                    .col(Pin::OriginalPinId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (feed and listings order by recency)
        manager
            .create_index(
                Index::create()
                    .name("idx_pin_created_at")
                    .table(Pin::Table)
                    .col(Pin::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pin::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Pin {
    Table,
    Id,
    UserId,
    BoardId,
    Title,
    Tags,
    SourceUrl,
    OriginalPinId,
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
