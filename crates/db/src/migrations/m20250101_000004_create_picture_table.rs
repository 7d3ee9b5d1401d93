//! Create picture table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Picture::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Picture::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Picture::PinId).string_len(32).not_null())
                    .col(ColumnDef::new(Picture::ImageBlob).binary())
                    .col(ColumnDef::new(Picture::UploadedUrl).string_len(2048))
                    .col(
                        ColumnDef::new(Picture::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_picture_pin")
                            .from(Picture::Table, Picture::PinId)
                            .to(Pin::Table, Pin::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: pin_id - exactly one picture per pin
        manager
            .create_index(
                Index::create()
                    .name("idx_picture_pin_id")
                    .table(Picture::Table)
                    .col(Picture::PinId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Picture::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Picture {
    Table,
    Id,
    PinId,
    ImageBlob,
    UploadedUrl,
    CreatedAt,
}

#[derive(Iden)]
enum Pin {
    Table,
    Id,
}
