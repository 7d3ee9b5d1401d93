//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_board_table;
mod m20250101_000003_create_pin_table;
mod m20250101_000004_create_picture_table;
mod m20250101_000005_create_friendship_table;
mod m20250101_000006_create_follow_stream_tables;
mod m20250101_000007_create_like_table;
mod m20250101_000008_create_comment_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_board_table::Migration),
            Box::new(m20250101_000003_create_pin_table::Migration),
            Box::new(m20250101_000004_create_picture_table::Migration),
            Box::new(m20250101_000005_create_friendship_table::Migration),
            Box::new(m20250101_000006_create_follow_stream_tables::Migration),
            Box::new(m20250101_000007_create_like_table::Migration),
            Box::new(m20250101_000008_create_comment_table::Migration),
        ]
    }
}
