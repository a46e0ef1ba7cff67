//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_film_table;
mod m20250601_000003_create_review_tables;
mod m20250601_000004_create_social_graph_tables;
mod m20250601_000005_create_group_tables;
mod m20250601_000006_create_moderation_table;
mod m20250601_000007_create_notification_table;
mod m20250601_000008_create_favorite_film_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_film_table::Migration),
            Box::new(m20250601_000003_create_review_tables::Migration),
            Box::new(m20250601_000004_create_social_graph_tables::Migration),
            Box::new(m20250601_000005_create_group_tables::Migration),
            Box::new(m20250601_000006_create_moderation_table::Migration),
            Box::new(m20250601_000007_create_notification_table::Migration),
            Box::new(m20250601_000008_create_favorite_film_table::Migration),
        ]
    }
}
