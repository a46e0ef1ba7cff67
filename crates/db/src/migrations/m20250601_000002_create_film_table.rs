//! Create film table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Film::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Film::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Film::TmdbId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Film::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Film::OriginalTitle).string_len(256))
                    .col(ColumnDef::new(Film::Synopsis).text())
                    .col(ColumnDef::new(Film::ReleaseDate).string_len(10))
                    .col(ColumnDef::new(Film::RuntimeMinutes).integer())
                    .col(ColumnDef::new(Film::PosterUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Film::AverageRating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Film::VotesCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Film::Genres).json_binary())
                    .col(ColumnDef::new(Film::Director).string_len(256))
                    .col(ColumnDef::new(Film::Cast).json_binary())
                    .col(
                        ColumnDef::new(Film::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Film::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: title (for search)
        manager
            .create_index(
                Index::create()
                    .name("idx_film_title")
                    .table(Film::Table)
                    .col(Film::Title)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Film::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Film {
    Table,
    Id,
    TmdbId,
    Title,
    OriginalTitle,
    Synopsis,
    ReleaseDate,
    RuntimeMinutes,
    PosterUrl,
    AverageRating,
    VotesCount,
    Genres,
    Director,
    Cast,
    CreatedAt,
    UpdatedAt,
}
