//! Create user favorite film table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserFavoriteFilm::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserFavoriteFilm::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserFavoriteFilm::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserFavoriteFilm::FilmId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserFavoriteFilm::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserFavoriteFilm::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_favorite_film_user")
                            .from(UserFavoriteFilm::Table, UserFavoriteFilm::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_favorite_film_film")
                            .from(UserFavoriteFilm::Table, UserFavoriteFilm::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one shelf entry per (user, film)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_favorite_film_user_film")
                    .table(UserFavoriteFilm::Table)
                    .col(UserFavoriteFilm::UserId)
                    .col(UserFavoriteFilm::FilmId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserFavoriteFilm::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserFavoriteFilm {
    Table,
    Id,
    UserId,
    FilmId,
    Position,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Film {
    Table,
    Id,
}
