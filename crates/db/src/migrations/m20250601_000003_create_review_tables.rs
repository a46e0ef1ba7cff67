//! Create review, review like and comment reply tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Review::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Review::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::FilmId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::Rating).small_integer().not_null())
                    .col(ColumnDef::new(Review::Comment).text())
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Review::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_user")
                            .from(Review::Table, Review::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_film")
                            .from(Review::Table, Review::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one review per (user, film); re-submission updates
        manager
            .create_index(
                Index::create()
                    .name("idx_review_user_film")
                    .table(Review::Table)
                    .col(Review::UserId)
                    .col(Review::FilmId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: film_id (for average recomputation and listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_film_id")
                    .table(Review::Table)
                    .col(Review::FilmId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReviewLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReviewLike::ReviewId).string_len(32).not_null())
                    .col(ColumnDef::new(ReviewLike::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ReviewLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_like_review")
                            .from(ReviewLike::Table, ReviewLike::ReviewId)
                            .to(Review::Table, Review::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_like_user")
                            .from(ReviewLike::Table, ReviewLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one like per (review, user)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_like_review_user")
                    .table(ReviewLike::Table)
                    .col(ReviewLike::ReviewId)
                    .col(ReviewLike::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommentReply::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommentReply::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CommentReply::ReviewId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CommentReply::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(CommentReply::Message).text().not_null())
                    .col(
                        ColumnDef::new(CommentReply::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_reply_review")
                            .from(CommentReply::Table, CommentReply::ReviewId)
                            .to(Review::Table, Review::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_reply_user")
                            .from(CommentReply::Table, CommentReply::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (review_id, created_at) for ordered reply listings
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_reply_review_created")
                    .table(CommentReply::Table)
                    .col(CommentReply::ReviewId)
                    .col(CommentReply::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommentReply::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReviewLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    UserId,
    FilmId,
    Rating,
    Comment,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ReviewLike {
    Table,
    Id,
    ReviewId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum CommentReply {
    Table,
    Id,
    ReviewId,
    UserId,
    Message,
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
