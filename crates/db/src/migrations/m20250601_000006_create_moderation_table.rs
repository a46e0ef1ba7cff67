//! Create reported content table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReportedContent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportedContent::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReportedContent::ContentKind)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportedContent::ContentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReportedContent::ReporterId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReportedContent::Reason).text())
                    .col(
                        ColumnDef::new(ReportedContent::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ReportedContent::ModeratorId).string_len(32))
                    .col(ColumnDef::new(ReportedContent::ModeratorAction).string_len(20))
                    .col(ColumnDef::new(ReportedContent::ModeratorNotes).text())
                    .col(
                        ColumnDef::new(ReportedContent::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ReportedContent::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reported_content_reporter")
                            .from(ReportedContent::Table, ReportedContent::ReporterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reported_content_moderator")
                            .from(ReportedContent::Table, ReportedContent::ModeratorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: a reporter cannot report the same item twice
        manager
            .create_index(
                Index::create()
                    .name("idx_reported_content_kind_id_reporter")
                    .table(ReportedContent::Table)
                    .col(ReportedContent::ContentKind)
                    .col(ReportedContent::ContentId)
                    .col(ReportedContent::ReporterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: status + created_at (for the moderation queue)
        manager
            .create_index(
                Index::create()
                    .name("idx_reported_content_status_created")
                    .table(ReportedContent::Table)
                    .col(ReportedContent::Status)
                    .col(ReportedContent::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReportedContent::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReportedContent {
    Table,
    Id,
    ContentKind,
    ContentId,
    ReporterId,
    Reason,
    Status,
    ModeratorId,
    ModeratorAction,
    ModeratorNotes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
