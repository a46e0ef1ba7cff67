//! Reported content entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of content a report points at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    #[sea_orm(string_value = "review")]
    Review,
    #[sea_orm(string_value = "comment_reply")]
    CommentReply,
    #[sea_orm(string_value = "group_message")]
    GroupMessage,
    #[sea_orm(string_value = "user")]
    User,
}

impl ContentKind {
    /// Whether the underlying content can be removed by a moderator.
    /// User accounts cannot be deleted through moderation.
    #[must_use]
    pub fn is_deletable(self) -> bool {
        !matches!(self, Self::User)
    }
}

/// Lifecycle of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Awaiting moderator action.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Seen by a moderator, no action yet.
    #[sea_orm(string_value = "reviewed")]
    Reviewed,
    /// Closed with a moderator action.
    #[sea_orm(string_value = "resolved")]
    Resolved,
    /// Closed without action.
    #[sea_orm(string_value = "dismissed")]
    Dismissed,
}

/// Action taken by the resolving moderator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ModeratorAction {
    /// Remove the reported content.
    #[sea_orm(string_value = "delete")]
    Delete,
    /// Warn the author.
    #[sea_orm(string_value = "warn")]
    Warn,
    /// Ban the author.
    #[sea_orm(string_value = "ban")]
    Ban,
    /// Close without action.
    #[sea_orm(string_value = "no_action")]
    NoAction,
}

/// A user-submitted flag against a piece of content. The polymorphic
/// (kind, id) reference is resolved through typed dispatch in the
/// moderation service; the row itself stores only the tag and the id.
/// Unique per (kind, id, reporter).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reported_content")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub content_kind: ContentKind,

    pub content_id: String,

    #[sea_orm(indexed)]
    pub reporter_id: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,

    pub status: ReportStatus,

    /// The moderator who closed the report.
    #[sea_orm(nullable)]
    pub moderator_id: Option<String>,

    #[sea_orm(nullable)]
    pub moderator_action: Option<ModeratorAction>,

    #[sea_orm(column_type = "Text", nullable)]
    pub moderator_notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ModeratorId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Moderator,
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_reports_are_not_deletable() {
        assert!(ContentKind::Review.is_deletable());
        assert!(ContentKind::CommentReply.is_deletable());
        assert!(ContentKind::GroupMessage.is_deletable());
        assert!(!ContentKind::User.is_deletable());
    }
}
