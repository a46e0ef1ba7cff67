//! Moderation service: content reports and moderator actions.

use chrono::Utc;
use reelhub_common::{AppError, AppResult, IdGenerator};
use reelhub_db::entities::reported_content::{
    self, ContentKind, ModeratorAction, ReportStatus,
};
use reelhub_db::entities::user::UserRole;
use reelhub_db::repositories::{
    CommentReplyRepository, FilmRepository, GroupRepository, MessageRepository,
    ModerationRepository, ReviewRepository, UserRepository,
};
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for reporting a piece of content.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportContentInput {
    pub content_kind: ContentKind,
    pub content_id: String,
    #[validate(length(max = 2048))]
    pub reason: Option<String>,
}

/// Input for resolving a report.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReportInput {
    pub action: ModeratorAction,
    #[validate(length(max = 2048))]
    pub notes: Option<String>,
}

/// Snapshot of the reported content shown in the moderation queue.
/// `None` means the content has been deleted since the report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ContentPreview {
    Review {
        rating: i16,
        comment: Option<String>,
        author_pseudo: String,
        film_title: String,
    },
    CommentReply {
        message: String,
        author_pseudo: String,
    },
    GroupMessage {
        text: String,
        author_pseudo: String,
        group_title: String,
    },
    User {
        pseudo: String,
        email: String,
        bio: Option<String>,
    },
}

/// A report with reporter, moderator and content preview resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub id: String,
    pub content_kind: ContentKind,
    pub content_id: String,
    pub content: Option<ContentPreview>,
    pub reason: Option<String>,
    pub status: ReportStatus,
    pub reporter_id: String,
    pub reporter_pseudo: Option<String>,
    pub moderator_id: Option<String>,
    pub moderator_pseudo: Option<String>,
    pub moderator_action: Option<ModeratorAction>,
    pub moderator_notes: Option<String>,
    pub created_at: String,
}

/// Moderation service for business logic.
///
/// The polymorphic (kind, id) reference on a report resolves through
/// one dispatch point per capability: existence, preview and deletion.
#[derive(Clone)]
pub struct ModerationService {
    moderation_repo: ModerationRepository,
    review_repo: ReviewRepository,
    reply_repo: CommentReplyRepository,
    message_repo: MessageRepository,
    user_repo: UserRepository,
    film_repo: FilmRepository,
    group_repo: GroupRepository,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub fn new(
        moderation_repo: ModerationRepository,
        review_repo: ReviewRepository,
        reply_repo: CommentReplyRepository,
        message_repo: MessageRepository,
        user_repo: UserRepository,
        film_repo: FilmRepository,
        group_repo: GroupRepository,
    ) -> Self {
        Self {
            moderation_repo,
            review_repo,
            reply_repo,
            message_repo,
            user_repo,
            film_repo,
            group_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Report a piece of content.
    pub async fn report(
        &self,
        reporter_id: &str,
        input: ReportContentInput,
    ) -> AppResult<reported_content::Model> {
        input.validate()?;

        // The referenced row must exist at report time
        if !self
            .content_exists(input.content_kind, &input.content_id)
            .await?
        {
            return Err(AppError::NotFound("Content not found".to_string()));
        }

        if self
            .moderation_repo
            .find_duplicate(input.content_kind, &input.content_id, reporter_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You already reported this content".to_string(),
            ));
        }

        let model = reported_content::ActiveModel {
            id: Set(self.id_gen.generate()),
            content_kind: Set(input.content_kind),
            content_id: Set(input.content_id),
            reporter_id: Set(reporter_id.to_string()),
            reason: Set(input.reason),
            status: Set(ReportStatus::Pending),
            moderator_id: Set(None),
            moderator_action: Set(None),
            moderator_notes: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.moderation_repo.create(model).await
    }

    /// List reports by status, with content previews. Admin only.
    ///
    /// A preview that fails to resolve (content deleted since the
    /// report) is returned as `None` rather than failing the listing.
    pub async fn list_reports(
        &self,
        actor_role: UserRole,
        status: ReportStatus,
    ) -> AppResult<Vec<ReportView>> {
        self.require_admin(actor_role)?;

        let reports = self.moderation_repo.list_by_status(status).await?;

        let mut out = Vec::with_capacity(reports.len());
        for report in reports {
            let content = self
                .content_preview(report.content_kind, &report.content_id)
                .await?;

            let reporter = self.user_repo.find_by_id(&report.reporter_id).await?;
            let moderator = match &report.moderator_id {
                Some(id) => self.user_repo.find_by_id(id).await?,
                None => None,
            };

            out.push(ReportView {
                id: report.id,
                content_kind: report.content_kind,
                content_id: report.content_id,
                content,
                reason: report.reason,
                status: report.status,
                reporter_id: report.reporter_id,
                reporter_pseudo: reporter.map(|u| u.pseudo),
                moderator_id: report.moderator_id,
                moderator_pseudo: moderator.map(|u| u.pseudo),
                moderator_action: report.moderator_action,
                moderator_notes: report.moderator_notes,
                created_at: report.created_at.to_rfc3339(),
            });
        }

        Ok(out)
    }

    /// Resolve a pending report with a moderator action. Admin only.
    ///
    /// `delete` removes the underlying content first; deleting a user
    /// account through moderation is unsupported. Resolution is a
    /// guarded transition: a report that is no longer pending cannot be
    /// resolved again.
    pub async fn resolve(
        &self,
        moderator_id: &str,
        actor_role: UserRole,
        report_id: &str,
        input: ResolveReportInput,
    ) -> AppResult<reported_content::Model> {
        self.require_admin(actor_role)?;
        input.validate()?;

        let report = self.moderation_repo.get_by_id(report_id).await?;

        if report.status != ReportStatus::Pending {
            return Err(AppError::Conflict(
                "Report has already been handled".to_string(),
            ));
        }

        if input.action == ModeratorAction::Delete {
            if !report.content_kind.is_deletable() {
                return Err(AppError::BadRequest(
                    "This content kind cannot be deleted".to_string(),
                ));
            }
            self.delete_content(report.content_kind, &report.content_id)
                .await?;
        }

        let mut active: reported_content::ActiveModel = report.into();
        active.status = Set(ReportStatus::Resolved);
        active.moderator_id = Set(Some(moderator_id.to_string()));
        active.moderator_action = Set(Some(input.action));
        active.moderator_notes = Set(input.notes);
        active.updated_at = Set(Some(Utc::now().into()));

        self.moderation_repo.update(active).await
    }

    // ==================== Content dispatch ====================

    /// Typed existence check per content kind.
    async fn content_exists(&self, kind: ContentKind, id: &str) -> AppResult<bool> {
        Ok(match kind {
            ContentKind::Review => self.review_repo.find_by_id(id).await?.is_some(),
            ContentKind::CommentReply => self.reply_repo.find_by_id(id).await?.is_some(),
            ContentKind::GroupMessage => self.message_repo.find_by_id(id).await?.is_some(),
            ContentKind::User => self.user_repo.find_by_id(id).await?.is_some(),
        })
    }

    /// Typed preview per content kind. Deleted content reads as `None`.
    async fn content_preview(
        &self,
        kind: ContentKind,
        id: &str,
    ) -> AppResult<Option<ContentPreview>> {
        let preview = match kind {
            ContentKind::Review => {
                let Some(review) = self.review_repo.find_by_id(id).await? else {
                    return Ok(None);
                };
                let author = self.user_repo.find_by_id(&review.user_id).await?;
                let film = self.film_repo.find_by_id(&review.film_id).await?;
                ContentPreview::Review {
                    rating: review.rating,
                    comment: review.comment,
                    author_pseudo: author.map(|u| u.pseudo).unwrap_or_default(),
                    film_title: film.map(|f| f.title).unwrap_or_default(),
                }
            }
            ContentKind::CommentReply => {
                let Some(reply) = self.reply_repo.find_by_id(id).await? else {
                    return Ok(None);
                };
                let author = self.user_repo.find_by_id(&reply.user_id).await?;
                ContentPreview::CommentReply {
                    message: reply.message,
                    author_pseudo: author.map(|u| u.pseudo).unwrap_or_default(),
                }
            }
            ContentKind::GroupMessage => {
                let Some(message) = self.message_repo.find_by_id(id).await? else {
                    return Ok(None);
                };
                let author = self.user_repo.find_by_id(&message.user_id).await?;
                let group = self.group_repo.find_by_id(&message.group_id).await?;
                ContentPreview::GroupMessage {
                    text: message.text,
                    author_pseudo: author.map(|u| u.pseudo).unwrap_or_default(),
                    group_title: group.map(|g| g.title).unwrap_or_default(),
                }
            }
            ContentKind::User => {
                let Some(user) = self.user_repo.find_by_id(id).await? else {
                    return Ok(None);
                };
                ContentPreview::User {
                    pseudo: user.pseudo,
                    email: user.email,
                    bio: user.bio,
                }
            }
        };

        Ok(Some(preview))
    }

    /// Typed deletion per content kind. Already-deleted content no-ops.
    async fn delete_content(&self, kind: ContentKind, id: &str) -> AppResult<()> {
        match kind {
            ContentKind::Review => {
                if let Some(review) = self.review_repo.find_by_id(id).await? {
                    let active: reelhub_db::entities::review::ActiveModel = review.into();
                    active
                        .delete(self.review_repo.db())
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;
                }
            }
            ContentKind::CommentReply => {
                self.reply_repo.delete(id).await?;
            }
            ContentKind::GroupMessage => {
                self.message_repo.delete(id).await?;
            }
            ContentKind::User => {
                return Err(AppError::BadRequest(
                    "User accounts cannot be deleted through moderation".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn require_admin(&self, role: UserRole) -> AppResult<()> {
        if !role.is_admin() {
            return Err(AppError::Forbidden(
                "Only administrators may access moderation".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind_parses_wire_names() {
        let kind: ContentKind = serde_json::from_str("\"comment_reply\"").unwrap();
        assert_eq!(kind, ContentKind::CommentReply);

        let kind: ContentKind = serde_json::from_str("\"group_message\"").unwrap();
        assert_eq!(kind, ContentKind::GroupMessage);

        assert!(serde_json::from_str::<ContentKind>("\"movie\"").is_err());
    }

    #[test]
    fn test_moderator_action_parses_wire_names() {
        let action: ModeratorAction = serde_json::from_str("\"no_action\"").unwrap();
        assert_eq!(action, ModeratorAction::NoAction);

        assert!(serde_json::from_str::<ModeratorAction>("\"nuke\"").is_err());
    }
}
