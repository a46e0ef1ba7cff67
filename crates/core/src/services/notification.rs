//! Notification service.

use chrono::Utc;
use reelhub_common::{AppError, AppResult, IdGenerator};
use reelhub_db::{
    entities::notification::{self, NotificationKind},
    repositories::NotificationRepository,
};
use sea_orm::Set;

/// How many notifications a listing returns.
const LIST_LIMIT: u64 = 50;

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Notify a user that they were invited to a group.
    pub async fn notify_group_invitation(
        &self,
        user_id: &str,
        group_id: &str,
    ) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            kind: Set(NotificationKind::GroupInvitation),
            title: Set("Group invitation".to_string()),
            message: Set("You have been invited to join a group".to_string()),
            link: Set(Some(format!("/groups/{group_id}"))),
            is_read: Set(false),
            created_at: Set(Utc::now().into()),
        };

        self.notification_repo.create(model).await
    }

    /// List a user's notifications, newest first.
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.list_for_user(user_id, LIST_LIMIT).await
    }

    /// Mark a notification as read. Only the owner may do this.
    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        let notification = self
            .notification_repo
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if notification.user_id != user_id {
            return Err(AppError::Forbidden("Not your notification".to_string()));
        }

        self.notification_repo.mark_as_read(notification).await?;
        Ok(())
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}
