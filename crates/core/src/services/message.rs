//! Group message service.
//!
//! Messages persist first, then fan out to the group's channel
//! subscribers. Delivery is best-effort: a failed publish is logged
//! and never fails the post.

use chrono::Utc;
use reelhub_common::{AppError, AppResult, IdGenerator};
use reelhub_db::{
    entities::group_message,
    repositories::{GroupRepository, MessageRepository, UserRepository},
};
use sea_orm::Set;
use serde::Serialize;

use crate::services::channel_events::{
    ChannelPublisherService, GroupMessageEvent, MessageAuthor,
};

/// A message with its author denormalized, as served to clients and
/// pushed to channel subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: String,
    pub group_id: String,
    pub text: String,
    pub created_at: String,
    pub author: AuthorView,
}

/// Denormalized author of a message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    pub id: String,
    pub pseudo: String,
    pub avatar_url: Option<String>,
}

/// Message service for business logic.
#[derive(Clone)]
pub struct MessageService {
    message_repo: MessageRepository,
    group_repo: GroupRepository,
    user_repo: UserRepository,
    publisher: ChannelPublisherService,
    id_gen: IdGenerator,
}

impl MessageService {
    /// Create a new message service.
    #[must_use]
    pub fn new(
        message_repo: MessageRepository,
        group_repo: GroupRepository,
        user_repo: UserRepository,
        publisher: ChannelPublisherService,
    ) -> Self {
        Self {
            message_repo,
            group_repo,
            user_repo,
            publisher,
            id_gen: IdGenerator::new(),
        }
    }

    /// List a group's full message history in chronological order.
    ///
    /// Private groups only serve their members.
    pub async fn list(&self, group_id: &str, user_id: &str) -> AppResult<Vec<MessageView>> {
        self.check_access(group_id, user_id).await?;

        let messages = self.message_repo.list_for_group(group_id).await?;

        let author_ids: Vec<String> = messages.iter().map(|m| m.user_id.clone()).collect();
        let authors = self.user_repo.find_by_ids(&author_ids).await?;

        Ok(messages
            .into_iter()
            .map(|message| {
                let author = authors.iter().find(|u| u.id == message.user_id);
                MessageView {
                    id: message.id,
                    group_id: message.group_id,
                    text: message.text,
                    created_at: message.created_at.to_rfc3339(),
                    author: AuthorView {
                        id: message.user_id,
                        pseudo: author.map(|u| u.pseudo.clone()).unwrap_or_default(),
                        avatar_url: author.and_then(|u| u.avatar_url.clone()),
                    },
                }
            })
            .collect())
    }

    /// Post a message to a group.
    ///
    /// The row persists first; only then is it pushed to the group's
    /// channel. A subscriber that is disconnected at that moment simply
    /// misses the event.
    pub async fn post(
        &self,
        group_id: &str,
        author_id: &str,
        text: &str,
    ) -> AppResult<MessageView> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Message cannot be empty".to_string()));
        }

        self.check_access(group_id, author_id).await?;

        let model = group_message::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            user_id: Set(author_id.to_string()),
            text: Set(text.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let message = self.message_repo.create(model).await?;
        let author = self.user_repo.get_by_id(author_id).await?;

        let view = MessageView {
            id: message.id.clone(),
            group_id: message.group_id.clone(),
            text: message.text.clone(),
            created_at: message.created_at.to_rfc3339(),
            author: AuthorView {
                id: author.id.clone(),
                pseudo: author.pseudo.clone(),
                avatar_url: author.avatar_url.clone(),
            },
        };

        let event = GroupMessageEvent {
            id: message.id,
            group_id: message.group_id,
            text: message.text,
            created_at: message.created_at.to_rfc3339(),
            author: MessageAuthor {
                id: author.id,
                pseudo: author.pseudo,
                avatar_url: author.avatar_url,
            },
        };

        if let Err(e) = self.publisher.publish_group_message(event).await {
            tracing::warn!(error = %e, "Failed to publish group message event");
        }

        Ok(view)
    }

    /// Reject reads and writes from non-members of private groups.
    async fn check_access(&self, group_id: &str, user_id: &str) -> AppResult<()> {
        let group = self.group_repo.get_by_id(group_id).await?;

        if !group.is_public && !self.group_repo.is_member(user_id, group_id).await? {
            return Err(AppError::Forbidden(
                "You must be a member of this group".to_string(),
            ));
        }

        Ok(())
    }
}
