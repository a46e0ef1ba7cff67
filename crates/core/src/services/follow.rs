//! Follow service.

use chrono::Utc;
use reelhub_common::{AppError, AppResult, IdGenerator};
use reelhub_db::{
    entities::follow,
    repositories::{FollowRepository, UserRepository},
};
use sea_orm::Set;

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository, user_repo: UserRepository) -> Self {
        Self {
            follow_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user.
    pub async fn follow(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        if follower_id == followee_id {
            return Err(AppError::BadRequest("Cannot follow yourself".to_string()));
        }

        // Target must exist
        self.user_repo.get_by_id(followee_id).await?;

        if self
            .follow_repo
            .is_following(follower_id, followee_id)
            .await?
        {
            return Err(AppError::Conflict(
                "You are already following this user".to_string(),
            ));
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower_id.to_string()),
            followee_id: Set(followee_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        self.follow_repo.create(model).await?;
        Ok(())
    }

    /// Unfollow a user.
    pub async fn unfollow(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        if !self
            .follow_repo
            .is_following(follower_id, followee_id)
            .await?
        {
            return Err(AppError::BadRequest(
                "You are not following this user".to_string(),
            ));
        }

        self.follow_repo
            .delete_by_pair(follower_id, followee_id)
            .await
    }

    /// Check whether one user follows another.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(follower_id, followee_id).await
    }
}
