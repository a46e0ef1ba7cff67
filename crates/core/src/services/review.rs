//! Review service: ratings, likes and replies.

use chrono::Utc;
use reelhub_common::{AppError, AppResult, IdGenerator};
use reelhub_db::entities::user::UserRole;
use reelhub_db::entities::{Review, comment_reply, review, review_like};
use reelhub_db::repositories::{
    CommentReplyRepository, FilmRepository, ReviewLikeRepository, ReviewRepository,
    UserRepository,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for writing a review.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertReviewInput {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(max = 4096))]
    pub comment: Option<String>,
}

/// Like state of a review for a given user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub liked: bool,
    pub likes_count: u64,
}

/// A reply with its author's card.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    pub id: String,
    pub review_id: String,
    pub message: String,
    pub created_at: String,
    pub author_id: String,
    pub author_pseudo: Option<String>,
    pub author_avatar_url: Option<String>,
}

/// Review service for business logic.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    like_repo: ReviewLikeRepository,
    reply_repo: CommentReplyRepository,
    film_repo: FilmRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub fn new(
        review_repo: ReviewRepository,
        like_repo: ReviewLikeRepository,
        reply_repo: CommentReplyRepository,
        film_repo: FilmRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            review_repo,
            like_repo,
            reply_repo,
            film_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Write or rewrite a user's review of a film.
    ///
    /// The review row and the film's average rating move together in
    /// one transaction: after commit, the average reflects exactly the
    /// set of current reviews.
    pub async fn upsert(
        &self,
        user_id: &str,
        film_id: &str,
        input: UpsertReviewInput,
    ) -> AppResult<review::Model> {
        input.validate()?;

        let film = self.film_repo.get_by_id(film_id).await?;
        let existing = self
            .review_repo
            .find_by_user_and_film(user_id, film_id)
            .await?;

        let now = Utc::now();
        let txn = self
            .review_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let saved = match existing {
            Some(review) => {
                let mut active: review::ActiveModel = review.into();
                active.rating = Set(input.rating);
                active.comment = Set(input.comment);
                active.updated_at = Set(Some(now.into()));
                active
                    .update(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?
            }
            None => {
                let model = review::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(user_id.to_string()),
                    film_id: Set(film_id.to_string()),
                    rating: Set(input.rating),
                    comment: Set(input.comment),
                    created_at: Set(now.into()),
                    updated_at: Set(None),
                };
                model
                    .insert(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?
            }
        };

        // Recompute the film average from the full current review set
        let ratings: Vec<i16> = Review::find()
            .filter(review::Column::FilmId.eq(film_id))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|r| r.rating)
            .collect();

        let average = if ratings.is_empty() {
            0.0
        } else {
            f64::from(ratings.iter().map(|r| i32::from(*r)).sum::<i32>())
                / ratings.len() as f64
        };

        let mut film_active: reelhub_db::entities::film::ActiveModel = film.into();
        film_active.average_rating = Set(average);
        film_active.updated_at = Set(Some(now.into()));
        film_active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(saved)
    }

    /// Get a review by id.
    pub async fn get(&self, review_id: &str) -> AppResult<review::Model> {
        self.review_repo.get_by_id(review_id).await
    }

    /// List a user's reviews, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<review::Model>> {
        self.review_repo.list_by_user(user_id).await
    }

    /// List the most recent commented reviews.
    pub async fn list_recent(&self, limit: u64) -> AppResult<Vec<review::Model>> {
        self.review_repo.list_recent_commented(limit).await
    }

    // ==================== Likes ====================

    /// Toggle the caller's like on a review.
    pub async fn toggle_like(&self, user_id: &str, review_id: &str) -> AppResult<LikeStatus> {
        self.review_repo.get_by_id(review_id).await?;

        let existing = self.like_repo.find_by_pair(review_id, user_id).await?;

        let liked = if existing.is_some() {
            self.like_repo.delete_by_pair(review_id, user_id).await?;
            false
        } else {
            let model = review_like::ActiveModel {
                id: Set(self.id_gen.generate()),
                review_id: Set(review_id.to_string()),
                user_id: Set(user_id.to_string()),
                created_at: Set(Utc::now().into()),
            };
            self.like_repo.create(model).await?;
            true
        };

        Ok(LikeStatus {
            liked,
            likes_count: self.like_repo.count_for_review(review_id).await?,
        })
    }

    /// Like state of a review for a user.
    pub async fn like_status(&self, user_id: &str, review_id: &str) -> AppResult<LikeStatus> {
        Ok(LikeStatus {
            liked: self
                .like_repo
                .find_by_pair(review_id, user_id)
                .await?
                .is_some(),
            likes_count: self.like_repo.count_for_review(review_id).await?,
        })
    }

    // ==================== Replies ====================

    /// Attach a reply to a review.
    pub async fn create_reply(
        &self,
        user_id: &str,
        review_id: &str,
        message: &str,
    ) -> AppResult<ReplyView> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation(
                "Reply message cannot be empty".to_string(),
            ));
        }

        self.review_repo.get_by_id(review_id).await?;

        let model = comment_reply::ActiveModel {
            id: Set(self.id_gen.generate()),
            review_id: Set(review_id.to_string()),
            user_id: Set(user_id.to_string()),
            message: Set(message.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let reply = self.reply_repo.create(model).await?;
        let author = self.user_repo.find_by_id(user_id).await?;

        Ok(ReplyView {
            id: reply.id,
            review_id: reply.review_id,
            message: reply.message,
            created_at: reply.created_at.to_rfc3339(),
            author_id: reply.user_id,
            author_pseudo: author.as_ref().map(|u| u.pseudo.clone()),
            author_avatar_url: author.and_then(|u| u.avatar_url),
        })
    }

    /// List replies to a review in creation order.
    pub async fn list_replies(&self, review_id: &str) -> AppResult<Vec<ReplyView>> {
        let replies = self.reply_repo.list_for_review(review_id).await?;

        let author_ids: Vec<String> = replies.iter().map(|r| r.user_id.clone()).collect();
        let authors = self.user_repo.find_by_ids(&author_ids).await?;

        Ok(replies
            .into_iter()
            .map(|reply| {
                let author = authors.iter().find(|u| u.id == reply.user_id);
                ReplyView {
                    id: reply.id,
                    review_id: reply.review_id,
                    message: reply.message,
                    created_at: reply.created_at.to_rfc3339(),
                    author_id: reply.user_id,
                    author_pseudo: author.map(|u| u.pseudo.clone()),
                    author_avatar_url: author.and_then(|u| u.avatar_url.clone()),
                }
            })
            .collect())
    }

    /// Delete a reply. Allowed for its author or a site moderator/admin.
    pub async fn delete_reply(
        &self,
        actor_id: &str,
        actor_role: UserRole,
        reply_id: &str,
    ) -> AppResult<()> {
        let reply = self.reply_repo.get_by_id(reply_id).await?;

        if reply.user_id != actor_id && !actor_role.can_moderate() {
            return Err(AppError::Forbidden(
                "You can only delete your own replies".to_string(),
            ));
        }

        self.reply_repo.delete(reply_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds_validate() {
        let ok = UpsertReviewInput {
            rating: 5,
            comment: None,
        };
        assert!(ok.validate().is_ok());

        let too_high = UpsertReviewInput {
            rating: 6,
            comment: None,
        };
        assert!(too_high.validate().is_err());

        let too_low = UpsertReviewInput {
            rating: 0,
            comment: None,
        };
        assert!(too_low.validate().is_err());
    }
}
