//! Review like repository.

use std::sync::Arc;

use reelhub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter,
};

use crate::entities::{ReviewLike, review_like};

/// Repository for review like operations.
#[derive(Clone)]
pub struct ReviewLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewLikeRepository {
    /// Create a new review like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by review and user.
    pub async fn find_by_pair(
        &self,
        review_id: &str,
        user_id: &str,
    ) -> AppResult<Option<review_like::Model>> {
        ReviewLike::find()
            .filter(review_like::Column::ReviewId.eq(review_id))
            .filter(review_like::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a like.
    pub async fn create(&self, model: review_like::ActiveModel) -> AppResult<review_like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a like by pair.
    pub async fn delete_by_pair(&self, review_id: &str, user_id: &str) -> AppResult<()> {
        let like = self.find_by_pair(review_id, user_id).await?;
        if let Some(l) = like {
            l.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Count likes on a review.
    pub async fn count_for_review(&self, review_id: &str) -> AppResult<u64> {
        ReviewLike::find()
            .filter(review_like::Column::ReviewId.eq(review_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
