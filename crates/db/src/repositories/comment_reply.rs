//! Comment reply repository.

use std::sync::Arc;

use reelhub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder,
};

use crate::entities::{CommentReply, comment_reply};

/// Repository for comment reply operations.
#[derive(Clone)]
pub struct CommentReplyRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentReplyRepository {
    /// Create a new comment reply repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find reply by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment_reply::Model>> {
        CommentReply::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get reply by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment_reply::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reply not found: {id}")))
    }

    /// Create a reply.
    pub async fn create(
        &self,
        model: comment_reply::ActiveModel,
    ) -> AppResult<comment_reply::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List replies to a review in creation order.
    pub async fn list_for_review(&self, review_id: &str) -> AppResult<Vec<comment_reply::Model>> {
        CommentReply::find()
            .filter(comment_reply::Column::ReviewId.eq(review_id))
            .order_by(comment_reply::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a reply.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        CommentReply::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
