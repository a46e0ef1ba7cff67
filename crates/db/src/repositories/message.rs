//! Group message repository.

use std::sync::Arc;

use reelhub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder,
};

use crate::entities::{GroupMessage, group_message};

/// Repository for group message operations.
#[derive(Clone)]
pub struct MessageRepository {
    db: Arc<DatabaseConnection>,
}

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find message by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<group_message::Model>> {
        GroupMessage::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a message.
    pub async fn create(
        &self,
        model: group_message::ActiveModel,
    ) -> AppResult<group_message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List messages of a group in chronological order.
    pub async fn list_for_group(&self, group_id: &str) -> AppResult<Vec<group_message::Model>> {
        GroupMessage::find()
            .filter(group_message::Column::GroupId.eq(group_id))
            .order_by(group_message::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a message.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        GroupMessage::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
