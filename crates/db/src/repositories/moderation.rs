//! Moderation repository.

use std::sync::Arc;

use reelhub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::entities::reported_content::{ContentKind, ReportStatus};
use crate::entities::{ReportedContent, reported_content};

/// Repository for content report operations.
#[derive(Clone)]
pub struct ModerationRepository {
    db: Arc<DatabaseConnection>,
}

impl ModerationRepository {
    /// Create a new moderation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find report by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<reported_content::Model>> {
        ReportedContent::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get report by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<reported_content::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report not found: {id}")))
    }

    /// Find an existing report by the same reporter for the same item.
    pub async fn find_duplicate(
        &self,
        kind: ContentKind,
        content_id: &str,
        reporter_id: &str,
    ) -> AppResult<Option<reported_content::Model>> {
        ReportedContent::find()
            .filter(reported_content::Column::ContentKind.eq(kind))
            .filter(reported_content::Column::ContentId.eq(content_id))
            .filter(reported_content::Column::ReporterId.eq(reporter_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a report.
    pub async fn create(
        &self,
        model: reported_content::ActiveModel,
    ) -> AppResult<reported_content::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a report.
    pub async fn update(
        &self,
        model: reported_content::ActiveModel,
    ) -> AppResult<reported_content::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List reports with a given status, newest first.
    pub async fn list_by_status(
        &self,
        status: ReportStatus,
    ) -> AppResult<Vec<reported_content::Model>> {
        ReportedContent::find()
            .filter(reported_content::Column::Status.eq(status))
            .order_by(reported_content::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count reports with a given status.
    pub async fn count_by_status(&self, status: ReportStatus) -> AppResult<u64> {
        ReportedContent::find()
            .filter(reported_content::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
