//! Film repository.

use std::sync::Arc;

use reelhub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::entities::{Film, film};

/// Repository for film operations.
#[derive(Clone)]
pub struct FilmRepository {
    db: Arc<DatabaseConnection>,
}

impl FilmRepository {
    /// Create a new film repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get reference to the database connection.
    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Find film by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<film::Model>> {
        Film::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get film by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<film::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Film not found: {id}")))
    }

    /// Find film by catalog id.
    pub async fn find_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<film::Model>> {
        Film::find()
            .filter(film::Column::TmdbId.eq(tmdb_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new film.
    pub async fn create(&self, model: film::ActiveModel) -> AppResult<film::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a film.
    pub async fn update(&self, model: film::ActiveModel) -> AppResult<film::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List films, newest catalog entries first.
    pub async fn list_recent(&self, limit: u64, offset: u64) -> AppResult<Vec<film::Model>> {
        Film::find()
            .order_by(film::Column::ReleaseDate, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Search films by title substring.
    pub async fn search(&self, query: &str, limit: u64) -> AppResult<Vec<film::Model>> {
        Film::find()
            .filter(film::Column::Title.contains(query))
            .order_by(film::Column::Title, Order::Asc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find several films by id.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<film::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Film::find()
            .filter(film::Column::Id.is_in(ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
