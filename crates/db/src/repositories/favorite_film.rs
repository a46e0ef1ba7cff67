//! User favorite film repository.

use std::sync::Arc;

use reelhub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{UserFavoriteFilm, user_favorite_film};

/// Repository for favorite film shelf operations.
#[derive(Clone)]
pub struct FavoriteFilmRepository {
    db: Arc<DatabaseConnection>,
}

impl FavoriteFilmRepository {
    /// Create a new favorite film repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a shelf entry by user and film.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        film_id: &str,
    ) -> AppResult<Option<user_favorite_film::Model>> {
        UserFavoriteFilm::find()
            .filter(user_favorite_film::Column::UserId.eq(user_id))
            .filter(user_favorite_film::Column::FilmId.eq(film_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's shelf in position order. The shelf is small by
    /// construction (five entries at most), so no pagination.
    pub async fn list_for_user(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<user_favorite_film::Model>> {
        UserFavoriteFilm::find()
            .filter(user_favorite_film::Column::UserId.eq(user_id))
            .order_by(user_favorite_film::Column::Position, Order::Asc)
            .order_by(user_favorite_film::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count shelf entries for a user.
    pub async fn count_for_user(&self, user_id: &str) -> AppResult<u64> {
        UserFavoriteFilm::find()
            .filter(user_favorite_film::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a shelf entry.
    pub async fn create(
        &self,
        model: user_favorite_film::ActiveModel,
    ) -> AppResult<user_favorite_film::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a shelf entry, returning whether a row was removed.
    pub async fn delete_by_pair(&self, user_id: &str, film_id: &str) -> AppResult<bool> {
        let entry = self.find_by_pair(user_id, film_id).await?;
        match entry {
            Some(e) => {
                e.delete(self.db.as_ref())
                    .await
                    .map_err(|err| AppError::Database(err.to_string()))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Renumber the remaining entries from zero, keeping their order.
    pub async fn compact_positions(&self, user_id: &str) -> AppResult<()> {
        let entries = self.list_for_user(user_id).await?;

        for (position, entry) in entries.into_iter().enumerate() {
            if entry.position != position as i32 {
                let mut active: user_favorite_film::ActiveModel = entry.into();
                active.position = Set(position as i32);
                active
                    .update(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
        }

        Ok(())
    }
}
