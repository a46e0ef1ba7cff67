//! Film catalog service.
//!
//! The public catalog is a static in-memory dataset acting as a
//! read-only external data source. Films are materialized into the
//! local `film` table the first time someone interacts with them.

use chrono::Utc;
use reelhub_common::{AppError, AppResult, IdGenerator};
use reelhub_db::{
    entities::{film, user_favorite_film},
    repositories::{FavoriteFilmRepository, FilmRepository},
};
use sea_orm::Set;

/// Maximum number of favorite films on a profile shelf.
const MAX_FAVORITE_FILMS: u64 = 5;

/// A catalog entry.
#[derive(Debug, Clone)]
pub struct CatalogFilm {
    pub tmdb_id: i64,
    pub title: &'static str,
    pub original_title: &'static str,
    pub synopsis: &'static str,
    pub release_date: &'static str,
    pub runtime_minutes: Option<i32>,
    pub poster_url: &'static str,
    pub rating: f64,
    pub votes: i64,
    pub genres: &'static [&'static str],
    pub director: &'static str,
    pub cast: &'static [&'static str],
}

/// The public film catalog.
///
/// A small fixed selection; a production deployment would source this
/// from a catalog provider behind the same interface.
pub static PUBLIC_CATALOG: &[CatalogFilm] = &[
    CatalogFilm {
        tmdb_id: 550,
        title: "Fight Club",
        original_title: "Fight Club",
        synopsis: "An insomniac office worker and a soap salesman build an underground fight club that grows into something much bigger.",
        release_date: "1999-10-15",
        runtime_minutes: Some(139),
        poster_url: "https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        rating: 8.4,
        votes: 25000,
        genres: &["Drama", "Thriller"],
        director: "David Fincher",
        cast: &["Brad Pitt", "Edward Norton", "Helena Bonham Carter"],
    },
    CatalogFilm {
        tmdb_id: 278,
        title: "The Shawshank Redemption",
        original_title: "The Shawshank Redemption",
        synopsis: "Two imprisoned men bond over the years, finding solace and eventual redemption through acts of common decency.",
        release_date: "1994-09-23",
        runtime_minutes: Some(142),
        poster_url: "https://image.tmdb.org/t/p/w500/q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg",
        rating: 9.3,
        votes: 28000,
        genres: &["Drama", "Crime"],
        director: "Frank Darabont",
        cast: &["Tim Robbins", "Morgan Freeman"],
    },
    CatalogFilm {
        tmdb_id: 238,
        title: "The Godfather",
        original_title: "The Godfather",
        synopsis: "The epic story of the Corleone family and their crime empire.",
        release_date: "1972-03-24",
        runtime_minutes: Some(175),
        poster_url: "https://image.tmdb.org/t/p/w500/rSPw7tgCH9c6NqICZef4kZjFOQ5.jpg",
        rating: 9.2,
        votes: 19000,
        genres: &["Drama", "Crime"],
        director: "Francis Ford Coppola",
        cast: &["Marlon Brando", "Al Pacino", "James Caan"],
    },
    CatalogFilm {
        tmdb_id: 424,
        title: "Schindler's List",
        original_title: "Schindler's List",
        synopsis: "The true story of Oskar Schindler, a German businessman who saved more than a thousand Jewish refugees during the Holocaust.",
        release_date: "1993-12-15",
        runtime_minutes: Some(195),
        poster_url: "https://image.tmdb.org/t/p/w500/sF1U4EUQS8YHUYjNl3pMGNIQyr0.jpg",
        rating: 8.9,
        votes: 15000,
        genres: &["Drama", "History"],
        director: "Steven Spielberg",
        cast: &["Liam Neeson", "Ben Kingsley", "Ralph Fiennes"],
    },
    CatalogFilm {
        tmdb_id: 13,
        title: "Forrest Gump",
        original_title: "Forrest Gump",
        synopsis: "The story of a simple man who lives through extraordinary moments of several decades of American history.",
        release_date: "1994-07-06",
        runtime_minutes: Some(142),
        poster_url: "https://image.tmdb.org/t/p/w500/arw2vcBvePOVTg9NVXQBbq2pvPo.jpg",
        rating: 8.8,
        votes: 22000,
        genres: &["Comedy", "Drama"],
        director: "Robert Zemeckis",
        cast: &["Tom Hanks", "Robin Wright", "Gary Sinise"],
    },
    CatalogFilm {
        tmdb_id: 155,
        title: "The Dark Knight",
        original_title: "The Dark Knight",
        synopsis: "Batman faces one of the greatest psychological and physical tests of his ability to fight injustice.",
        release_date: "2008-07-18",
        runtime_minutes: Some(152),
        poster_url: "https://image.tmdb.org/t/p/w500/qJ2tW6WMUDux911r6m7haRef0WH.jpg",
        rating: 9.0,
        votes: 30000,
        genres: &["Action", "Crime", "Drama"],
        director: "Christopher Nolan",
        cast: &["Christian Bale", "Heath Ledger", "Aaron Eckhart"],
    },
    CatalogFilm {
        tmdb_id: 680,
        title: "Pulp Fiction",
        original_title: "Pulp Fiction",
        synopsis: "The lives of two mob hitmen, a boxer, a gangster and his wife intertwine in four tales of violence and redemption.",
        release_date: "1994-10-14",
        runtime_minutes: Some(154),
        poster_url: "https://image.tmdb.org/t/p/w500/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg",
        rating: 8.9,
        votes: 27000,
        genres: &["Thriller", "Crime"],
        director: "Quentin Tarantino",
        cast: &["John Travolta", "Samuel L. Jackson", "Uma Thurman"],
    },
    CatalogFilm {
        tmdb_id: 27205,
        title: "Inception",
        original_title: "Inception",
        synopsis: "A thief who steals corporate secrets through dream-sharing technology is given the inverse task of planting an idea.",
        release_date: "2010-07-16",
        runtime_minutes: Some(148),
        poster_url: "https://image.tmdb.org/t/p/w500/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg",
        rating: 8.8,
        votes: 33000,
        genres: &["Action", "Science Fiction", "Adventure"],
        director: "Christopher Nolan",
        cast: &["Leonardo DiCaprio", "Joseph Gordon-Levitt", "Elliot Page"],
    },
];

/// Film service: catalog reads and local materialization.
#[derive(Clone)]
pub struct FilmService {
    film_repo: FilmRepository,
    favorite_repo: FavoriteFilmRepository,
    id_gen: IdGenerator,
}

impl FilmService {
    /// Create a new film service.
    #[must_use]
    pub const fn new(film_repo: FilmRepository, favorite_repo: FavoriteFilmRepository) -> Self {
        Self {
            film_repo,
            favorite_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// The full public catalog.
    #[must_use]
    pub fn catalog(&self) -> &'static [CatalogFilm] {
        PUBLIC_CATALOG
    }

    /// Look up a catalog entry by id.
    #[must_use]
    pub fn catalog_entry(&self, tmdb_id: i64) -> Option<&'static CatalogFilm> {
        PUBLIC_CATALOG.iter().find(|f| f.tmdb_id == tmdb_id)
    }

    /// Ensure a catalog film exists locally, returning the local row.
    ///
    /// Unknown catalog ids are a `NotFound`.
    pub async fn ensure_film(&self, tmdb_id: i64) -> AppResult<film::Model> {
        if let Some(existing) = self.film_repo.find_by_tmdb_id(tmdb_id).await? {
            return Ok(existing);
        }

        let entry = self
            .catalog_entry(tmdb_id)
            .ok_or_else(|| AppError::NotFound(format!("Film not found in catalog: {tmdb_id}")))?;

        let model = film::ActiveModel {
            id: Set(self.id_gen.generate()),
            tmdb_id: Set(entry.tmdb_id),
            title: Set(entry.title.to_string()),
            original_title: Set(Some(entry.original_title.to_string())),
            synopsis: Set(Some(entry.synopsis.to_string())),
            release_date: Set(Some(entry.release_date.to_string())),
            runtime_minutes: Set(entry.runtime_minutes),
            poster_url: Set(Some(entry.poster_url.to_string())),
            average_rating: Set(0.0),
            votes_count: Set(entry.votes),
            genres: Set(Some(serde_json::json!(entry.genres))),
            director: Set(Some(entry.director.to_string())),
            cast: Set(Some(serde_json::json!(entry.cast))),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.film_repo.create(model).await
    }

    /// Get a locally materialized film by catalog id.
    pub async fn get_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<film::Model>> {
        self.film_repo.find_by_tmdb_id(tmdb_id).await
    }

    /// Search the catalog by title, case-insensitive substring.
    #[must_use]
    pub fn search_catalog(&self, query: &str) -> Vec<&'static CatalogFilm> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return PUBLIC_CATALOG.iter().collect();
        }

        PUBLIC_CATALOG
            .iter()
            .filter(|f| {
                f.title.to_lowercase().contains(&needle)
                    || f.original_title.to_lowercase().contains(&needle)
            })
            .collect()
    }

    // ==================== Favorite shelf ====================

    /// Add a film to the caller's favorite shelf (capped at five).
    pub async fn add_favorite(&self, user_id: &str, film_id: &str) -> AppResult<()> {
        self.film_repo.get_by_id(film_id).await?;

        if self
            .favorite_repo
            .find_by_pair(user_id, film_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "This film is already in your favorites".to_string(),
            ));
        }

        let count = self.favorite_repo.count_for_user(user_id).await?;
        if count >= MAX_FAVORITE_FILMS {
            return Err(AppError::BadRequest(format!(
                "You can keep at most {MAX_FAVORITE_FILMS} favorite films"
            )));
        }

        let model = user_favorite_film::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            film_id: Set(film_id.to_string()),
            position: Set(count as i32),
            created_at: Set(Utc::now().into()),
        };

        self.favorite_repo.create(model).await?;
        Ok(())
    }

    /// Remove a film from the caller's shelf, compacting positions.
    pub async fn remove_favorite(&self, user_id: &str, film_id: &str) -> AppResult<()> {
        let removed = self.favorite_repo.delete_by_pair(user_id, film_id).await?;
        if !removed {
            return Err(AppError::NotFound(
                "Film not found in your favorites".to_string(),
            ));
        }

        self.favorite_repo.compact_positions(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelhub_db::repositories::{FavoriteFilmRepository, FilmRepository};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service() -> FilmService {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );
        FilmService::new(
            FilmRepository::new(Arc::clone(&db)),
            FavoriteFilmRepository::new(db),
        )
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<i64> = PUBLIC_CATALOG.iter().map(|f| f.tmdb_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), PUBLIC_CATALOG.len());
    }

    #[test]
    fn test_search_catalog_is_case_insensitive() {
        let svc = service();
        let hits = svc.search_catalog("godfather");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tmdb_id, 238);
    }

    #[test]
    fn test_search_catalog_empty_query_returns_all() {
        let svc = service();
        assert_eq!(svc.search_catalog("  ").len(), PUBLIC_CATALOG.len());
    }

    #[test]
    fn test_catalog_entry_lookup() {
        let svc = service();
        assert!(svc.catalog_entry(550).is_some());
        assert!(svc.catalog_entry(999_999).is_none());
    }
}
