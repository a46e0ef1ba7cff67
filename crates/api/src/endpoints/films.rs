//! Film catalog endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use reelhub_common::AppResult;
use reelhub_core::catalog::CatalogFilm;
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// A film as served to clients: catalog data plus the local average
/// rating once the film has been reviewed here.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmResponse {
    pub tmdb_id: i64,
    pub title: String,
    pub original_title: String,
    pub synopsis: String,
    pub release_date: String,
    pub runtime_minutes: Option<i32>,
    pub poster_url: String,
    pub catalog_rating: f64,
    pub votes_count: i64,
    pub genres: Vec<String>,
    pub director: String,
    pub cast: Vec<String>,
    /// Local id, present once the film has been materialized.
    pub local_id: Option<String>,
    /// Average of local reviews, if any exist.
    pub local_average_rating: Option<f64>,
}

impl FilmResponse {
    fn from_catalog(entry: &CatalogFilm) -> Self {
        Self {
            tmdb_id: entry.tmdb_id,
            title: entry.title.to_string(),
            original_title: entry.original_title.to_string(),
            synopsis: entry.synopsis.to_string(),
            release_date: entry.release_date.to_string(),
            runtime_minutes: entry.runtime_minutes,
            poster_url: entry.poster_url.to_string(),
            catalog_rating: entry.rating,
            votes_count: entry.votes,
            genres: entry.genres.iter().map(ToString::to_string).collect(),
            director: entry.director.to_string(),
            cast: entry.cast.iter().map(ToString::to_string).collect(),
            local_id: None,
            local_average_rating: None,
        }
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

/// Latest catalog films.
async fn latest(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<FilmResponse>>> {
    let mut films: Vec<FilmResponse> = state
        .film_service
        .catalog()
        .iter()
        .map(FilmResponse::from_catalog)
        .collect();

    for film in &mut films {
        if let Some(local) = state.film_service.get_by_tmdb_id(film.tmdb_id).await? {
            film.local_id = Some(local.id);
            film.local_average_rating = Some(local.average_rating);
        }
    }

    Ok(ApiResponse::ok(films))
}

/// Search the catalog by title.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<ApiResponse<Vec<FilmResponse>>> {
    let films = state
        .film_service
        .search_catalog(&query.query)
        .into_iter()
        .map(FilmResponse::from_catalog)
        .collect();

    Ok(ApiResponse::ok(films))
}

/// Fetch one film by catalog id.
async fn show(
    State(state): State<AppState>,
    Path(tmdb_id): Path<i64>,
) -> AppResult<ApiResponse<FilmResponse>> {
    let entry = state
        .film_service
        .catalog_entry(tmdb_id)
        .ok_or_else(|| {
            reelhub_common::AppError::NotFound(format!("Film not found: {tmdb_id}"))
        })?;

    let mut film = FilmResponse::from_catalog(entry);
    if let Some(local) = state.film_service.get_by_tmdb_id(tmdb_id).await? {
        film.local_id = Some(local.id);
        film.local_average_rating = Some(local.average_rating);
    }

    Ok(ApiResponse::ok(film))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/films/latest", get(latest))
        .route("/films/search", get(search))
        .route("/films/{tmdb_id}", get(show))
}
