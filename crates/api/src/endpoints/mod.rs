//! API endpoints.

mod auth;
mod films;
mod groups;
mod moderation;
mod notifications;
mod reviews;
mod users;

use axum::{Json, Router, routing::get};
use serde_json::json;

use crate::middleware::AppState;

/// Health check.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .merge(films::router())
        .merge(reviews::router())
        .nest("/groups", groups::router())
        .nest("/moderation", moderation::router())
        .nest("/notifications", notifications::router())
}
