//! Review, like and reply endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use reelhub_common::AppResult;
use reelhub_core::review::{LikeStatus, ReplyView, UpsertReviewInput};
use reelhub_db::entities::review;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// A review as served to clients.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub user_id: String,
    pub film_id: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: String,
}

impl From<review::Model> for ReviewResponse {
    fn from(r: review::Model) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            film_id: r.film_id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Review submission body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertReviewRequest {
    pub rating: i16,
    pub comment: Option<String>,
}

/// Write or rewrite the caller's review of a catalog film.
///
/// The film is materialized from the catalog on first review.
async fn upsert_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tmdb_id): Path<i64>,
    Json(req): Json<UpsertReviewRequest>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let film = state.film_service.ensure_film(tmdb_id).await?;

    let input = UpsertReviewInput {
        rating: req.rating,
        comment: req.comment,
    };

    let review = state.review_service.upsert(&user.id, &film.id, input).await?;

    Ok(ApiResponse::ok(review.into()))
}

/// List the caller's reviews.
async fn my_reviews(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ReviewResponse>>> {
    let reviews = state.review_service.list_by_user(&user.id).await?;

    Ok(ApiResponse::ok(
        reviews.into_iter().map(Into::into).collect(),
    ))
}

/// Most recent commented reviews, for the home feed.
async fn recent_reviews(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ReviewResponse>>> {
    let reviews = state.review_service.list_recent(20).await?;

    Ok(ApiResponse::ok(
        reviews.into_iter().map(Into::into).collect(),
    ))
}

/// Toggle a like on a review.
async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> AppResult<ApiResponse<LikeStatus>> {
    let status = state.review_service.toggle_like(&user.id, &review_id).await?;

    Ok(ApiResponse::ok(status))
}

/// Like state of a review for the caller.
async fn like_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> AppResult<ApiResponse<LikeStatus>> {
    let status = state.review_service.like_status(&user.id, &review_id).await?;

    Ok(ApiResponse::ok(status))
}

/// Reply submission body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyRequest {
    pub message: String,
}

/// Attach a reply to a review.
async fn create_reply(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    Json(req): Json<CreateReplyRequest>,
) -> AppResult<(StatusCode, ApiResponse<ReplyView>)> {
    let reply = state
        .review_service
        .create_reply(&user.id, &review_id, &req.message)
        .await?;

    Ok(ApiResponse::created(reply))
}

/// Replies listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepliesResponse {
    pub replies: Vec<ReplyView>,
    pub total: usize,
}

/// List replies to a review in creation order.
async fn list_replies(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> AppResult<ApiResponse<RepliesResponse>> {
    let replies = state.review_service.list_replies(&review_id).await?;

    Ok(ApiResponse::ok(RepliesResponse {
        total: replies.len(),
        replies,
    }))
}

/// Deletion acknowledgment.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub message: String,
}

/// Delete a reply (author, or a site moderator/admin).
async fn delete_reply(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(reply_id): Path<String>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    state
        .review_service
        .delete_reply(&user.id, user.role, &reply_id)
        .await?;

    Ok(ApiResponse::ok(DeletedResponse {
        message: "Reply deleted".to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/films/{tmdb_id}/review", put(upsert_review))
        .route("/reviews/me", get(my_reviews))
        .route("/reviews/recent", get(recent_reviews))
        .route("/reviews/{id}/like", post(toggle_like))
        .route("/reviews/{id}/like-status", get(like_status))
        .route("/reviews/{id}/replies", get(list_replies).post(create_reply))
        .route("/replies/{id}", delete(delete_reply))
}
