//! User, social graph and discovery endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use reelhub_common::AppResult;
use reelhub_core::account::{ProfileStats, UpdateProfileInput};
use reelhub_core::friend::{DiscoveredProfile, FriendEntry, ReceivedRequest};
use reelhub_core::group::GroupSummary;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

use super::auth::UserResponse;

// ==================== Request/Response Types ====================

/// Discovery query parameters.
#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    pub search: Option<String>,
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

/// Discovery page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverResponse {
    pub profiles: Vec<DiscoveredProfile>,
    pub total: usize,
    pub limit: Option<u64>,
    pub offset: u64,
}

/// Friend listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendsResponse {
    pub friends: Vec<FriendEntry>,
    pub total: usize,
}

/// Received pending friend requests.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestsResponse {
    pub requests: Vec<ReceivedRequest>,
    pub total: usize,
}

/// A simple message acknowledgment.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Follow state acknowledgment.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub message: String,
    pub is_following: bool,
}

/// Full profile page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub stats: ProfileStats,
    pub favorite_films: Vec<ProfileFilm>,
    pub recent_reviews: Vec<ProfileReview>,
    pub is_following: bool,
}

/// A film on the profile shelf.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFilm {
    pub id: String,
    pub tmdb_id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub average_rating: f64,
}

/// A recent review on the profile.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileReview {
    pub id: String,
    pub film_id: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: String,
}

// ==================== Handlers ====================

/// Browse profiles available to befriend.
async fn discover(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<DiscoverQuery>,
) -> AppResult<ApiResponse<DiscoverResponse>> {
    let profiles = state
        .friend_service
        .discover(&user.id, query.search.as_deref(), query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(DiscoverResponse {
        total: profiles.len(),
        profiles,
        limit: query.limit,
        offset: query.offset,
    }))
}

/// List the caller's friends.
async fn friends(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<FriendsResponse>> {
    let friends = state.friend_service.list_friends(&user.id).await?;

    Ok(ApiResponse::ok(FriendsResponse {
        total: friends.len(),
        friends,
    }))
}

/// List pending friend requests received by the caller.
async fn friend_requests(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<FriendRequestsResponse>> {
    let requests = state.friend_service.list_received_requests(&user.id).await?;

    Ok(ApiResponse::ok(FriendRequestsResponse {
        total: requests.len(),
        requests,
    }))
}

/// Send a friend request.
async fn send_friend_request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(target_id): Path<String>,
) -> AppResult<(StatusCode, ApiResponse<MessageResponse>)> {
    state.friend_service.send_request(&user.id, &target_id).await?;

    Ok(ApiResponse::created(MessageResponse::new(
        "Friend request sent",
    )))
}

/// Accept a friend request from the user in the path.
async fn accept_friend_request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(requester_id): Path<String>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state
        .friend_service
        .accept_request(&user.id, &requester_id)
        .await?;

    Ok(ApiResponse::ok(MessageResponse::new(
        "Friend request accepted",
    )))
}

/// Reject a friend request from the user in the path.
async fn reject_friend_request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(requester_id): Path<String>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state
        .friend_service
        .reject_request(&user.id, &requester_id)
        .await?;

    Ok(ApiResponse::ok(MessageResponse::new(
        "Friend request rejected",
    )))
}

/// Follow a user.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(target_id): Path<String>,
) -> AppResult<ApiResponse<FollowResponse>> {
    state.follow_service.follow(&user.id, &target_id).await?;

    Ok(ApiResponse::ok(FollowResponse {
        message: "Now following".to_string(),
        is_following: true,
    }))
}

/// Unfollow a user.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(target_id): Path<String>,
) -> AppResult<ApiResponse<FollowResponse>> {
    state.follow_service.unfollow(&user.id, &target_id).await?;

    Ok(ApiResponse::ok(FollowResponse {
        message: "No longer following".to_string(),
        is_following: false,
    }))
}

/// Fetch a profile. `me` resolves to the caller.
async fn get_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let target_id = if user_id == "me" { user.id.clone() } else { user_id };

    let view = state
        .account_service
        .get_profile(&target_id, Some(&user.id))
        .await?;

    // Email only shows on the owner's own profile
    let user_response = if view.user.id == user.id {
        UserResponse::for_owner(&view.user)
    } else {
        UserResponse::public(&view.user)
    };

    Ok(ApiResponse::ok(ProfileResponse {
        user: user_response,
        stats: view.stats,
        favorite_films: view
            .favorite_films
            .iter()
            .map(|f| ProfileFilm {
                id: f.id.clone(),
                tmdb_id: f.tmdb_id,
                title: f.title.clone(),
                poster_url: f.poster_url.clone(),
                release_date: f.release_date.clone(),
                average_rating: f.average_rating,
            })
            .collect(),
        recent_reviews: view
            .recent_reviews
            .iter()
            .map(|r| ProfileReview {
                id: r.id.clone(),
                film_id: r.film_id.clone(),
                rating: r.rating,
                comment: r.comment.clone(),
                created_at: r.created_at.to_rfc3339(),
            })
            .collect(),
        is_following: view.is_following,
    }))
}

/// Update profile request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub pseudo: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub favorite_genres: Option<Vec<String>>,
}

/// Update the caller's profile.
async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let input = UpdateProfileInput {
        pseudo: req.pseudo,
        bio: req.bio,
        avatar_url: req.avatar_url,
        favorite_genres: req.favorite_genres,
    };

    let updated = state.account_service.update_profile(&user.id, input).await?;

    Ok(ApiResponse::ok(UserResponse::for_owner(&updated)))
}

/// Groups a user belongs to.
async fn user_groups(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<GroupSummary>>> {
    let groups = state.group_service.list_joined(&user_id).await?;

    Ok(ApiResponse::ok(groups))
}

/// Add a film to the caller's favorite shelf.
async fn add_favorite_film(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(film_id): Path<String>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state.film_service.add_favorite(&user.id, &film_id).await?;

    Ok(ApiResponse::ok(MessageResponse::new(
        "Film added to favorites",
    )))
}

/// Remove a film from the caller's favorite shelf.
async fn remove_favorite_film(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(film_id): Path<String>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state.film_service.remove_favorite(&user.id, &film_id).await?;

    Ok(ApiResponse::ok(MessageResponse::new(
        "Film removed from favorites",
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        // Discovery and social graph
        .route("/discover", get(discover))
        .route("/friends", get(friends))
        .route("/friend-requests", get(friend_requests))
        .route("/{id}/friend-request", post(send_friend_request))
        .route("/{id}/friend-request/accept", post(accept_friend_request))
        .route("/{id}/friend-request/reject", post(reject_friend_request))
        // Follows
        .route("/{id}/follow", post(follow).delete(unfollow))
        // Profiles
        .route("/me", put(update_profile))
        .route("/{id}", get(get_profile))
        .route("/{id}/groups", get(user_groups))
        // Favorite shelf
        .route(
            "/me/favorite-films/{film_id}",
            post(add_favorite_film).delete(remove_favorite_film),
        )
}
