//! Group endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use reelhub_common::AppResult;
use reelhub_core::group::{CreateGroupInput, GroupDetail, GroupSummary, UpdateGroupInput};
use reelhub_core::message::MessageView;
use reelhub_db::entities::group;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

// ==================== Request/Response Types ====================

/// A freshly created or updated group.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub theme: Option<String>,
    pub is_public: bool,
    pub created_at: String,
}

impl From<group::Model> for GroupResponse {
    fn from(g: group::Model) -> Self {
        Self {
            id: g.id,
            owner_id: g.owner_id,
            title: g.title,
            description: g.description,
            cover_url: g.cover_url,
            theme: g.theme,
            is_public: g.is_public,
            created_at: g.created_at.to_rfc3339(),
        }
    }
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

/// Invitation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub invite_email: String,
}

/// Add film request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFilmRequest {
    pub film_id: String,
}

/// Chat message request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub message: String,
}

/// Group message history.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    pub messages: Vec<MessageView>,
}

// ==================== Handlers ====================

/// Create a group. The creator becomes its admin member.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateGroupInput>,
) -> AppResult<(StatusCode, ApiResponse<GroupResponse>)> {
    let group = state.group_service.create(&user.id, input).await?;

    Ok(ApiResponse::created(group.into()))
}

/// List groups visible to the caller.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<GroupSummary>>> {
    let groups = state.group_service.list(&user.id).await?;

    Ok(ApiResponse::ok(groups))
}

/// Full detail view of a group.
async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> AppResult<ApiResponse<GroupDetail>> {
    let detail = state.group_service.get_details(&group_id, &user.id).await?;

    Ok(ApiResponse::ok(detail))
}

/// Update a group (admin or moderator role).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(input): Json<UpdateGroupInput>,
) -> AppResult<ApiResponse<GroupResponse>> {
    let group = state.group_service.update(&group_id, &user.id, input).await?;

    Ok(ApiResponse::ok(group.into()))
}

/// Delete a group (admin role).
async fn delete_group(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state.group_service.delete(&group_id, &user.id).await?;

    Ok(ApiResponse::ok(MessageResponse::new("Group deleted")))
}

/// Join a public group.
async fn join(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state.group_service.join(&user.id, &group_id).await?;

    Ok(ApiResponse::ok(MessageResponse::new(
        "You have joined the group",
    )))
}

/// Leave a group.
async fn leave(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state.group_service.leave(&user.id, &group_id).await?;

    Ok(ApiResponse::ok(MessageResponse::new(
        "You have left the group",
    )))
}

/// Invite a user by email (admin or moderator role).
async fn invite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(req): Json<InviteRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state
        .group_service
        .invite(&group_id, &user.id, &req.invite_email)
        .await?;

    Ok(ApiResponse::ok(MessageResponse::new("Invitation sent")))
}

/// Add a film to the group's collection (any member).
async fn add_film(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(req): Json<AddFilmRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    state
        .group_service
        .add_film(&group_id, &user.id, &req.film_id)
        .await?;

    Ok(ApiResponse::ok(MessageResponse::new(
        "Film added to the group",
    )))
}

/// Full chat history of a group.
async fn list_messages(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> AppResult<ApiResponse<MessagesResponse>> {
    let messages = state.message_service.list(&group_id, &user.id).await?;

    Ok(ApiResponse::ok(MessagesResponse { messages }))
}

/// Post a chat message. Persists first, then fans out to the group's
/// channel subscribers.
async fn post_message(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(req): Json<PostMessageRequest>,
) -> AppResult<(StatusCode, ApiResponse<MessageView>)> {
    let message = state
        .message_service
        .post(&group_id, &user.id, &req.message)
        .await?;

    Ok(ApiResponse::created(message))
}

pub fn router() -> Router<AppState> {
    Router::new()
        // Group CRUD
        .route("/", post(create).get(list))
        .route("/{id}", get(show).put(update).delete(delete_group))
        // Membership
        .route("/{id}/join", post(join))
        .route("/{id}/leave", post(leave))
        .route("/{id}/invite", post(invite))
        // Collection
        .route("/{id}/films", post(add_film))
        // Chat
        .route("/{id}/messages", get(list_messages).post(post_message))
}
