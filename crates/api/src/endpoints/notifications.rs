//! Notification endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use reelhub_common::AppResult;
use reelhub_db::entities::notification;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// A notification as served to clients.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub kind: notification::NotificationKind,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            title: n.title,
            message: n.message,
            link: n.link,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Notification listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: u64,
}

/// Read acknowledgment.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResponse {
    pub message: String,
}

/// List the caller's notifications, newest first.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<NotificationsResponse>> {
    let notifications = state.notification_service.list(&user.id).await?;
    let unread_count = state.notification_service.count_unread(&user.id).await?;

    Ok(ApiResponse::ok(NotificationsResponse {
        notifications: notifications.into_iter().map(Into::into).collect(),
        unread_count,
    }))
}

/// Mark one of the caller's notifications as read.
async fn mark_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
) -> AppResult<ApiResponse<ReadResponse>> {
    state
        .notification_service
        .mark_read(&user.id, &notification_id)
        .await?;

    Ok(ApiResponse::ok(ReadResponse {
        message: "Notification marked as read".to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}/read", post(mark_read))
}
