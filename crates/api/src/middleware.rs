//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use reelhub_core::{
    AccountService, FilmService, FollowService, FriendService, GroupService, MessageService,
    ModerationService, NotificationService, ReviewService,
};

use crate::streaming::ChannelState;

/// Application state.
///
/// Built once at startup and injected into every handler; nothing in
/// here is a module-level singleton.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub friend_service: FriendService,
    pub follow_service: FollowService,
    pub group_service: GroupService,
    pub film_service: FilmService,
    pub review_service: ReviewService,
    pub moderation_service: ModerationService,
    pub message_service: MessageService,
    pub notification_service: NotificationService,
    pub channels: ChannelState,
}

/// Authentication middleware.
///
/// Resolves a bearer token to its user row and stores it in the
/// request extensions for the [`crate::extractors::AuthUser`]
/// extractor. Requests without a valid token pass through
/// unauthenticated; handlers that need a user reject them.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.account_service.authenticate_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
