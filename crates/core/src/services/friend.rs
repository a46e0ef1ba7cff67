//! Friend service: requests, friendships and profile discovery.

use chrono::Utc;
use reelhub_common::{AppError, AppResult, IdGenerator};
use reelhub_db::{
    entities::friend_request::{self, RequestStatus},
    entities::user,
    repositories::{
        FollowRepository, FriendRepository, GroupRepository, ReviewRepository, UserRepository,
    },
};
use sea_orm::Set;
use serde::Serialize;

/// Default page size for discovery.
const DEFAULT_DISCOVER_LIMIT: u64 = 20;

/// Maximum page size for discovery.
const MAX_DISCOVER_LIMIT: u64 = 100;

/// Friend-request status relative to a viewer, as shown in discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendStatus {
    /// No relationship and no pending request.
    None,
    /// The profile has sent the viewer a pending request; the viewer
    /// can accept or reject it.
    CanAccept,
}

/// A discovered profile with aggregate counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredProfile {
    pub id: String,
    pub pseudo: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
    pub review_count: u64,
    pub group_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
    pub friend_status: FriendStatus,
    /// Set when `friend_status` is `can_accept`: the id of the pending
    /// request the viewer may act on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_request_id: Option<String>,
}

/// A pending friend request with the requester's card.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedRequest {
    pub id: String,
    pub requester: UserCard,
    pub created_at: String,
}

/// A friend with the date the friendship was formed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendEntry {
    #[serde(flatten)]
    pub user: UserCard,
    pub friendship_date: String,
}

/// Minimal public projection of a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    pub id: String,
    pub pseudo: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

impl From<user::Model> for UserCard {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            pseudo: u.pseudo,
            avatar_url: u.avatar_url,
            bio: u.bio,
        }
    }
}

/// Friend service for business logic.
#[derive(Clone)]
pub struct FriendService {
    friend_repo: FriendRepository,
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    review_repo: ReviewRepository,
    group_repo: GroupRepository,
    id_gen: IdGenerator,
}

impl FriendService {
    /// Create a new friend service.
    #[must_use]
    pub fn new(
        friend_repo: FriendRepository,
        follow_repo: FollowRepository,
        user_repo: UserRepository,
        review_repo: ReviewRepository,
        group_repo: GroupRepository,
    ) -> Self {
        Self {
            friend_repo,
            follow_repo,
            user_repo,
            review_repo,
            group_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Send a friend request.
    pub async fn send_request(&self, requester_id: &str, target_id: &str) -> AppResult<()> {
        if requester_id == target_id {
            return Err(AppError::BadRequest(
                "Cannot send a friend request to yourself".to_string(),
            ));
        }

        // Target must exist
        self.user_repo.get_by_id(target_id).await?;

        if self.friend_repo.are_friends(requester_id, target_id).await? {
            return Err(AppError::Conflict(
                "You are already friends with this user".to_string(),
            ));
        }

        // A pending request in either direction blocks a new one; the
        // message differs by direction so the client can explain why.
        if let Some(pending) = self
            .friend_repo
            .find_pending_between(requester_id, target_id)
            .await?
        {
            let message = if pending.requester_id == requester_id {
                "You already sent a friend request to this user"
            } else {
                "This user already sent you a friend request"
            };
            return Err(AppError::Conflict(message.to_string()));
        }

        let model = friend_request::ActiveModel {
            id: Set(self.id_gen.generate()),
            requester_id: Set(requester_id.to_string()),
            receiver_id: Set(target_id.to_string()),
            status: Set(RequestStatus::Pending),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.friend_repo.create_request(model).await?;
        Ok(())
    }

    /// Accept a pending friend request from `requester_id`.
    ///
    /// Flips the request to accepted and inserts the canonical
    /// friendship row. The insert ignores conflicts on the pair, so a
    /// concurrent double-accept cannot produce a duplicate-key failure.
    pub async fn accept_request(&self, receiver_id: &str, requester_id: &str) -> AppResult<()> {
        let request = self
            .friend_repo
            .find_pending_from_to(requester_id, receiver_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Friend request not found or already handled".to_string())
            })?;

        self.friend_repo
            .update_request_status(request, RequestStatus::Accepted)
            .await?;

        self.friend_repo
            .create_friendship(self.id_gen.generate(), requester_id, receiver_id)
            .await?;

        Ok(())
    }

    /// Reject a pending friend request from `requester_id`.
    pub async fn reject_request(&self, receiver_id: &str, requester_id: &str) -> AppResult<()> {
        let request = self
            .friend_repo
            .find_pending_from_to(requester_id, receiver_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Friend request not found or already handled".to_string())
            })?;

        self.friend_repo
            .update_request_status(request, RequestStatus::Rejected)
            .await?;

        Ok(())
    }

    /// List pending requests received by a user.
    pub async fn list_received_requests(&self, user_id: &str) -> AppResult<Vec<ReceivedRequest>> {
        let requests = self.friend_repo.list_pending_received(user_id).await?;

        let requester_ids: Vec<String> =
            requests.iter().map(|r| r.requester_id.clone()).collect();
        let requesters = self.user_repo.find_by_ids(&requester_ids).await?;

        let mut out = Vec::with_capacity(requests.len());
        for request in requests {
            let Some(requester) = requesters.iter().find(|u| u.id == request.requester_id) else {
                continue;
            };
            out.push(ReceivedRequest {
                id: request.id,
                requester: requester.clone().into(),
                created_at: request.created_at.to_rfc3339(),
            });
        }

        Ok(out)
    }

    /// List a user's friends, projected viewer-relative.
    pub async fn list_friends(&self, user_id: &str) -> AppResult<Vec<FriendEntry>> {
        let friendships = self.friend_repo.list_for_user(user_id).await?;

        let friend_ids: Vec<String> = friendships
            .iter()
            .map(|f| f.other_party(user_id).to_string())
            .collect();
        let friends = self.user_repo.find_by_ids(&friend_ids).await?;

        let mut out = Vec::with_capacity(friendships.len());
        for friendship in friendships {
            let other = friendship.other_party(user_id);
            let Some(friend) = friends.iter().find(|u| u.id == other) else {
                continue;
            };
            out.push(FriendEntry {
                user: friend.clone().into(),
                friendship_date: friendship.created_at.to_rfc3339(),
            });
        }

        Ok(out)
    }

    /// Browse profiles the viewer could befriend.
    ///
    /// Excludes the viewer, existing friends and users the viewer has an
    /// outstanding sent request to. Users who sent the viewer a pending
    /// request are included and flagged `can_accept` so they surface as
    /// actionable items.
    pub async fn discover(
        &self,
        viewer_id: &str,
        search: Option<&str>,
        limit: Option<u64>,
        offset: u64,
    ) -> AppResult<Vec<DiscoveredProfile>> {
        let limit = limit
            .unwrap_or(DEFAULT_DISCOVER_LIMIT)
            .min(MAX_DISCOVER_LIMIT);

        let mut exclude = self.friend_repo.list_friend_ids(viewer_id).await?;
        exclude.extend(
            self.friend_repo
                .list_sent_pending_receiver_ids(viewer_id)
                .await?,
        );

        let users = self
            .user_repo
            .find_discoverable(viewer_id, &exclude, search, limit, offset)
            .await?;

        let mut profiles = Vec::with_capacity(users.len());
        for user in users {
            let received = self
                .friend_repo
                .find_pending_from_to(&user.id, viewer_id)
                .await?;

            let (friend_status, received_request_id) = match received {
                Some(request) => (FriendStatus::CanAccept, Some(request.id)),
                None => (FriendStatus::None, None),
            };

            profiles.push(DiscoveredProfile {
                review_count: self.review_repo.count_by_user(&user.id).await?,
                group_count: self.group_repo.count_memberships_for_user(&user.id).await?,
                followers_count: self.follow_repo.count_followers(&user.id).await?,
                following_count: self.follow_repo.count_following(&user.id).await?,
                id: user.id,
                pseudo: user.pseudo,
                avatar_url: user.avatar_url,
                bio: user.bio,
                created_at: user.created_at.to_rfc3339(),
                friend_status,
                received_request_id,
            });
        }

        Ok(profiles)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reelhub_db::entities::friendship::canonical_pair;

    #[test]
    fn test_canonical_pair_is_order_independent() {
        // The accept path stores min/max regardless of who initiated.
        let from_a = canonical_pair("01aaa", "01bbb");
        let from_b = canonical_pair("01bbb", "01aaa");
        assert_eq!(from_a, from_b);
        assert!(from_a.0 < from_a.1);
    }

    #[test]
    fn test_friend_status_serializes_snake_case() {
        let json = serde_json::to_string(&FriendStatus::CanAccept).unwrap();
        assert_eq!(json, "\"can_accept\"");
        let json = serde_json::to_string(&FriendStatus::None).unwrap();
        assert_eq!(json, "\"none\"");
    }
}
