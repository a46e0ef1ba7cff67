//! Friend repository: friend requests and friendships.

use std::sync::Arc;

use chrono::Utc;
use reelhub_common::{AppError, AppResult};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::friend_request::RequestStatus;
use crate::entities::friendship::canonical_pair;
use crate::entities::{FriendRequest, Friendship, friend_request, friendship};

/// Repository for friend request and friendship operations.
#[derive(Clone)]
pub struct FriendRepository {
    db: Arc<DatabaseConnection>,
}

impl FriendRepository {
    /// Create a new friend repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Friend Requests ====================

    /// Find a pending request between two users, in either direction.
    pub async fn find_pending_between(
        &self,
        a: &str,
        b: &str,
    ) -> AppResult<Option<friend_request::Model>> {
        FriendRequest::find()
            .filter(friend_request::Column::Status.eq(RequestStatus::Pending))
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(friend_request::Column::RequesterId.eq(a))
                            .add(friend_request::Column::ReceiverId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(friend_request::Column::RequesterId.eq(b))
                            .add(friend_request::Column::ReceiverId.eq(a)),
                    ),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the pending request from one specific user to another.
    pub async fn find_pending_from_to(
        &self,
        requester_id: &str,
        receiver_id: &str,
    ) -> AppResult<Option<friend_request::Model>> {
        FriendRequest::find()
            .filter(friend_request::Column::RequesterId.eq(requester_id))
            .filter(friend_request::Column::ReceiverId.eq(receiver_id))
            .filter(friend_request::Column::Status.eq(RequestStatus::Pending))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a friend request.
    pub async fn create_request(
        &self,
        model: friend_request::ActiveModel,
    ) -> AppResult<friend_request::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Flip a request to a resolved status.
    pub async fn update_request_status(
        &self,
        request: friend_request::Model,
        status: RequestStatus,
    ) -> AppResult<friend_request::Model> {
        let mut active: friend_request::ActiveModel = request.into();
        active.status = Set(status);
        active.updated_at = Set(Some(Utc::now().into()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List pending requests received by a user, newest first.
    pub async fn list_pending_received(
        &self,
        receiver_id: &str,
    ) -> AppResult<Vec<friend_request::Model>> {
        FriendRequest::find()
            .filter(friend_request::Column::ReceiverId.eq(receiver_id))
            .filter(friend_request::Column::Status.eq(RequestStatus::Pending))
            .order_by(friend_request::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Receiver ids of all pending requests sent by a user.
    pub async fn list_sent_pending_receiver_ids(
        &self,
        requester_id: &str,
    ) -> AppResult<Vec<String>> {
        let rows = FriendRequest::find()
            .filter(friend_request::Column::RequesterId.eq(requester_id))
            .filter(friend_request::Column::Status.eq(RequestStatus::Pending))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.receiver_id).collect())
    }

    // ==================== Friendships ====================

    /// Find the friendship row for a pair, in either orientation.
    pub async fn find_friendship(
        &self,
        a: &str,
        b: &str,
    ) -> AppResult<Option<friendship::Model>> {
        let (user1, user2) = canonical_pair(a, b);

        Friendship::find()
            .filter(friendship::Column::User1Id.eq(user1))
            .filter(friendship::Column::User2Id.eq(user2))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether two users are friends.
    pub async fn are_friends(&self, a: &str, b: &str) -> AppResult<bool> {
        Ok(self.find_friendship(a, b).await?.is_some())
    }

    /// Insert the canonical friendship row for a pair.
    ///
    /// Conflicts on the unique (user1, user2) index are ignored, so two
    /// concurrent accepts of the same request both succeed and exactly
    /// one row exists afterwards.
    pub async fn create_friendship(&self, id: String, a: &str, b: &str) -> AppResult<()> {
        let (user1, user2) = canonical_pair(a, b);

        let model = friendship::ActiveModel {
            id: Set(id),
            user1_id: Set(user1.to_string()),
            user2_id: Set(user2.to_string()),
            created_at: Set(Utc::now().into()),
        };

        Friendship::insert(model)
            .on_conflict(
                OnConflict::columns([friendship::Column::User1Id, friendship::Column::User2Id])
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// List friendships involving a user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<friendship::Model>> {
        Friendship::find()
            .filter(
                Condition::any()
                    .add(friendship::Column::User1Id.eq(user_id))
                    .add(friendship::Column::User2Id.eq(user_id)),
            )
            .order_by(friendship::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Ids of all friends of a user.
    pub async fn list_friend_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let rows = self.list_for_user(user_id).await?;
        Ok(rows
            .into_iter()
            .map(|f| f.other_party(user_id).to_string())
            .collect())
    }

    /// Count friendships involving a user.
    pub async fn count_for_user(&self, user_id: &str) -> AppResult<u64> {
        Friendship::find()
            .filter(
                Condition::any()
                    .add(friendship::Column::User1Id.eq(user_id))
                    .add(friendship::Column::User2Id.eq(user_id)),
            )
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_request(
        id: &str,
        requester: &str,
        receiver: &str,
        status: RequestStatus,
    ) -> friend_request::Model {
        friend_request::Model {
            id: id.to_string(),
            requester_id: requester.to_string(),
            receiver_id: receiver.to_string(),
            status,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_pending_between() {
        let request = create_test_request("fr1", "a", "b", RequestStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[request.clone()]])
                .into_connection(),
        );

        let repo = FriendRepository::new(db);
        let result = repo.find_pending_between("b", "a").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().requester_id, "a");
    }

    #[tokio::test]
    async fn test_list_friend_ids_projects_other_party() {
        let rows = vec![
            friendship::Model {
                id: "f1".to_string(),
                user1_id: "a".to_string(),
                user2_id: "b".to_string(),
                created_at: Utc::now().into(),
            },
            friendship::Model {
                id: "f2".to_string(),
                user1_id: "c".to_string(),
                user2_id: "a".to_string(),
                created_at: Utc::now().into(),
            },
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );

        let repo = FriendRepository::new(db);
        let ids = repo.list_friend_ids("a").await.unwrap();

        assert_eq!(ids, vec!["b".to_string(), "c".to_string()]);
    }
}
