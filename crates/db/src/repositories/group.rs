//! Group repository.

use std::sync::Arc;

use reelhub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::entities::group_invitation::InvitationStatus;
use crate::entities::{
    Group, GroupFilm, GroupInvitation, GroupMember, group, group_film, group_invitation,
    group_member,
};

/// Repository for group operations.
#[derive(Clone)]
pub struct GroupRepository {
    db: Arc<DatabaseConnection>,
}

impl GroupRepository {
    /// Create a new group repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get reference to the database connection.
    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    // ==================== Group Operations ====================

    /// Find group by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<group::Model>> {
        Group::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get group by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<group::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group not found: {id}")))
    }

    /// List groups visible to a user: public groups plus the ones they
    /// belong to, newest first.
    pub async fn find_visible_to(&self, user_id: &str) -> AppResult<Vec<group::Model>> {
        let joined_ids = self.list_group_ids_for_user(user_id).await?;

        let mut cond = Condition::any().add(group::Column::IsPublic.eq(true));
        if !joined_ids.is_empty() {
            cond = cond.add(group::Column::Id.is_in(joined_ids));
        }

        Group::find()
            .filter(cond)
            .order_by(group::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a group.
    pub async fn update(&self, model: group::ActiveModel) -> AppResult<group::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a group permanently. Memberships, invitations, films and
    /// messages go with it through the cascade rules.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Group::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    // ==================== Member Operations ====================

    /// Check if user is a member of a group.
    pub async fn is_member(&self, user_id: &str, group_id: &str) -> AppResult<bool> {
        Ok(self.get_member(user_id, group_id).await?.is_some())
    }

    /// Get member record.
    pub async fn get_member(
        &self,
        user_id: &str,
        group_id: &str,
    ) -> AppResult<Option<group_member::Model>> {
        GroupMember::find()
            .filter(group_member::Column::UserId.eq(user_id))
            .filter(group_member::Column::GroupId.eq(group_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add a member to a group.
    pub async fn add_member(
        &self,
        model: group_member::ActiveModel,
    ) -> AppResult<group_member::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a member from a group.
    pub async fn remove_member(&self, user_id: &str, group_id: &str) -> AppResult<()> {
        GroupMember::delete_many()
            .filter(group_member::Column::UserId.eq(user_id))
            .filter(group_member::Column::GroupId.eq(group_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// List members of a group, joined earliest first.
    pub async fn list_members(&self, group_id: &str) -> AppResult<Vec<group_member::Model>> {
        GroupMember::find()
            .filter(group_member::Column::GroupId.eq(group_id))
            .order_by(group_member::Column::JoinedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count members in a group.
    pub async fn count_members(&self, group_id: &str) -> AppResult<u64> {
        GroupMember::find()
            .filter(group_member::Column::GroupId.eq(group_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Ids of all groups a user belongs to.
    pub async fn list_group_ids_for_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        let memberships = GroupMember::find()
            .filter(group_member::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(memberships.into_iter().map(|m| m.group_id).collect())
    }

    /// List a user's memberships with their groups, newest group first.
    pub async fn find_joined_by_user(&self, user_id: &str) -> AppResult<Vec<group::Model>> {
        let group_ids = self.list_group_ids_for_user(user_id).await?;

        if group_ids.is_empty() {
            return Ok(vec![]);
        }

        Group::find()
            .filter(group::Column::Id.is_in(group_ids))
            .order_by(group::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count groups a user belongs to.
    pub async fn count_memberships_for_user(&self, user_id: &str) -> AppResult<u64> {
        GroupMember::find()
            .filter(group_member::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Invitation Operations ====================

    /// Create an invitation.
    pub async fn create_invitation(
        &self,
        model: group_invitation::ActiveModel,
    ) -> AppResult<group_invitation::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get pending invitation for a user to a group.
    pub async fn find_pending_invitation(
        &self,
        invitee_id: &str,
        group_id: &str,
    ) -> AppResult<Option<group_invitation::Model>> {
        GroupInvitation::find()
            .filter(group_invitation::Column::InviteeId.eq(invitee_id))
            .filter(group_invitation::Column::GroupId.eq(group_id))
            .filter(group_invitation::Column::Status.eq(InvitationStatus::Pending))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Film Operations ====================

    /// Check whether a film is already linked to a group.
    pub async fn film_linked(&self, group_id: &str, film_id: &str) -> AppResult<bool> {
        let count = GroupFilm::find()
            .filter(group_film::Column::GroupId.eq(group_id))
            .filter(group_film::Column::FilmId.eq(film_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Link a film to a group.
    pub async fn add_film(&self, model: group_film::ActiveModel) -> AppResult<group_film::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List films linked to a group, newest first.
    pub async fn list_films(&self, group_id: &str) -> AppResult<Vec<group_film::Model>> {
        GroupFilm::find()
            .filter(group_film::Column::GroupId.eq(group_id))
            .order_by(group_film::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count films linked to a group.
    pub async fn count_films(&self, group_id: &str) -> AppResult<u64> {
        GroupFilm::find()
            .filter(group_film::Column::GroupId.eq(group_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::group_member::GroupRole;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_group(id: &str, owner_id: &str, title: &str) -> group::Model {
        group::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            description: None,
            cover_url: None,
            theme: None,
            is_public: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let group = create_test_group("grp1", "user1", "Film Noir");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[group.clone()]])
                .into_connection(),
        );

        let repo = GroupRepository::new(db);
        let result = repo.find_by_id("grp1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().title, "Film Noir");
    }

    #[tokio::test]
    async fn test_get_member_role() {
        let member = group_member::Model {
            id: "gm1".to_string(),
            group_id: "grp1".to_string(),
            user_id: "user1".to_string(),
            role: GroupRole::Admin,
            joined_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[member]])
                .into_connection(),
        );

        let repo = GroupRepository::new(db);
        let result = repo.get_member("user1", "grp1").await.unwrap();

        assert_eq!(result.unwrap().role, GroupRole::Admin);
    }
}
