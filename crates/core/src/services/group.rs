//! Group service.

use chrono::Utc;
use reelhub_common::{AppError, AppResult, IdGenerator};
use reelhub_db::entities::group_invitation::{self, InvitationStatus};
use reelhub_db::entities::group_member::{self, GroupRole};
use reelhub_db::entities::{film, group, group_film, user};
use reelhub_db::repositories::{FilmRepository, GroupRepository, UserRepository};
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::notification::NotificationService;

/// Input for creating a group.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupInput {
    #[validate(length(min = 1, max = 128))]
    pub title: String,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    pub cover_url: Option<String>,
    #[validate(length(max = 64))]
    pub theme: Option<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

const fn default_true() -> bool {
    true
}

/// Input for updating a group.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupInput {
    #[validate(length(min = 1, max = 128))]
    pub title: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<Option<String>>,
    pub cover_url: Option<Option<String>>,
    #[validate(length(max = 64))]
    pub theme: Option<Option<String>>,
    pub is_public: Option<bool>,
}

/// A group with aggregate counts and the viewer's role.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub theme: Option<String>,
    pub is_public: bool,
    pub created_at: String,
    pub owner_pseudo: Option<String>,
    pub member_count: u64,
    pub film_count: u64,
    pub my_role: Option<GroupRole>,
}

/// A member with their public card.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub id: String,
    pub pseudo: String,
    pub avatar_url: Option<String>,
    pub role: GroupRole,
    pub joined_at: String,
}

/// A film in a group's collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFilmView {
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub added_by: Option<String>,
}

/// Full detail view of a group.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetail {
    pub group: GroupSummary,
    pub members: Vec<MemberView>,
    pub films: Vec<GroupFilmView>,
}

/// Group service for business logic.
#[derive(Clone)]
pub struct GroupService {
    group_repo: GroupRepository,
    user_repo: UserRepository,
    film_repo: FilmRepository,
    notification_service: NotificationService,
    id_gen: IdGenerator,
}

impl GroupService {
    /// Create a new group service.
    #[must_use]
    pub fn new(
        group_repo: GroupRepository,
        user_repo: UserRepository,
        film_repo: FilmRepository,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            group_repo,
            user_repo,
            film_repo,
            notification_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a group.
    ///
    /// The group row and the creator's admin membership are written in
    /// one transaction, so a group can never exist without its admin.
    pub async fn create(&self, user_id: &str, input: CreateGroupInput) -> AppResult<group::Model> {
        input.validate()?;

        let group_id = self.id_gen.generate();
        let now = Utc::now();

        let group_model = group::ActiveModel {
            id: Set(group_id.clone()),
            owner_id: Set(user_id.to_string()),
            title: Set(input.title),
            description: Set(input.description),
            cover_url: Set(input.cover_url),
            theme: Set(input.theme),
            is_public: Set(input.is_public),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let member_model = group_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id),
            user_id: Set(user_id.to_string()),
            role: Set(GroupRole::Admin),
            joined_at: Set(now.into()),
        };

        let txn = self
            .group_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = group_model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        member_model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// List groups visible to a user with counts and their role.
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<GroupSummary>> {
        let groups = self.group_repo.find_visible_to(user_id).await?;

        let mut out = Vec::with_capacity(groups.len());
        for group in groups {
            out.push(self.summarize(group, user_id).await?);
        }

        Ok(out)
    }

    /// Full detail view of a group, access-checked for private groups.
    pub async fn get_details(&self, group_id: &str, user_id: &str) -> AppResult<GroupDetail> {
        let group = self.group_repo.get_by_id(group_id).await?;
        let my_membership = self.group_repo.get_member(user_id, group_id).await?;

        if !group.is_public && my_membership.is_none() {
            return Err(AppError::Forbidden("This group is private".to_string()));
        }

        let member_rows = self.group_repo.list_members(group_id).await?;
        let member_ids: Vec<String> = member_rows.iter().map(|m| m.user_id.clone()).collect();
        let users = self.user_repo.find_by_ids(&member_ids).await?;

        let mut members: Vec<MemberView> = member_rows
            .iter()
            .filter_map(|m| {
                let user = users.iter().find(|u| u.id == m.user_id)?;
                Some(MemberView {
                    id: user.id.clone(),
                    pseudo: user.pseudo.clone(),
                    avatar_url: user.avatar_url.clone(),
                    role: m.role,
                    joined_at: m.joined_at.to_rfc3339(),
                })
            })
            .collect();
        // Admins first, then moderators, then members by join date
        members.sort_by_key(|m| (role_rank(m.role), m.joined_at.clone()));

        let films = self.film_views(group_id).await?;
        let summary = self.summarize(group, user_id).await?;

        Ok(GroupDetail {
            group: summary,
            members,
            films,
        })
    }

    /// Update a group. Requires the admin or moderator role.
    pub async fn update(
        &self,
        group_id: &str,
        user_id: &str,
        input: UpdateGroupInput,
    ) -> AppResult<group::Model> {
        input.validate()?;
        self.require_manage_role(group_id, user_id).await?;

        let group = self.group_repo.get_by_id(group_id).await?;
        let mut active: group::ActiveModel = group.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(cover_url) = input.cover_url {
            active.cover_url = Set(cover_url);
        }
        if let Some(theme) = input.theme {
            active.theme = Set(theme);
        }
        if let Some(is_public) = input.is_public {
            active.is_public = Set(is_public);
        }

        active.updated_at = Set(Some(Utc::now().into()));
        self.group_repo.update(active).await
    }

    /// Delete a group. Strictly admin-role members.
    pub async fn delete(&self, group_id: &str, user_id: &str) -> AppResult<()> {
        self.group_repo.get_by_id(group_id).await?;

        let member = self
            .group_repo
            .get_member(user_id, group_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("You must be the group admin to delete it".to_string())
            })?;

        if !member.role.is_admin() {
            return Err(AppError::Forbidden(
                "You must be the group admin to delete it".to_string(),
            ));
        }

        self.group_repo.delete(group_id).await
    }

    /// Join a public group.
    pub async fn join(&self, user_id: &str, group_id: &str) -> AppResult<group_member::Model> {
        let group = self.group_repo.get_by_id(group_id).await?;

        if !group.is_public {
            return Err(AppError::Forbidden(
                "This group is private. You need an invitation to join".to_string(),
            ));
        }

        if self.group_repo.is_member(user_id, group_id).await? {
            return Err(AppError::Conflict(
                "You are already a member of this group".to_string(),
            ));
        }

        let model = group_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            user_id: Set(user_id.to_string()),
            role: Set(GroupRole::Member),
            joined_at: Set(Utc::now().into()),
        };

        self.group_repo.add_member(model).await
    }

    /// Leave a group. Admins cannot leave; deleting the group is the
    /// way out for them.
    pub async fn leave(&self, user_id: &str, group_id: &str) -> AppResult<()> {
        let member = self
            .group_repo
            .get_member(user_id, group_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("You are not a member of this group".to_string())
            })?;

        if member.role.is_admin() {
            return Err(AppError::Forbidden(
                "The admin cannot leave the group. Delete it instead".to_string(),
            ));
        }

        self.group_repo.remove_member(user_id, group_id).await
    }

    /// Invite a user, looked up by email. Requires admin or moderator.
    /// Emits a notification to the invitee.
    pub async fn invite(
        &self,
        group_id: &str,
        inviter_id: &str,
        invitee_email: &str,
    ) -> AppResult<group_invitation::Model> {
        self.require_manage_role(group_id, inviter_id).await?;

        let invitee = self
            .user_repo
            .find_by_email(invitee_email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if self.group_repo.is_member(&invitee.id, group_id).await? {
            return Err(AppError::Conflict(
                "This user is already a member of the group".to_string(),
            ));
        }

        if self
            .group_repo
            .find_pending_invitation(&invitee.id, group_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "This user already has a pending invitation".to_string(),
            ));
        }

        let model = group_invitation::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            inviter_id: Set(inviter_id.to_string()),
            invitee_id: Set(invitee.id.clone()),
            status: Set(InvitationStatus::Pending),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let invitation = self.group_repo.create_invitation(model).await?;

        // Best effort: a lost notification does not undo the invitation
        if let Err(e) = self
            .notification_service
            .notify_group_invitation(&invitee.id, group_id)
            .await
        {
            tracing::warn!(error = %e, "Failed to create invitation notification");
        }

        Ok(invitation)
    }

    /// Add a film to the group's collection. Any member may do this.
    pub async fn add_film(
        &self,
        group_id: &str,
        user_id: &str,
        film_id: &str,
    ) -> AppResult<group_film::Model> {
        self.group_repo.get_by_id(group_id).await?;

        if !self.group_repo.is_member(user_id, group_id).await? {
            return Err(AppError::Forbidden(
                "You must be a member of the group to add a film".to_string(),
            ));
        }

        self.film_repo.get_by_id(film_id).await?;

        if self.group_repo.film_linked(group_id, film_id).await? {
            return Err(AppError::Conflict(
                "This film is already in the group".to_string(),
            ));
        }

        let model = group_film::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            film_id: Set(film_id.to_string()),
            added_by: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        self.group_repo.add_film(model).await
    }

    /// List groups a user belongs to, with counts and roles.
    pub async fn list_joined(&self, user_id: &str) -> AppResult<Vec<GroupSummary>> {
        let groups = self.group_repo.find_joined_by_user(user_id).await?;

        let mut out = Vec::with_capacity(groups.len());
        for group in groups {
            out.push(self.summarize(group, user_id).await?);
        }

        Ok(out)
    }

    /// Whether a user may read a group's messages.
    pub async fn can_view_messages(&self, group_id: &str, user_id: &str) -> AppResult<bool> {
        let group = self.group_repo.get_by_id(group_id).await?;
        if group.is_public {
            return Ok(true);
        }
        self.group_repo.is_member(user_id, group_id).await
    }

    // ==================== Helpers ====================

    async fn summarize(&self, group: group::Model, viewer_id: &str) -> AppResult<GroupSummary> {
        let member_count = self.group_repo.count_members(&group.id).await?;
        let film_count = self.group_repo.count_films(&group.id).await?;
        let my_role = self
            .group_repo
            .get_member(viewer_id, &group.id)
            .await?
            .map(|m| m.role);
        let owner = self.user_repo.find_by_id(&group.owner_id).await?;

        Ok(GroupSummary {
            id: group.id,
            title: group.title,
            description: group.description,
            cover_url: group.cover_url,
            theme: group.theme,
            is_public: group.is_public,
            created_at: group.created_at.to_rfc3339(),
            owner_pseudo: owner.map(|u: user::Model| u.pseudo),
            member_count,
            film_count,
            my_role,
        })
    }

    async fn film_views(&self, group_id: &str) -> AppResult<Vec<GroupFilmView>> {
        let links = self.group_repo.list_films(group_id).await?;

        let film_ids: Vec<String> = links.iter().map(|l| l.film_id.clone()).collect();
        let films = self.film_repo.find_by_ids(&film_ids).await?;

        let adder_ids: Vec<String> = links.iter().map(|l| l.added_by.clone()).collect();
        let adders = self.user_repo.find_by_ids(&adder_ids).await?;

        Ok(links
            .iter()
            .filter_map(|link| {
                let film: &film::Model = films.iter().find(|f| f.id == link.film_id)?;
                let added_by = adders
                    .iter()
                    .find(|u| u.id == link.added_by)
                    .map(|u| u.pseudo.clone());
                Some(GroupFilmView {
                    id: film.id.clone(),
                    title: film.title.clone(),
                    poster_url: film.poster_url.clone(),
                    release_date: film.release_date.clone(),
                    added_by,
                })
            })
            .collect())
    }

    /// Check the actor holds the admin or moderator role in the group.
    async fn require_manage_role(&self, group_id: &str, user_id: &str) -> AppResult<()> {
        let member = self
            .group_repo
            .get_member(user_id, group_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("You are not a member of this group".to_string())
            })?;

        if !member.role.can_manage() {
            return Err(AppError::Forbidden(
                "You must be admin or moderator of this group".to_string(),
            ));
        }

        Ok(())
    }
}

/// Sort key placing admins before moderators before members.
const fn role_rank(role: GroupRole) -> u8 {
    match role {
        GroupRole::Admin => 0,
        GroupRole::Moderator => 1,
        GroupRole::Member => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_rank_orders_admin_first() {
        assert!(role_rank(GroupRole::Admin) < role_rank(GroupRole::Moderator));
        assert!(role_rank(GroupRole::Moderator) < role_rank(GroupRole::Member));
    }

    #[test]
    fn test_manage_roles() {
        assert!(GroupRole::Admin.can_manage());
        assert!(GroupRole::Moderator.can_manage());
        assert!(!GroupRole::Member.can_manage());
    }
}
