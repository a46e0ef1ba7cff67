//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Site-wide role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular member.
    #[sea_orm(string_value = "member")]
    Member,
    /// Site moderator.
    #[sea_orm(string_value = "moderator")]
    Moderator,
    /// Site administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Member
    }
}

impl UserRole {
    /// Check if the role grants access to the moderation back office.
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if the role can remove other users' content.
    #[must_use]
    pub fn can_moderate(self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Login email.
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 password hash.
    pub password_hash: String,

    /// Public display name.
    #[sea_orm(unique)]
    pub pseudo: String,

    /// Avatar URL.
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Profile description.
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    /// Preferred film genres, stored as a JSON array of strings.
    /// Parsed defensively at the boundary; malformed values read as empty.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub favorite_genres: Option<Json>,

    /// Site-wide role.
    pub role: UserRole,

    /// SHA-256 of the outstanding password-reset token, if any.
    #[sea_orm(nullable)]
    pub reset_password_hash: Option<String>,

    /// Expiry of the outstanding password-reset token.
    #[sea_orm(nullable)]
    pub reset_password_expires: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::group_member::Entity")]
    Memberships,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::group_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parse the favorite genres column into a typed list.
    ///
    /// Malformed or missing JSON reads as an empty list.
    #[must_use]
    pub fn favorite_genres_list(&self) -> Vec<String> {
        self.favorite_genres
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_genres(genres: Option<Json>) -> Model {
        Model {
            id: "u1".to_string(),
            email: "a@example.com".to_string(),
            password_hash: String::new(),
            pseudo: "a".to_string(),
            avatar_url: None,
            bio: None,
            favorite_genres: genres,
            role: UserRole::Member,
            reset_password_hash: None,
            reset_password_expires: None,
            created_at: chrono::Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_favorite_genres_parses_list() {
        let user = user_with_genres(Some(serde_json::json!(["drama", "thriller"])));
        assert_eq!(user.favorite_genres_list(), vec!["drama", "thriller"]);
    }

    #[test]
    fn test_favorite_genres_defaults_empty_on_malformed() {
        let user = user_with_genres(Some(serde_json::json!({"not": "a list"})));
        assert!(user.favorite_genres_list().is_empty());

        let user = user_with_genres(None);
        assert!(user.favorite_genres_list().is_empty());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::Admin.can_moderate());
        assert!(!UserRole::Moderator.is_admin());
        assert!(UserRole::Moderator.can_moderate());
        assert!(!UserRole::Member.can_moderate());
    }
}
