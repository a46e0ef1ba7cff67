//! Friendship entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An accepted, symmetric relationship between two users.
///
/// The pair is stored canonically with `user1_id < user2_id`, so a
/// given pair can only ever occupy one row and lookups work the same
/// from either side. Rows are created exclusively by accepting a
/// friend request.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "friendship")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Lexicographically smaller user id of the pair.
    #[sea_orm(indexed)]
    pub user1_id: String,

    /// Lexicographically larger user id of the pair.
    #[sea_orm(indexed)]
    pub user2_id: String,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// The other party of the friendship, relative to `viewer_id`.
    #[must_use]
    pub fn other_party(&self, viewer_id: &str) -> &str {
        if self.user1_id == viewer_id {
            &self.user2_id
        } else {
            &self.user1_id
        }
    }
}

/// Order a pair of user ids canonically (`user1 < user2`).
#[must_use]
pub fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a < b { (a, b) } else { (b, a) }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::User1Id",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User1,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::User2Id",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User2,
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_pair_orders_both_ways() {
        assert_eq!(canonical_pair("a", "b"), ("a", "b"));
        assert_eq!(canonical_pair("b", "a"), ("a", "b"));
    }

    #[test]
    fn test_other_party() {
        let row = Model {
            id: "f1".to_string(),
            user1_id: "a".to_string(),
            user2_id: "b".to_string(),
            created_at: chrono::Utc::now().into(),
        };

        assert_eq!(row.other_party("a"), "b");
        assert_eq!(row.other_party("b"), "a");
    }
}
