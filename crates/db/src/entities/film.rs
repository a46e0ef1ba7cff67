//! Film entity.
//!
//! Films are materialized from the public catalog on first use; the
//! catalog itself is a read-only external data source.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "film")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Catalog identifier.
    #[sea_orm(unique)]
    pub tmdb_id: i64,

    pub title: String,

    #[sea_orm(nullable)]
    pub original_title: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub synopsis: Option<String>,

    /// Release date, ISO-8601 string from the catalog.
    #[sea_orm(nullable)]
    pub release_date: Option<String>,

    #[sea_orm(nullable)]
    pub runtime_minutes: Option<i32>,

    #[sea_orm(nullable)]
    pub poster_url: Option<String>,

    /// Average of all local review ratings, recomputed on every review write.
    #[sea_orm(default_value = 0.0)]
    pub average_rating: f64,

    /// Catalog vote count (informational).
    #[sea_orm(default_value = 0)]
    pub votes_count: i64,

    /// Genre names, stored as a JSON array of strings.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub genres: Option<Json>,

    #[sea_orm(nullable)]
    pub director: Option<String>,

    /// Cast member names, stored as a JSON array of strings.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub cast: Option<Json>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parse the genres column into a typed list; malformed JSON reads as empty.
    #[must_use]
    pub fn genres_list(&self) -> Vec<String> {
        self.genres
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// Parse the cast column into a typed list; malformed JSON reads as empty.
    #[must_use]
    pub fn cast_list(&self) -> Vec<String> {
        self.cast
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }
}
