//! Diesel models for the media tables.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Database row for the `media` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::media)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MediaRow {
    pub id: i32,
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub duration: Option<i32>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    pub publish_on: Option<DateTime<Utc>>,
    pub reviewed: bool,
    pub publishable: bool,
    pub encoded: bool,
}

/// Writable columns of the `media` table.
///
/// Used both for inserts and as an update changeset; `None` clears a column.
#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::media)]
#[diesel(treat_none_as_null = true)]
pub struct MediaValues {
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub duration: Option<i32>,
    pub modified_on: DateTime<Utc>,
    pub publish_on: Option<DateTime<Utc>>,
    pub reviewed: bool,
    pub publishable: bool,
    pub encoded: bool,
}

/// Database row for the `media_files` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Associations)]
#[diesel(belongs_to(MediaRow, foreign_key = media_id))]
#[diesel(table_name = crate::schema::media_files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FileRow {
    pub id: i32,
    pub media_id: i32,
    pub storage_id: i32,
    pub unique_id: Option<String>,
    pub container: Option<String>,
    pub kind: String,
    pub size: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub bitrate: Option<i32>,
    pub display_name: String,
    pub state: String,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

/// Writable columns of the `media_files` table.
#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::media_files)]
#[diesel(treat_none_as_null = true)]
pub struct FileValues {
    pub media_id: i32,
    pub storage_id: i32,
    pub unique_id: Option<String>,
    pub container: Option<String>,
    pub kind: String,
    pub size: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub bitrate: Option<i32>,
    pub display_name: String,
    pub state: String,
    pub modified_on: DateTime<Utc>,
}

/// Database row for the `storage` table (engine instances).
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::storage)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EngineRow {
    pub id: i32,
    pub engine_type: String,
    pub display_name: String,
    pub enabled: bool,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    pub data: serde_json::Value,
}

/// Insertable struct for the `storage` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::storage)]
pub struct NewEngineRow {
    pub engine_type: String,
    pub display_name: String,
    pub enabled: bool,
    pub data: serde_json::Value,
}

/// Database row for the `categories` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: i32,
    pub slug: String,
    pub name: String,
}
