//! Conversions between domain records and database rows.

use crate::models::{CategoryRow, EngineRow, FileRow, FileValues, MediaRow, MediaValues};
use crate::DatabaseResult;
use medialoom_core::{Category, EngineInstance, FileRecord, FileState, MediaKind, MediaRecord};
use medialoom_error::{DatabaseError, DatabaseErrorKind};
use std::str::FromStr;

fn serialization(message: String) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::Serialization(message))
}

fn parse_enum<T: FromStr>(value: &str, column: &str) -> DatabaseResult<T> {
    T::from_str(value).map_err(|_| serialization(format!("invalid {} '{}'", column, value)))
}

fn to_i32(value: Option<u32>, column: &str) -> DatabaseResult<Option<i32>> {
    value
        .map(|v| i32::try_from(v).map_err(|_| serialization(format!("{} out of range: {}", column, v))))
        .transpose()
}

fn from_i32(value: Option<i32>, column: &str) -> DatabaseResult<Option<u32>> {
    value
        .map(|v| u32::try_from(v).map_err(|_| serialization(format!("negative {}: {}", column, v))))
        .transpose()
}

/// Convert a file row to a domain record.
pub fn file_from_row(row: FileRow) -> DatabaseResult<FileRecord> {
    let size = row
        .size
        .map(|s| u64::try_from(s).map_err(|_| serialization(format!("negative size: {}", s))))
        .transpose()?;
    Ok(FileRecord {
        id: Some(row.id),
        media_id: row.media_id,
        engine_id: row.storage_id,
        unique_id: row.unique_id,
        container: row.container,
        kind: parse_enum::<MediaKind>(&row.kind, "kind")?,
        size,
        width: from_i32(row.width, "width")?,
        height: from_i32(row.height, "height")?,
        bitrate: from_i32(row.bitrate, "bitrate")?,
        display_name: row.display_name,
        state: parse_enum::<FileState>(&row.state, "state")?,
        created_on: row.created_on,
        modified_on: row.modified_on,
    })
}

/// Writable columns of a file record.
pub fn file_values(file: &FileRecord) -> DatabaseResult<FileValues> {
    let size = file
        .size
        .map(|s| i64::try_from(s).map_err(|_| serialization(format!("size out of range: {}", s))))
        .transpose()?;
    Ok(FileValues {
        media_id: file.media_id,
        storage_id: file.engine_id,
        unique_id: file.unique_id.clone(),
        container: file.container.clone(),
        kind: file.kind.to_string(),
        size,
        width: to_i32(file.width, "width")?,
        height: to_i32(file.height, "height")?,
        bitrate: to_i32(file.bitrate, "bitrate")?,
        display_name: file.display_name.clone(),
        state: file.state.to_string(),
        modified_on: file.modified_on,
    })
}

/// Assemble a media record from its row, files and categories.
pub fn media_from_rows(
    row: MediaRow,
    files: Vec<FileRow>,
    categories: Vec<CategoryRow>,
) -> DatabaseResult<MediaRecord> {
    let kind = row
        .kind
        .as_deref()
        .map(|k| parse_enum::<MediaKind>(k, "kind"))
        .transpose()?;
    let files = files
        .into_iter()
        .map(file_from_row)
        .collect::<DatabaseResult<Vec<_>>>()?;
    let mut media = MediaRecord::new(Some(row.id), row.slug);
    media.title = row.title;
    media.description = row.description;
    media.kind = kind;
    media.duration = from_i32(row.duration, "duration")?;
    media.created_on = row.created_on;
    media.modified_on = row.modified_on;
    media.publish_on = row.publish_on;
    media.reviewed = row.reviewed;
    media.publishable = row.publishable;
    media.encoded = row.encoded;
    media.files = files;
    media.categories = categories
        .into_iter()
        .map(|c| Category {
            id: c.id,
            slug: c.slug,
            name: c.name,
        })
        .collect();
    Ok(media)
}

/// Writable columns of a media record (its files excluded).
pub fn media_values(media: &MediaRecord) -> DatabaseResult<MediaValues> {
    Ok(MediaValues {
        slug: media.slug.clone(),
        title: media.title.clone(),
        description: media.description.clone(),
        kind: media.kind.map(|k| k.to_string()),
        duration: to_i32(media.duration, "duration")?,
        modified_on: media.modified_on,
        publish_on: media.publish_on,
        reviewed: media.reviewed,
        publishable: media.publishable,
        encoded: media.encoded,
    })
}

/// Convert a storage row to an engine instance.
pub fn engine_from_row(row: EngineRow) -> EngineInstance {
    EngineInstance::from_parts(
        row.id,
        row.engine_type,
        row.display_name,
        row.enabled,
        row.created_on,
        row.modified_on,
        row.data,
    )
}
