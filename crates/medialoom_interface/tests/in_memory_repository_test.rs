//! Tests for the in-memory media repository.

use medialoom_core::{FileRecord, FileState, MediaKind, MediaRecord};
use medialoom_interface::{InMemoryMediaRepository, MediaRepository};
use serde_json::json;

#[tokio::test]
async fn test_engine_instances() {
    let repo = InMemoryMediaRepository::new();
    let local = repo
        .create_engine("local_files", "Local Files", json!({"path": "/srv/media"}))
        .await
        .unwrap();
    let youtube = repo
        .create_engine("youtube", "YouTube", json!({}))
        .await
        .unwrap();
    assert!(local.id() < youtube.id());

    let duplicate = repo.create_engine("local_files", "Local Files", json!({})).await;
    assert!(duplicate.is_err());

    repo.set_engine_enabled(*youtube.id(), false).await;
    assert_eq!(repo.list_engines(false).await.unwrap().len(), 2);
    let enabled = repo.list_engines(true).await.unwrap();
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].engine_type(), "local_files");

    repo.update_engine_data(*local.id(), json!({"path": "/mnt/media"}))
        .await
        .unwrap();
    let engines = repo.list_engines(true).await.unwrap();
    assert_eq!(engines[0].data_str("path"), Some("/mnt/media"));
}

#[tokio::test]
async fn test_commit_makes_files_visible() {
    let repo = InMemoryMediaRepository::new();
    let media_id = repo.insert_media(MediaRecord::new(None, "lecture")).await;

    let mut tx = repo.begin().await.unwrap();
    let mut file = FileRecord::pending(media_id, 1, MediaKind::Audio, "lecture.mp3");
    tx.flush_file(&mut file).await.unwrap();
    assert!(file.id.is_some());

    // Not visible before commit
    assert!(repo.load_media(media_id).await.unwrap().files.is_empty());

    file.state = FileState::Stored;
    file.unique_id = Some("1-lecture.mp3".to_string());
    tx.flush_file(&mut file).await.unwrap();

    let mut media = repo.load_media(media_id).await.unwrap();
    media.title = Some("Lecture".to_string());
    tx.update_media(&media).await.unwrap();
    tx.commit().await.unwrap();

    let media = repo.load_media(media_id).await.unwrap();
    assert_eq!(media.title.as_deref(), Some("Lecture"));
    assert_eq!(media.files.len(), 1);
    assert_eq!(media.files[0].state, FileState::Stored);
    assert_eq!(media.files[0].unique_id.as_deref(), Some("1-lecture.mp3"));
}

#[tokio::test]
async fn test_rollback_discards_writes_but_burns_ids() {
    let repo = InMemoryMediaRepository::new();
    let media_id = repo.insert_media(MediaRecord::new(None, "lecture")).await;

    let mut tx = repo.begin().await.unwrap();
    let mut first = FileRecord::pending(media_id, 1, MediaKind::Audio, "a.mp3");
    tx.flush_file(&mut first).await.unwrap();
    tx.rollback().await.unwrap();
    assert_eq!(repo.file_count().await, 0);

    let mut tx = repo.begin().await.unwrap();
    let mut second = FileRecord::pending(media_id, 1, MediaKind::Audio, "b.mp3");
    tx.flush_file(&mut second).await.unwrap();
    tx.commit().await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(repo.file_count().await, 1);
}

#[tokio::test]
async fn test_dropped_transaction_discards_writes() {
    let repo = InMemoryMediaRepository::new();
    let media_id = repo.insert_media(MediaRecord::new(None, "lecture")).await;
    {
        let mut tx = repo.begin().await.unwrap();
        let mut file = FileRecord::pending(media_id, 1, MediaKind::Video, "a.mp4");
        tx.flush_file(&mut file).await.unwrap();
    }
    assert_eq!(repo.file_count().await, 0);
}

#[tokio::test]
async fn test_deletes() {
    let repo = InMemoryMediaRepository::new();
    let mut media = MediaRecord::new(None, "panel");
    media.files.push(FileRecord::pending(0, 1, MediaKind::Video, "a.mp4"));
    media.files.push(FileRecord::pending(0, 1, MediaKind::Video, "b.mp4"));
    let media_id = repo.insert_media(media).await;

    let stored = repo.load_media(media_id).await.unwrap();
    assert!(stored.files.iter().all(|f| f.media_id == media_id));
    let first_id = stored.files[0].id.unwrap();

    let removed = repo.delete_file(first_id).await.unwrap().unwrap();
    assert_eq!(removed.display_name, "a.mp4");
    assert!(repo.delete_file(first_id).await.unwrap().is_none());

    let deleted = repo.delete_media(media_id).await.unwrap().unwrap();
    assert_eq!(deleted.files.len(), 1);
    assert_eq!(repo.media_count().await, 0);
    assert!(repo.load_media(media_id).await.is_err());
}
