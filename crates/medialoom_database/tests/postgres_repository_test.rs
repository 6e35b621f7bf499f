//! Round trips against a live PostgreSQL database.
//!
//! These tests need `DATABASE_URL` (optionally from `.env`) pointing at a
//! disposable database and are ignored by default.

use medialoom_core::{FileRecord, FileState, MediaKind, MediaRecord};
use medialoom_database::{PostgresMediaRepository, establish_connection, run_migrations};
use medialoom_interface::MediaRepository;

fn repository() -> PostgresMediaRepository {
    dotenvy::dotenv().ok();
    let mut conn = establish_connection().expect("Failed to connect to DATABASE_URL");
    run_migrations(&mut conn).expect("Failed to run migrations");
    PostgresMediaRepository::new(conn)
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_rollback_discards_file() {
    let repo = repository();
    let engine = repo
        .create_engine("local_files", &unique("disk"), serde_json::json!({}))
        .await
        .expect("create engine");
    let media_id = repo
        .insert_media(&MediaRecord::new(None, unique("rollback")))
        .await
        .expect("insert media");

    let mut tx = repo.begin().await.expect("begin");
    let mut file = FileRecord::pending(media_id, *engine.id(), MediaKind::Video, "a.mp4");
    tx.flush_file(&mut file).await.expect("flush");
    assert!(file.id.is_some());
    tx.rollback().await.expect("rollback");

    let media = repo.load_media(media_id).await.expect("load");
    assert!(media.files.is_empty());
    repo.delete_media(media_id).await.expect("cleanup");
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_commit_persists_file_and_media() {
    let repo = repository();
    let engine = repo
        .create_engine("local_files", &unique("disk"), serde_json::json!({}))
        .await
        .expect("create engine");
    let media_id = repo
        .insert_media(&MediaRecord::new(None, unique("commit")))
        .await
        .expect("insert media");
    let mut media = repo.load_media(media_id).await.expect("load");

    let mut tx = repo.begin().await.expect("begin");
    let mut file = FileRecord::pending(media_id, *engine.id(), MediaKind::Audio, "a.mp3")
        .with_container("mp3")
        .with_size(2048u64);
    tx.flush_file(&mut file).await.expect("flush");
    file.unique_id = Some(format!("{}.mp3", file.id.expect("id")));
    file.state = FileState::Stored;
    tx.flush_file(&mut file).await.expect("re-flush");
    media.files.push(file.clone());
    media.title = Some("Interview".to_string());
    media.update_status();
    tx.update_media(&media).await.expect("update media");
    tx.commit().await.expect("commit");

    let stored = repo.load_media(media_id).await.expect("load");
    assert_eq!(stored.title.as_deref(), Some("Interview"));
    assert!(stored.encoded);
    assert_eq!(stored.kind, Some(MediaKind::Audio));
    assert_eq!(stored.files.len(), 1);
    assert_eq!(stored.files[0].state, FileState::Stored);
    assert_eq!(stored.files[0].size, Some(2048));

    let deleted = repo
        .delete_file(file.id.expect("id"))
        .await
        .expect("delete file")
        .expect("file existed");
    assert_eq!(deleted.unique_id, file.unique_id);

    let gone = repo.delete_media(media_id).await.expect("delete media");
    assert!(gone.is_some());
    assert!(repo.delete_media(media_id).await.expect("delete again").is_none());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_duplicate_engine_names_rejected() {
    let repo = repository();
    let name = unique("dup");
    repo.create_engine("youtube", &name, serde_json::json!({}))
        .await
        .expect("first");
    let err = repo
        .create_engine("youtube", &name, serde_json::json!({}))
        .await
        .expect_err("duplicate display name");
    assert!(err.to_string().contains(&name));
}
