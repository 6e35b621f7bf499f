//! Media and file command handlers.

use super::CliContext;
use super::commands::OutputFormat;
use medialoom::{
    ConfigError, IngestSource, MediaRecord, MediaRepository, MedialoomResult, ThumbnailError,
    ThumbnailErrorKind, ThumbnailOwner, ThumbnailStore, UploadedFile, uri,
};
use std::path::PathBuf;

/// Create an empty media item.
pub async fn new_media(ctx: &CliContext, slug: String, title: Option<String>) -> MedialoomResult<()> {
    let mut media = MediaRecord::new(None, slug);
    media.title = title;
    let id = ctx.repository.insert_media(&media).await?;
    println!("Created media {} ({})", id, media.slug);
    Ok(())
}

/// Ingest a file or URL into a media item.
pub async fn ingest(
    ctx: &CliContext,
    media_id: i32,
    file: Option<PathBuf>,
    name: Option<String>,
    url: Option<String>,
) -> MedialoomResult<()> {
    let source = match (file, url) {
        (Some(path), None) => {
            let filename = match name {
                Some(name) => name,
                None => path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| {
                        ConfigError::new(format!("{} has no file name", path.display()))
                    })?,
            };
            IngestSource::File(UploadedFile::new(filename, path))
        }
        (None, Some(url)) => IngestSource::Url(url),
        _ => return Err(ConfigError::new("Pass exactly one of --file or --url").into()),
    };

    let mut media = ctx.repository.load_media(media_id).await?;
    let file = ctx
        .coordinator
        .ingest(&mut media, &source, &ctx.settings)
        .await?;

    println!(
        "Stored file {} as '{}' ({})",
        file.id.map(|id| id.to_string()).unwrap_or_default(),
        file.display_name,
        file.unique_id.as_deref().unwrap_or("-")
    );
    println!(
        "Media {} is {}",
        media_id,
        if media.encoded { "encoded" } else { "not yet encoded" }
    );
    Ok(())
}

/// Remove one file.
pub async fn remove_file(ctx: &CliContext, file_id: i32) -> MedialoomResult<()> {
    match ctx.coordinator.remove_file(file_id, &ctx.settings).await? {
        Some(file) => println!("Removed file {} ('{}')", file_id, file.display_name),
        None => println!("No file with id {}", file_id),
    }
    Ok(())
}

/// Delete a media item.
pub async fn delete_media(ctx: &CliContext, media_id: i32) -> MedialoomResult<()> {
    match ctx.coordinator.delete_media(media_id, &ctx.settings).await? {
        Some(media) => println!(
            "Deleted media {} ('{}') with {} files",
            media_id,
            media.slug,
            media.files.len()
        ),
        None => println!("No media with id {}", media_id),
    }
    Ok(())
}

/// Print every access point of a media item.
pub async fn print_uris(ctx: &CliContext, media_id: i32, format: OutputFormat) -> MedialoomResult<()> {
    let media = ctx.repository.load_media(media_id).await?;
    let uris = ctx.coordinator.media_uris(&media, &ctx.settings).await?;

    match format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = uris
                .iter()
                .map(|u| {
                    serde_json::json!({
                        "file_id": u.file.id,
                        "scheme": u.scheme,
                        "uri": u.to_string(),
                    })
                })
                .collect();
            let json = serde_json::json!({
                "media_id": media_id,
                "uris": entries,
                "best_link": uri::best_link_uri(&uris).map(|u| u.to_string()),
                "download": uri::download_uri(&uris).map(|u| u.to_string()),
            });
            println!("{:#}", json);
        }
        OutputFormat::Human => {
            println!("Access points for media {} ('{}'):", media_id, media.slug);
            println!("{:-<80}", "");
            for u in &uris {
                println!(
                    "file {:<6} {:<10} {}",
                    u.file.id.map(|id| id.to_string()).unwrap_or_default(),
                    u.scheme,
                    u
                );
            }
            println!("{:-<80}", "");
            if let Some(link) = uri::best_link_uri(&uris) {
                println!("Best link: {}", link);
            }
            if let Some(download) = uri::download_uri(&uris) {
                println!("Download:  {}", download);
            }
        }
    }
    Ok(())
}

/// Give a media item the placeholder thumbnail set.
pub async fn thumb_defaults(ctx: &CliContext, media_id: i32) -> MedialoomResult<()> {
    let media = ctx.repository.load_media(media_id).await?;
    let owner = ThumbnailOwner::from(&media);
    let store = ThumbnailStore::new(ctx.settings.thumbnails().clone());

    tokio::task::spawn_blocking(move || store.create_defaults(&owner))
        .await
        .map_err(|e| ThumbnailError::new(ThumbnailErrorKind::Io(e.to_string())))??;
    println!("Copied default thumbnails to media {}", media_id);
    Ok(())
}
