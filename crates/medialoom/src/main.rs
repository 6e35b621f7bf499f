//! Medialoom CLI binary.
//!
//! This binary provides command-line access to Medialoom's functionality:
//! - Ingest uploaded files and URLs into media items
//! - Manage storage engine instances and inspect their order
//! - Remove files and media, list access points, manage thumbnails

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        CliContext, Commands, ThumbCommands, delete_media, handle_engine_command, ingest,
        new_media, print_uris, remove_file, thumb_defaults,
    };

    // DATABASE_URL may live in .env
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = cli::Cli::parse();

    // Initialize tracing, RUST_LOG overrides --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Commands::Migrate = cli.command {
        let mut conn = medialoom::establish_connection()?;
        let applied = medialoom::run_migrations(&mut conn)?;
        println!("Applied {} migrations", applied);
        return Ok(());
    }

    let ctx = CliContext::connect(cli.config.as_deref())?;

    // Execute the requested command
    match cli.command {
        Commands::NewMedia { slug, title } => new_media(&ctx, slug, title).await?,

        Commands::Ingest {
            media_id,
            file,
            name,
            url,
        } => ingest(&ctx, media_id, file, name, url).await?,

        Commands::Engines(engine_cmd) => handle_engine_command(&ctx, engine_cmd).await?,

        Commands::RemoveFile { file_id } => remove_file(&ctx, file_id).await?,

        Commands::DeleteMedia { media_id } => delete_media(&ctx, media_id).await?,

        Commands::Uris { media_id, format } => print_uris(&ctx, media_id, format).await?,

        Commands::Thumbs(ThumbCommands::Defaults { media_id }) => {
            thumb_defaults(&ctx, media_id).await?
        }

        Commands::Migrate => {}
    }

    Ok(())
}
