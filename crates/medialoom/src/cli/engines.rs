//! Storage engine command handlers.

use super::CliContext;
use super::commands::EngineCommands;
use medialoom::{ConfigError, EngineInstance, MediaRepository, MedialoomResult};

/// Handle storage engine commands.
pub async fn handle_engine_command(ctx: &CliContext, cmd: EngineCommands) -> MedialoomResult<()> {
    match cmd {
        EngineCommands::List { enabled_only } => list_engines(ctx, enabled_only).await,
        EngineCommands::Order => engine_order(ctx).await,
        EngineCommands::Add {
            engine_type,
            name,
            data,
        } => add_engine(ctx, &engine_type, name, data.as_deref()).await,
    }
}

async fn list_engines(ctx: &CliContext, enabled_only: bool) -> MedialoomResult<()> {
    let instances = ctx.repository.list_engines(enabled_only).await?;

    println!("{:<5} {:<16} {:<30} {}", "ID", "TYPE", "NAME", "ENABLED");
    println!("{:-<60}", "");
    for instance in &instances {
        println!(
            "{:<5} {:<16} {:<30} {}",
            instance.id(),
            instance.engine_type(),
            instance.display_name(),
            if *instance.enabled() { "yes" } else { "no" }
        );
    }
    println!("Total: {} engines", instances.len());
    Ok(())
}

async fn engine_order(ctx: &CliContext) -> MedialoomResult<()> {
    let engines = ctx.coordinator.sorted_engines(&ctx.settings).await?;

    println!("Enabled engines in the order they are offered new files:");
    for (position, engine) in engines.iter().enumerate() {
        println!(
            "{:>3}. {} ({}, id {})",
            position + 1,
            engine.instance().display_name(),
            engine.engine_type(),
            engine.id()
        );
    }
    Ok(())
}

#[tracing::instrument(skip(ctx, name, data))]
async fn add_engine(
    ctx: &CliContext,
    engine_type: &str,
    name: Option<String>,
    data: Option<&str>,
) -> MedialoomResult<()> {
    let existing = ctx.repository.list_engines(false).await?;
    let descriptor = ctx
        .coordinator
        .registry()
        .check_new_instance(&existing, engine_type)?;

    let display_name = name.unwrap_or_else(|| descriptor.default_name().to_string());
    let data = match data {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| ConfigError::new(format!("Invalid engine data JSON: {}", e)))?,
        None => descriptor.data_template().clone(),
    };

    // Build the engine once so bad settings are rejected before they are stored.
    let candidate = EngineInstance::new(0, engine_type, display_name.clone(), data.clone());
    descriptor.build(candidate, &ctx.coordinator.context(&ctx.settings))?;

    let instance = ctx
        .repository
        .create_engine(engine_type, &display_name, data)
        .await?;
    tracing::info!(engine_id = instance.id(), "Added engine");
    println!(
        "Added {} engine '{}' with id {}",
        instance.engine_type(),
        instance.display_name(),
        instance.id()
    );
    Ok(())
}
