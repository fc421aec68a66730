//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        let mut shown = ctx.config.clone();
        if shown.api.bearer_token.is_some() {
            shown.api.bearer_token = Some("(set)".to_string());
        }
        ctx.output.json(&shown);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let api = &ctx.config.api;
    println!("\n[api]");
    ctx.output.kv("base_url", &api.base_url);
    ctx.output.kv("listing_path", &api.listing_path);
    if let Some(timeout) = api.timeout_ms {
        ctx.output.kv("timeout_ms", &timeout.to_string());
    }
    if api.bearer_token.is_some() {
        ctx.output.kv("bearer_token", "(set)");
    }

    println!("\n[session]");
    ctx.output.kv("path", &ctx.config.session.path);
    ctx.output.kv("resolved", &ctx.session_path().display().to_string());

    println!("\n[logging]");
    ctx.output.kv("level", ctx.config.logging.level.as_filter());
    ctx.output.kv("format", &ctx.config.logging.format.to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
