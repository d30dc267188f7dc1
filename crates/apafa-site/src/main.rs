//! APAFA site renderer.
//!
//! Loads the association's JSON fixtures over HTTP (or from a local
//! directory) and fills the page templates with them.

mod cli;
mod commands;
mod config;
mod source;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use apafa_core::{DataLoader, RenderContext};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Command};
use config::Config;
use source::Source;

/// Initialize the tracing subscriber for logging.
/// The returned guard must stay alive for file logs to be flushed.
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file: {}", path.display()))?;
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            Ok(None)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn build_loader(config: &Config) -> Result<DataLoader<Source>> {
    let source = Source::from_config(config)?;
    info!(source = %source.describe(config), "Loading data");
    Ok(DataLoader::new(source, config.loader.clone()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref())?;
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render(args) => {
            args.apply(&mut config);
            let loader = build_loader(&config)?;
            let rendered = commands::render::run(
                &loader,
                &args.page.0,
                &config.templates_dir(),
                &config.out_dir(),
                &RenderContext::current(),
                args.policy(),
            )
            .await?;
            info!(pages = rendered.len(), out = %config.out_dir().display(), "Site rendered");
        }
        Command::Fetch(args) => {
            args.source.apply(&mut config);
            let loader = build_loader(&config)?;
            let value = commands::fetch::run(&loader, &args.name, args.no_cache).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Config(args) => {
            args.source.apply(&mut config);
            println!("{}", serde_json::to_string_pretty(&config)?);
            if args.save {
                let path = match cli.config {
                    Some(path) => path,
                    None => Config::config_path()?,
                };
                config.save_to(&path)?;
                info!(path = %path.display(), "Saved configuration");
            }
        }
    }

    Ok(())
}
