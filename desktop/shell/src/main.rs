//! slidev-studio - Slidev deck studio shell
//!
//! Serves a deck through a supervised Slidev dev server and exposes the deck
//! editing operations the assistant uses.
//!
//! # Examples
//!
//! ```bash
//! # Preview slides.md in ./talk until Ctrl-C
//! slidev-studio serve --dir ./talk
//!
//! # Replace the second slide
//! slidev-studio slides --dir ./talk update-page 1 "# Agenda"
//!
//! # Run a tool call exactly as the assistant would
//! slidev-studio slides tool apply_theme '{"themeName": "seriph"}'
//! ```

mod cli;

use crate::cli::{Cli, Commands, SlidesCommands};

use studio_lib::logging::setup_logging;
use studio_lib::{STARTER_DECK_TITLE, ServerError, SlideServer, UpdateChecker};

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde_json::{Value, json};
use studio_config::Config;
use studio_slides::{
    DEFAULT_THEME, SlideToolbox, SlidesResult, tool_definitions, tool_result_message,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

type CommandResult = Result<Value, Arc<ServerError>>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config_dir, config) = match load_config(cli.config_dir.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", e.recovery_hint());
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Serve { dir, file } => {
            serve(&config_dir, &config, &dir, file.as_deref().unwrap_or_default()).await
        }
        Commands::Slides { dir, action } => {
            run_slides(&config, dir, action).map_err(|e| Arc::new(ServerError::from(e)))
        }
        Commands::CheckUpdate => check_update(&config).await,
    };

    match result {
        Ok(Value::Null) => ExitCode::SUCCESS,
        Ok(value) => {
            let output = if cli.pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", e.recovery_hint());
            ExitCode::FAILURE
        }
    }
}

/// Resolve the config directory, load and validate the config.
fn load_config(explicit: Option<&Path>) -> Result<(PathBuf, Config), ServerError> {
    let config_dir = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => Config::config_dir()?,
    };

    let config = Config::load_from(&config_dir)?;
    config.validate()?;

    Ok((config_dir, config))
}

/// Serve a deck until SIGINT/SIGTERM, then stop Slidev unconditionally.
async fn serve(config_dir: &Path, config: &Config, dir: &Path, file: &str) -> CommandResult {
    let logs_dir = config.log_dir(config_dir);
    let log_file = match setup_logging(&logs_dir, config.logging.level) {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!("Failed to set up logging in {}: {e}", logs_dir.display());
            None
        }
    };

    info!("Starting Slidev Studio v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &log_file {
        info!("Writing logs to {}", path.display());
    }
    config.log_summary();

    let dir = dir.canonicalize().map_err(ServerError::from)?;
    info!("Project directory: {}", dir.display());

    if file.is_empty() {
        let toolbox = SlideToolbox::with_default_file(&dir, &config.supervisor.default_file);
        if toolbox
            .ensure_default_deck(STARTER_DECK_TITLE, DEFAULT_THEME)
            .map_err(ServerError::from)?
        {
            info!("Created starter deck {}", config.supervisor.default_file);
        }
    }

    let server = SlideServer::new(config.supervisor.clone())?;
    let shutdown = shutdown_token();

    let started = tokio::select! {
        result = server.start(&dir, file) => Some(result),
        _ = shutdown.cancelled() => None,
    };

    match started {
        Some(Ok(url)) => {
            println!("{url}");
            shutdown.cancelled().await;
            server.shutdown();
            Ok(Value::Null)
        }
        Some(Err(e)) => {
            server.shutdown();
            if let Some(path) = &log_file {
                eprintln!("Full log: {}", path.display());
            }
            Err(e)
        }
        None => {
            server.shutdown();
            Ok(Value::Null)
        }
    }
}

/// Cancelled on the first SIGINT/SIGTERM (Ctrl-C outside Unix).
fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();

    #[cfg(unix)]
    {
        let token = token.clone();
        std::thread::spawn(move || {
            use signal_hook::consts::{SIGINT, SIGTERM};
            use signal_hook::iterator::Signals;

            let mut signals = match Signals::new([SIGINT, SIGTERM]) {
                Ok(s) => s,
                Err(e) => {
                    error!("Failed to register signal handlers: {e}");
                    return;
                }
            };

            if let Some(sig) = signals.forever().next() {
                info!("Received signal {sig}, shutting down...");
                token.cancel();
            }
        });
    }

    #[cfg(not(unix))]
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl-C, shutting down...");
                token.cancel();
            }
        });
    }

    token
}

fn run_slides(config: &Config, dir: PathBuf, action: SlidesCommands) -> SlidesResult<Value> {
    let toolbox = SlideToolbox::with_default_file(dir, &config.supervisor.default_file);

    let value = match action {
        SlidesCommands::List => {
            let decks = toolbox.list_decks()?;
            json!({ "decks": decks })
        }
        SlidesCommands::Read { file } => {
            let content = toolbox.read_slides(&file)?;
            json!({ "content": content })
        }
        SlidesCommands::UpdatePage {
            index,
            markdown,
            file,
        } => {
            toolbox.update_page(&file, index, &markdown)?;
            json!({ "message": "Page updated successfully." })
        }
        SlidesCommands::InsertPage {
            after,
            layout,
            file,
        } => {
            toolbox.insert_page(&file, after, &layout)?;
            json!({ "message": "Page inserted successfully." })
        }
        SlidesCommands::ApplyTheme { theme, file } => {
            toolbox.apply_theme(&file, &theme)?;
            json!({ "message": "Theme applied." })
        }
        SlidesCommands::Create { file, title, theme } => {
            let file = toolbox.create_deck(&file, &title, &theme)?;
            json!({ "file": file })
        }
        SlidesCommands::Tool {
            name,
            arguments,
            file,
        } => json!({ "result": tool_result_message(&toolbox, &file, &name, &arguments) }),
        SlidesCommands::ToolDefinitions => tool_definitions(),
    };

    Ok(value)
}

async fn check_update(config: &Config) -> CommandResult {
    let checker = UpdateChecker::new(config.updates.clone())?;
    let info = checker.check().await?;
    Ok(json!(info))
}
