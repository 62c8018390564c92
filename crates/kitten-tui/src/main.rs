//! `kitten`: terminal console for the BlackKitten DPI-bypass proxy.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `kitten-core`'s [`SlotStream`](kitten_core::SlotStream). Sections are
//! navigable via number keys (1-6): Dashboard, Lists, Rules, Settings,
//! Diagnostics, and Logs.
//!
//! Logs are written to a file (default `/tmp/kitten.log`) to avoid
//! corrupting the terminal UI. A background data bridge task forwards
//! store updates from the control plane into the TUI action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod host;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use kitten_core::Console;

use crate::app::App;
use crate::host::NoHost;

/// Operator console for the BlackKitten proxy.
#[derive(Parser, Debug)]
#[command(name = "kitten", version, about)]
struct Cli {
    /// Control plane URL (e.g., http://127.0.0.1:9797)
    #[arg(short = 'u', long, env = "KITTEN_URL")]
    url: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log file path (defaults to /tmp/kitten.log)
    #[arg(long, default_value = "/tmp/kitten.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may go to stdout/stderr while the
/// terminal is in raw mode. Hold the guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "kitten_tui={log_level},kitten_core={log_level},kitten_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("kitten.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the console configuration. CLI flags win over the config file.
fn build_console(cli: &Cli) -> Result<Console> {
    let mut cfg = match &cli.config {
        Some(path) => kitten_config::load_config_from(path)?,
        None => kitten_config::load_config_or_default(),
    };
    if let Some(url) = &cli.url {
        cfg.control_url.clone_from(url);
    }

    let console = Console::new(cfg.to_console_config()?)?;
    Ok(console)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches to raw mode
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let console = build_console(&cli)?;
    info!(url = %console.config().control_url, "starting kitten");

    let mut app = App::new(console, Box::new(NoHost));
    app.run().await?;

    Ok(())
}
