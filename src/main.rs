mod app;
mod catalog;
mod config;
mod error;
mod mirror;
mod player;
mod route;
mod ui;
mod watch;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::app::App;
use crate::catalog::AniListClient;
use crate::config::Config;
use crate::error::Result;
use crate::route::Route;

const USAGE: &str = "\
usage: level1 [ROUTE]

Browse the AniList catalog and open episodes on the mirror.

ROUTE
  /                    trending (default)
  /?search=TERM        search results
  /watch/ID            episode list and player link for an AniList id
";

fn setup_logging() -> Result<()> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "level1.log");

    let filter = EnvFilter::builder()
        .with_default_directive("level1=info".parse().expect("static directive"))
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let arg = std::env::args().nth(1);
    if matches!(arg.as_deref(), Some("-h" | "--help")) {
        print!("{}", USAGE);
        return Ok(());
    }

    // Set up file-based logging (we own the terminal for TUI)
    if let Err(e) = setup_logging() {
        eprintln!("Warning: Could not set up logging: {}", e);
    }

    info!("Starting level1");

    let config = Config::load()?;
    info!(endpoint = %config.catalog.endpoint, mirror = %config.mirror.base_url, "Loaded config");

    let start = arg.as_deref().map(Route::parse).unwrap_or_default();
    info!(route = %start.path(), "Start route");

    let provider = Arc::new(AniListClient::with_endpoint(config.catalog.endpoint.clone()));

    let mut terminal = app::init_terminal()?;

    if config.ui.splash {
        let accent = ui::widgets::parse_accent_color(&config.ui.accent_color);
        let _ = app::play_splash(&mut terminal, accent);
    }

    let mut app = App::new(config, provider);
    let result = app.run(&mut terminal, start).await;

    app::restore_terminal()?;

    result
}
