use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;
use tokio::sync::mpsc;

use gamescout::api::ApiClient;
use gamescout::app::{AppEvent, Dashboard};
use gamescout::config::Config;
use gamescout::filters::FilterState;
use gamescout::session::Route;
use gamescout::theme::ThemeVariant;
use gamescout::ui;

/// Get the config directory path (~/.config/gamescout/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("gamescout"))
}

#[derive(Parser, Debug)]
#[command(
    name = "gamescout",
    about = "Terminal market-research dashboard for mobile games"
)]
struct Args {
    /// Backend API base URL, overriding the config file
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Screen to open at startup: new-games, bookmarks, folder/<name>,
    /// publisher-tracking, admin
    #[arg(long, default_value = "/", value_name = "ROUTE")]
    route: String,

    /// Alternate config file (default: ~/.config/gamescout/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Probe the session and print who is signed in, without starting the UI
    #[arg(long)]
    check_session: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let base_url = args.base_url.unwrap_or_else(|| config.api_base_url.clone());
    let cookie: Option<SecretString> = config
        .session_cookie
        .as_deref()
        .map(|c| SecretString::from(c.to_string()));

    let client = ApiClient::new(&base_url, cookie.as_ref())
        .with_context(|| format!("Invalid API base URL: {}", base_url))?;

    if args.check_session {
        match client.fetch_session().await {
            Ok(Some(user)) => println!("Signed in as {} ({})", user.email, user.role),
            Ok(None) => println!("Not signed in"),
            Err(e) => {
                eprintln!("Session check failed: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let filters = FilterState::new(Local::now().date_naive());
    let mut dash = Dashboard::new(client, filters, config.page_limit, config.sync_poll_secs);

    match ThemeVariant::from_str_name(&config.theme) {
        Some(variant) => dash.set_theme(variant),
        None => tracing::warn!(theme = %config.theme, "Unknown theme in config, using dark"),
    }

    // The requested route renders as the session-check screen until the
    // initial /auth/me probe resolves; the guard re-runs at that point.
    dash.navigate(Route::parse(&args.route));

    let (event_tx, event_rx) = mpsc::unbounded_channel::<AppEvent>();

    // Initial session probe
    {
        let client = dash.client.clone();
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppEvent::SessionLoaded(client.fetch_session().await));
        });
    }

    ui::run(&mut dash, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
