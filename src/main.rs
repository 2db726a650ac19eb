//! Sport News CLI - show one recent sports news article
//!
//! Fetches articles for a topic from a news API, picks one that has an image,
//! and keeps it in a short-lived disk cache so quick relaunches stay offline.

use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use sportnews::app::{render_headlines, render_state, App, AppState};
use sportnews::cli::{Cli, StartupConfig};
use sportnews::news::NewsClient;

/// Logs go to stderr so stdout carries only the rendered article
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(2);
        }
    };

    let client = match NewsClient::new(config.news.clone()) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let cache = config.cache_manager();
    if cache.is_none() {
        warn!("no cache directory available; caching disabled");
    }

    let mut app = App::new(cache, client, config.topic.clone());

    if config.list_mode {
        return match app.fetch_headlines().await {
            Ok(articles) => {
                print!("{}", render_headlines(&articles));
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{}", err);
                ExitCode::FAILURE
            }
        };
    }

    app.run_cycle().await;
    print!("{}", render_state(&app.state));

    match app.state {
        AppState::Content(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
