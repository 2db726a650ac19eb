//! Command-line interface parsing for Sport News CLI
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the startup configuration: news API settings, topic, and cache options.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::cache::CacheManager;
use crate::news::client::DEFAULT_BASE_URL;
use crate::news::NewsConfig;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// No API key was given on the command line or in the environment
    #[error("Missing API key: pass --api-key or set NEWS_API_KEY")]
    MissingApiKey,

    /// The topic is blank
    #[error("Invalid topic: '{0}'. The topic must not be empty")]
    EmptyTopic(String),

    /// The base URL does not parse
    #[error("Invalid base URL: '{0}'")]
    InvalidBaseUrl(String),
}

/// Sport News CLI - show one recent article with its image
#[derive(Parser, Debug)]
#[command(name = "sportnews")]
#[command(about = "Show a recent sports news article, cached briefly on disk")]
#[command(version)]
pub struct Cli {
    /// Search keyword sent to the news API
    #[arg(long, default_value = "NBA")]
    pub topic: String,

    /// News API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Two-letter language code
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Sort order for results (publishedAt, relevancy, popularity)
    #[arg(long, default_value = "publishedAt")]
    pub sort_by: String,

    /// Listing endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory for cached files (defaults to the platform cache directory)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Seconds a cached article stays fresh
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub ttl_secs: u64,

    /// List every fetched headline instead of showing one article
    #[arg(long)]
    pub list: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// News API connection settings
    pub news: NewsConfig,
    /// Search keyword
    pub topic: String,
    /// Explicit cache directory, if given
    pub cache_dir: Option<PathBuf>,
    /// Freshness window for the cache
    pub ttl: Duration,
    /// Whether to run in headline list mode
    pub list_mode: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the API key is missing or an argument is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(CliError::MissingApiKey)?;

        let topic = cli.topic.trim();
        if topic.is_empty() {
            return Err(CliError::EmptyTopic(cli.topic.clone()));
        }

        if url::Url::parse(&cli.base_url).is_err() {
            return Err(CliError::InvalidBaseUrl(cli.base_url.clone()));
        }

        Ok(StartupConfig {
            news: NewsConfig {
                base_url: cli.base_url.clone(),
                api_key: api_key.to_string(),
                language: cli.language.clone(),
                sort_by: cli.sort_by.clone(),
                ..Default::default()
            },
            topic: topic.to_string(),
            cache_dir: cli.cache_dir.clone(),
            ttl: Duration::from_secs(cli.ttl_secs),
            list_mode: cli.list,
        })
    }

    /// Builds the cache manager for this configuration
    ///
    /// Returns `None` when no directory was given and the platform cache
    /// directory cannot be determined.
    pub fn cache_manager(&self) -> Option<CacheManager> {
        let cache = match &self.cache_dir {
            Some(dir) => CacheManager::with_dir(dir.clone()),
            None => CacheManager::new()?,
        };
        Some(cache.with_ttl(self.ttl))
    }
}
