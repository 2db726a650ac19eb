//! Screen controller for Sport News CLI
//!
//! Runs one load cycle: show the cached article when it is still fresh,
//! otherwise fetch the listing, pick a random article that has an image,
//! download the image, write everything through to the cache and show it.
//! Any failure ends the cycle in the error state; there are no retries.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::cache::CacheManager;
use crate::news::{Article, ArticleImage, FetchError, NewsClient};

/// Errors that end a load cycle
#[derive(Debug, Error)]
pub enum ScreenError {
    /// Listing or image request failed
    #[error("Error: {0}")]
    Fetch(#[from] FetchError),

    /// None of the fetched articles has a usable image
    #[error("No articles with images found")]
    NoArticlesWithImages,
}

/// Where the displayed article came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    Cache,
    Network,
}

/// The article currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleView {
    pub article: Article,
    pub image: ArticleImage,
    pub origin: ContentOrigin,
}

/// Screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Cycle in progress
    Loading,
    /// Cycle failed; holds the message shown to the user
    Error(String),
    /// An article is being shown
    Content(ArticleView),
}

/// Main application struct driving the load cycle
pub struct App {
    /// Current screen state
    pub state: AppState,
    /// Disk cache, absent when no cache directory could be determined
    cache: Option<CacheManager>,
    /// News API client
    client: NewsClient,
    /// Search keyword sent to the news API
    topic: String,
}

impl App {
    /// Creates a new App in the Loading state
    pub fn new(cache: Option<CacheManager>, client: NewsClient, topic: impl Into<String>) -> Self {
        Self {
            state: AppState::Loading,
            cache,
            client,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Runs one cache-check / fetch / cache-write cycle
    ///
    /// Always leaves the app in either `Content` or `Error`.
    pub async fn run_cycle(&mut self) {
        self.state = match self.load_article().await {
            Ok(view) => AppState::Content(view),
            Err(err) => AppState::Error(err.to_string()),
        };
    }

    async fn load_article(&self) -> Result<ArticleView, ScreenError> {
        if let Some(cache) = self.fresh_cache() {
            info!("Loading from cache...");
            if let Some((article, image)) = cache.load() {
                return Ok(ArticleView {
                    article,
                    image,
                    origin: ContentOrigin::Cache,
                });
            }
        }

        info!(topic = %self.topic, "Fetching new data...");
        let response = self.client.fetch_list(&self.topic).await?;
        let candidates = articles_with_images(&response.articles);
        let article = select_article(&candidates, &mut rand::thread_rng())
            .ok_or(ScreenError::NoArticlesWithImages)?
            .clone();

        let image_url = article.image_url.as_deref().unwrap_or_default();
        let image = self.client.fetch_image(image_url).await?;

        if let Some(cache) = &self.cache {
            cache.save(&article, Some(image.bytes()));
            info!("New article cached");
        }

        Ok(ArticleView {
            article,
            image,
            origin: ContentOrigin::Network,
        })
    }

    fn fresh_cache(&self) -> Option<&CacheManager> {
        self.cache.as_ref().filter(|cache| !cache.is_expired())
    }

    /// Fetches the full listing for the topic without touching the cache
    pub async fn fetch_headlines(&self) -> Result<Vec<Article>, ScreenError> {
        let response = self.client.fetch_list(&self.topic).await?;
        Ok(response.articles)
    }
}

/// Articles with a non-empty image reference, in listing order
pub fn articles_with_images(articles: &[Article]) -> Vec<&Article> {
    articles.iter().filter(|article| article.has_image()).collect()
}

/// Picks one candidate uniformly at random
///
/// A single candidate is always the one returned.
pub fn select_article<'a, R: Rng + ?Sized>(
    candidates: &[&'a Article],
    rng: &mut R,
) -> Option<&'a Article> {
    candidates.choose(rng).copied()
}

/// Plain-text rendering of the screen state
pub fn render_state(state: &AppState) -> String {
    match state {
        AppState::Loading => "Loading...\n".to_string(),
        AppState::Error(message) => format!("{}\n", message),
        AppState::Content(view) => render_article(view),
    }
}

fn render_article(view: &ArticleView) -> String {
    let article = &view.article;
    let mut out = format!("{}\nSource: {}\n", article.title, article.source.name);

    if let Some(author) = article.author.as_deref().filter(|a| !a.is_empty()) {
        out.push_str(&format!("By {}\n", author));
    }
    if !article.published_at.is_empty() {
        out.push_str(&format!("Published: {}\n", article.published_at));
    }
    out.push_str(&format!("Image: {}\n", view.image.summary()));
    if let Some(content) = &article.content {
        out.push_str(&format!("\n{}\n", content));
    }
    out
}

/// One line per article: title and source
pub fn render_headlines(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|article| format!("{} ({})\n", article.title, article.source.name))
        .collect()
}
