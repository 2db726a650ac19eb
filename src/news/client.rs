//! News API client
//!
//! Fetches the article listing from a NewsAPI-compatible `everything` endpoint
//! and downloads article images. Each call is a single GET whose body is
//! streamed into memory before being parsed.

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client, RequestBuilder, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::{ArticleImage, NewsResponse};

/// Default listing endpoint
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/everything";

/// Upper bound on redirect hops; every redirect below it is followed
const MAX_REDIRECTS: usize = 10;

/// Errors that can occur when talking to the news API
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, redirect or body transfer failure
    ///
    /// The request URL is stripped because the listing URL carries the API key.
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Server answered with something other than 200 OK
    #[error("HTTP error: {0}")]
    Status(StatusCode),

    /// Body was not JSON of the expected shape
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Body was not a decodable image
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// The configured endpoint is not a valid URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err.without_url())
    }
}

impl FetchError {
    /// Transport-level failure or non-200 status
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Request(_) | FetchError::Status(_))
    }

    /// Malformed JSON or image bytes
    pub fn is_parse(&self) -> bool {
        matches!(self, FetchError::Json(_) | FetchError::Image(_))
    }
}

/// Connection settings for the news API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsConfig {
    /// Listing endpoint, without query string
    pub base_url: String,
    /// API key sent as the `apiKey` query parameter
    pub api_key: String,
    /// Two-letter language code
    pub language: String,
    /// Sort field (`publishedAt`, `relevancy`, `popularity`)
    pub sort_by: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            language: "en".to_string(),
            sort_by: "publishedAt".to_string(),
            user_agent: concat!("sportnews/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl NewsConfig {
    /// Default configuration with the given API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

/// Client for the news listing endpoint and article images
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    config: NewsConfig,
}

impl NewsClient {
    /// Creates a client that follows redirects transparently
    pub fn new(config: NewsConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds the listing URL for a topic
    ///
    /// `<base>?q=<topic>&apiKey=<key>&language=<lang>&sortBy=<sort>`
    pub fn list_url(&self, topic: &str) -> Result<Url, FetchError> {
        let url = Url::parse_with_params(
            &self.config.base_url,
            &[
                ("q", topic),
                ("apiKey", self.config.api_key.as_str()),
                ("language", self.config.language.as_str()),
                ("sortBy", self.config.sort_by.as_str()),
            ],
        )?;
        Ok(url)
    }

    /// Fetches the article listing for a topic
    ///
    /// # Returns
    /// * `Ok(NewsResponse)` - The parsed response envelope
    /// * `Err(FetchError)` - Network failure, non-200 status, or malformed JSON
    pub async fn fetch_list(&self, topic: &str) -> Result<NewsResponse, FetchError> {
        let url = self.list_url(topic)?;
        debug!(topic, "fetching article list");

        let request = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json");
        let body = read_body(request).await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// Downloads and decodes the image at `url`
    ///
    /// # Returns
    /// * `Ok(ArticleImage)` - The image bytes, validated by decoding
    /// * `Err(FetchError)` - Network failure, non-200 status, or undecodable bytes
    pub async fn fetch_image(&self, url: &str) -> Result<ArticleImage, FetchError> {
        debug!(url, "fetching article image");
        let body = read_body(self.client.get(url)).await?;

        Ok(ArticleImage::decode(body)?)
    }
}

/// Sends the request and accumulates the body chunk by chunk
async fn read_body(request: RequestBuilder) -> Result<Vec<u8>, FetchError> {
    let response = request.send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status(status));
    }

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(body)
}
