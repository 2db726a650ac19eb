//! Core data models for the news API
//!
//! This module contains the article types deserialized from the news listing
//! endpoint, along with the HTTP client and image handling used to fetch them.

pub mod client;
pub mod image;

pub use self::client::{FetchError, NewsClient, NewsConfig};
pub use self::image::ArticleImage;

use serde::{Deserialize, Deserializer, Serialize};

/// The outlet that published an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Identifier assigned by the news API, if any
    #[serde(default)]
    pub id: Option<String>,
    /// Human-readable name of the outlet
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A single news article
///
/// Field names follow the news API's camelCase JSON keys so the same shape
/// is used for both the HTTP payload and the on-disk cache record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Headline
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Byline, when the outlet provides one
    #[serde(default)]
    pub author: Option<String>,
    /// Short summary
    #[serde(default)]
    pub description: Option<String>,
    /// Link to the full article
    #[serde(default)]
    pub url: Option<String>,
    /// Link to the lead image
    #[serde(default, rename = "urlToImage")]
    pub image_url: Option<String>,
    /// Publication time as provided by the source (usually ISO 8601)
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_at: String,
    /// Article body, often truncated by the API
    #[serde(default)]
    pub content: Option<String>,
    /// Publishing outlet
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: Source,
}

impl Article {
    /// Returns true when the article carries a non-empty image reference
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Top-level response envelope from the news listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    /// API status string, "ok" on success
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Total number of matches reported by the API
    #[serde(default)]
    pub total_results: u64,
    /// Articles in the order the API returned them
    #[serde(default, deserialize_with = "null_as_default")]
    pub articles: Vec<Article>,
}

/// The news API sends explicit `null` for fields it has no value for.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
