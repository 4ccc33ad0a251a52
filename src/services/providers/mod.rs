//! Catalog provider abstraction
//!
//! Each provider wraps one external catalog (TMDB for movies and TV, AniList
//! for anime and manga) and normalizes its results into `MediaEntry` records.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{MediaEntry, MediaType},
};

pub mod anilist;
pub mod tmdb;

pub use anilist::AniListProvider;
pub use tmdb::TmdbProvider;

/// Trait for catalog search backends
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search the catalog by free-text title
    ///
    /// Returns at most `limit` entries in the catalog's relevance order.
    async fn search(
        &self,
        query: &str,
        media_type: MediaType,
        limit: usize,
    ) -> AppResult<Vec<MediaEntry>>;

    /// Whether this provider can answer searches for `media_type`
    fn supports(&self, media_type: MediaType) -> bool;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Builds the shared HTTP client with the per-call timeout applied
pub fn http_client(timeout_secs: u64) -> AppResult<HttpClient> {
    HttpClient::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(AppError::from)
}

/// Turns a non-2xx response into the caller's error variant, carrying the body
pub(crate) async fn ensure_success(
    provider: &str,
    response: reqwest::Response,
    into_error: fn(String) -> AppError,
) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(into_error(format!(
        "{} returned status {}: {}",
        provider, status, body
    )))
}
