//! TMDB provider
//!
//! Movies come from `/search/movie`. TV comes from `/search/tv`, followed by
//! one `/tv/{id}` lookup per show to learn its episode count.
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{
        catalog::{TmdbMovie, TmdbSearchResponse, TmdbTvDetails, TmdbTvShow},
        MediaEntry, MediaType,
    },
    services::providers::{ensure_success, CatalogProvider},
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
}

impl TmdbProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String, image_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            image_url,
        }
    }

    async fn search_page<T>(&self, path: &str, query: &str) -> AppResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/search/{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("page", "1"),
            ])
            .send()
            .await?;

        let page: TmdbSearchResponse<T> = ensure_success("TMDB", response, AppError::Catalog)
            .await?
            .json()
            .await?;
        Ok(page.results)
    }

    async fn search_movies(&self, query: &str, limit: usize) -> AppResult<Vec<MediaEntry>> {
        let movies: Vec<TmdbMovie> = self.search_page("movie", query).await?;
        Ok(movies
            .into_iter()
            .take(limit)
            .map(|movie| movie.into_entry(&self.image_url))
            .collect())
    }

    async fn search_tv(&self, query: &str, limit: usize) -> AppResult<Vec<MediaEntry>> {
        let shows: Vec<TmdbTvShow> = self.search_page("tv", query).await?;

        let mut tasks = Vec::new();
        for show in shows.into_iter().take(limit) {
            let provider = self.clone();
            let task = tokio::spawn(async move {
                let total_episodes = provider.episode_count(show.id).await;
                (show, total_episodes)
            });
            tasks.push(task);
        }

        let mut entries = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok((show, total_episodes)) => {
                    entries.push(show.into_entry(&self.image_url, total_episodes))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                    return Err(AppError::Internal(e.to_string()));
                }
            }
        }
        Ok(entries)
    }

    /// Episode total from the show's detail page; `None` when the lookup fails
    async fn episode_count(&self, tv_id: u64) -> Option<u32> {
        match self.tv_details(tv_id).await {
            Ok(details) => details.number_of_episodes,
            Err(e) => {
                tracing::debug!(tv_id = tv_id, error = %e, "TV detail lookup failed");
                None
            }
        }
    }

    async fn tv_details(&self, tv_id: u64) -> AppResult<TmdbTvDetails> {
        let url = format!("{}/tv/{}", self.api_url, tv_id);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        Ok(ensure_success("TMDB", response, AppError::Catalog)
            .await?
            .json()
            .await?)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search(
        &self,
        query: &str,
        media_type: MediaType,
        limit: usize,
    ) -> AppResult<Vec<MediaEntry>> {
        let entries = match media_type {
            MediaType::Movie => self.search_movies(query, limit).await?,
            MediaType::Tv => self.search_tv(query, limit).await?,
            other => {
                return Err(AppError::UnsupportedMediaType {
                    provider: "TMDB",
                    media_type: other,
                })
            }
        };

        tracing::info!(
            query = %query,
            media_type = %media_type,
            results = entries.len(),
            provider = self.name(),
            "Catalog search completed"
        );

        Ok(entries)
    }

    fn supports(&self, media_type: MediaType) -> bool {
        matches!(media_type, MediaType::Movie | MediaType::Tv)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
