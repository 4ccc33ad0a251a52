//! AniList provider
//!
//! Anime and manga both go through the public GraphQL endpoint; only the
//! `type` argument and the unit field (episodes vs chapters) differ.
use reqwest::Client as HttpClient;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{catalog::AniListResponse, MediaEntry, MediaType},
    services::providers::{ensure_success, CatalogProvider},
};

const ANIME_QUERY: &str = r#"
query ($search: String, $perPage: Int) {
  Page(page: 1, perPage: $perPage) {
    media(search: $search, type: ANIME) {
      id
      title { romaji english }
      description
      seasonYear
      genres
      averageScore
      episodes
      coverImage { large }
    }
  }
}
"#;

const MANGA_QUERY: &str = r#"
query ($search: String, $perPage: Int) {
  Page(page: 1, perPage: $perPage) {
    media(search: $search, type: MANGA) {
      id
      title { romaji english }
      description
      startDate { year }
      genres
      averageScore
      chapters
      coverImage { large }
    }
  }
}
"#;

#[derive(Clone)]
pub struct AniListProvider {
    http_client: HttpClient,
    api_url: String,
}

impl AniListProvider {
    pub fn new(http_client: HttpClient, api_url: String) -> Self {
        Self {
            http_client,
            api_url,
        }
    }

    fn query_for(media_type: MediaType) -> Option<&'static str> {
        match media_type {
            MediaType::Anime => Some(ANIME_QUERY),
            MediaType::Manga => Some(MANGA_QUERY),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for AniListProvider {
    async fn search(
        &self,
        query: &str,
        media_type: MediaType,
        limit: usize,
    ) -> AppResult<Vec<MediaEntry>> {
        let graphql = Self::query_for(media_type).ok_or(AppError::UnsupportedMediaType {
            provider: "AniList",
            media_type,
        })?;

        let body = json!({
            "query": graphql,
            "variables": { "search": query, "perPage": limit },
        });

        let response = self
            .http_client
            .post(&self.api_url)
            .json(&body)
            .send()
            .await?;

        let payload: AniListResponse = ensure_success("AniList", response, AppError::Catalog)
            .await?
            .json()
            .await?;
        let entries: Vec<MediaEntry> = payload
            .data
            .and_then(|data| data.page)
            .map(|page| page.media)
            .unwrap_or_default()
            .into_iter()
            .map(|media| media.into_entry(media_type))
            .collect();

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
        Self::query_for(media_type).is_some()
    }

    fn name(&self) -> &'static str {
        "anilist"
    }
}
