use std::sync::Arc;

use crate::{
    models::{MediaEntry, MediaType},
    services::providers::CatalogProvider,
};

/// Catalog search as seen by the orchestrator.
///
/// Never fails: any upstream problem surfaces as an empty result.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Discovery: Send + Sync {
    async fn search(&self, query: &str, media_type: MediaType, limit: usize) -> Vec<MediaEntry>;
}

/// Routes each search to the first provider that catalogs the media type
pub struct CatalogDiscovery {
    providers: Vec<Arc<dyn CatalogProvider>>,
}

impl CatalogDiscovery {
    pub fn new(providers: Vec<Arc<dyn CatalogProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait::async_trait]
impl Discovery for CatalogDiscovery {
    async fn search(&self, query: &str, media_type: MediaType, limit: usize) -> Vec<MediaEntry> {
        if query.trim().is_empty() {
            tracing::warn!(media_type = %media_type, "Skipping search with empty query");
            return Vec::new();
        }

        let Some(provider) = self.providers.iter().find(|p| p.supports(media_type)) else {
            tracing::warn!(media_type = %media_type, "No catalog provider for media type");
            return Vec::new();
        };

        match provider.search(query, media_type, limit).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    query = %query,
                    provider = provider.name(),
                    "Catalog search failed"
                );
                Vec::new()
            }
        }
    }
}
