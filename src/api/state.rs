use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    services::{
        providers::{self, AniListProvider, CatalogProvider, TmdbProvider},
        CatalogDiscovery, Discovery, GeminiResponder, InMemoryLibraryStore, InMemorySessionStore,
        LibraryStore, Metrics, Orchestrator, Responder, SessionStore,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub library: Arc<dyn LibraryStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wires the in-memory stores to the live catalog and assistant backends
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http_client = providers::http_client(config.http_timeout_secs)?;

        let catalog: Vec<Arc<dyn CatalogProvider>> = vec![
            Arc::new(TmdbProvider::new(
                http_client.clone(),
                config.tmdb_api_key.clone(),
                config.tmdb_api_url.clone(),
                config.tmdb_image_url.clone(),
            )),
            Arc::new(AniListProvider::new(
                http_client.clone(),
                config.anilist_api_url.clone(),
            )),
        ];

        let responder = GeminiResponder::new(
            http_client,
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
        );

        Ok(Self::with_components(
            Arc::new(CatalogDiscovery::new(catalog)),
            Arc::new(responder),
        ))
    }

    /// Fresh stores and metrics around the given collaborators
    pub fn with_components(discovery: Arc<dyn Discovery>, responder: Arc<dyn Responder>) -> Self {
        let library: Arc<dyn LibraryStore> = Arc::new(InMemoryLibraryStore::new());
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let metrics = Arc::new(Metrics::new());

        let orchestrator = Orchestrator::new(
            sessions.clone(),
            library.clone(),
            discovery,
            responder,
            metrics.clone(),
        );

        Self {
            orchestrator: Arc::new(orchestrator),
            library,
            sessions,
            metrics,
        }
    }
}
