use std::collections::HashMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::{MediaEntry, MediaStatus, MediaType, Preferences};

/// Number of favorite genres surfaced in a context summary
const SUMMARY_GENRES: usize = 5;

/// Optional filters for a library listing; both must hold when both are set
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LibraryFilter {
    pub media_type: Option<MediaType>,
    pub status: Option<MediaStatus>,
}

impl LibraryFilter {
    pub fn by_type(media_type: Option<MediaType>) -> Self {
        Self {
            media_type,
            status: None,
        }
    }

    fn accepts(&self, entry: &MediaEntry) -> bool {
        self.media_type.map_or(true, |t| entry.media_type == t)
            && self.status.map_or(true, |s| entry.status == s)
    }
}

/// Partial progress change; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressUpdate {
    pub episodes: Option<u32>,
    pub chapters: Option<u32>,
    pub status: Option<MediaStatus>,
}

/// Per-session library plus the preferences derived from it
#[async_trait::async_trait]
pub trait LibraryStore: Send + Sync {
    /// Adds an entry unless its id is already tracked. Returns whether it was inserted.
    ///
    /// Insertion also folds the entry into the session's preferences.
    async fn add(&self, session_id: &str, entry: MediaEntry) -> bool;

    /// Applies a progress update. Returns `false` when the id is not in the library.
    async fn update_progress(&self, session_id: &str, item_id: &str, update: ProgressUpdate)
        -> bool;

    /// Entries in insertion order, narrowed by `filter`
    async fn list(&self, session_id: &str, filter: LibraryFilter) -> Vec<MediaEntry>;

    async fn preferences(&self, session_id: &str) -> Preferences;

    /// Snapshot of the library used to ground free-form replies
    async fn context_summary(&self, session_id: &str) -> ContextSummary {
        let library = self.list(session_id, LibraryFilter::default()).await;
        let preferences = self.preferences(session_id).await;
        ContextSummary::from_library(&library, &preferences)
    }
}

#[derive(Default)]
struct SessionLibrary {
    entries: Vec<MediaEntry>,
    preferences: Preferences,
}

/// Process-lifetime library store keyed by session id
#[derive(Default)]
pub struct InMemoryLibraryStore {
    libraries: RwLock<HashMap<String, SessionLibrary>>,
}

impl InMemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl LibraryStore for InMemoryLibraryStore {
    async fn add(&self, session_id: &str, entry: MediaEntry) -> bool {
        let mut libraries = self.libraries.write().await;
        let library = libraries.entry(session_id.to_string()).or_default();

        if library.entries.iter().any(|e| e.id == entry.id) {
            tracing::debug!(session_id = %session_id, item_id = %entry.id, "Entry already in library");
            return false;
        }

        library.preferences.learn_from(&entry);
        tracing::info!(
            session_id = %session_id,
            item_id = %entry.id,
            media_type = %entry.media_type,
            "Added entry to library"
        );
        library.entries.push(entry);
        true
    }

    async fn update_progress(
        &self,
        session_id: &str,
        item_id: &str,
        update: ProgressUpdate,
    ) -> bool {
        let mut libraries = self.libraries.write().await;
        let Some(entry) = libraries
            .get_mut(session_id)
            .and_then(|library| library.entries.iter_mut().find(|e| e.id == item_id))
        else {
            return false;
        };

        if let Some(episodes) = update.episodes {
            entry.progress_episodes = episodes;
        }
        if let Some(chapters) = update.chapters {
            entry.progress_chapters = chapters;
        }
        if let Some(status) = update.status {
            entry.status = status;
        }

        // Progress past the known total is stored as given
        let episodes_over = entry.total_episodes.is_some_and(|t| entry.progress_episodes > t);
        let chapters_over = entry.total_chapters.is_some_and(|t| entry.progress_chapters > t);
        if episodes_over || chapters_over {
            tracing::warn!(
                session_id = %session_id,
                item_id = %item_id,
                progress_episodes = entry.progress_episodes,
                progress_chapters = entry.progress_chapters,
                "Progress exceeds known total"
            );
        }

        true
    }

    async fn list(&self, session_id: &str, filter: LibraryFilter) -> Vec<MediaEntry> {
        let libraries = self.libraries.read().await;
        libraries
            .get(session_id)
            .map(|library| {
                library
                    .entries
                    .iter()
                    .filter(|e| filter.accepts(e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn preferences(&self, session_id: &str) -> Preferences {
        let libraries = self.libraries.read().await;
        libraries
            .get(session_id)
            .map(|library| library.preferences.clone())
            .unwrap_or_default()
    }
}

/// Entries per media type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub anime: usize,
    pub movie: usize,
    pub tv: usize,
    pub manga: usize,
}

impl TypeCounts {
    fn record(&mut self, media_type: MediaType) {
        match media_type {
            MediaType::Anime => self.anime += 1,
            MediaType::Movie => self.movie += 1,
            MediaType::Tv => self.tv += 1,
            MediaType::Manga => self.manga += 1,
        }
    }
}

/// Entries per lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub watching: usize,
    pub reading: usize,
    pub completed: usize,
    pub dropped: usize,
    pub planned: usize,
    pub on_hold: usize,
}

impl StatusCounts {
    fn record(&mut self, status: MediaStatus) {
        match status {
            MediaStatus::Watching => self.watching += 1,
            MediaStatus::Reading => self.reading += 1,
            MediaStatus::Completed => self.completed += 1,
            MediaStatus::Dropped => self.dropped += 1,
            MediaStatus::Planned => self.planned += 1,
            MediaStatus::OnHold => self.on_hold += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContextSummary {
    pub library_size: usize,
    pub types: TypeCounts,
    pub statuses: StatusCounts,
    /// At most five, in the order they were learned
    pub favorite_genres: Vec<String>,
}

impl ContextSummary {
    pub fn from_library(library: &[MediaEntry], preferences: &Preferences) -> Self {
        let mut types = TypeCounts::default();
        let mut statuses = StatusCounts::default();
        for entry in library {
            types.record(entry.media_type);
            statuses.record(entry.status);
        }

        Self {
            library_size: library.len(),
            types,
            statuses,
            favorite_genres: preferences.top_genres(SUMMARY_GENRES).to_vec(),
        }
    }
}

impl Display for ContextSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let TypeCounts {
            anime,
            movie,
            tv,
            manga,
        } = self.types;
        let s = self.statuses;

        writeln!(f, "Library: {} items", self.library_size)?;
        writeln!(f, "Types: anime={anime}, movie={movie}, tv={tv}, manga={manga}")?;
        writeln!(
            f,
            "Statuses: watching={}, reading={}, completed={}, dropped={}, planned={}, on_hold={}",
            s.watching, s.reading, s.completed, s.dropped, s.planned, s.on_hold
        )?;
        writeln!(f, "Favorite genres: {}", self.favorite_genres.join(", "))
    }
}
