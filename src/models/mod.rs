use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod catalog;
mod preferences;
mod session;

pub use preferences::Preferences;
pub use session::{Role, Session, Turn, DEFAULT_USER_ID};

/// Kind of media a catalog entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Anime,
    Movie,
    Tv,
    Manga,
}

impl MediaType {
    /// Resolves a media type by substring scan over lower-cased text.
    ///
    /// Order matters: "anime" wins over "movie", which wins over the TV
    /// aliases, which win over "manga".
    pub fn detect(lower: &str) -> Option<Self> {
        if lower.contains("anime") {
            Some(MediaType::Anime)
        } else if lower.contains("movie") {
            Some(MediaType::Movie)
        } else if ["tv", "show", "series"].iter().any(|w| lower.contains(w)) {
            Some(MediaType::Tv)
        } else if lower.contains("manga") {
            Some(MediaType::Manga)
        } else {
            None
        }
    }

    /// Words that name this media type in a message
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            MediaType::Anime => &["anime"],
            MediaType::Movie => &["movie", "movies"],
            MediaType::Tv => &["tv", "show", "shows", "series"],
            MediaType::Manga => &["manga"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Anime => "anime",
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Manga => "manga",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a tracked entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaStatus {
    Watching,
    Reading,
    Completed,
    Dropped,
    #[default]
    Planned,
    OnHold,
}

impl MediaStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaStatus::Watching => "watching",
            MediaStatus::Reading => "reading",
            MediaStatus::Completed => "completed",
            MediaStatus::Dropped => "dropped",
            MediaStatus::Planned => "planned",
            MediaStatus::OnHold => "on_hold",
        }
    }

    /// Finished or abandoned entries are never suggested again
    pub fn is_closed(self) -> bool {
        matches!(self, MediaStatus::Completed | MediaStatus::Dropped)
    }
}

impl Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog an entry was discovered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSource {
    Tmdb,
    Anilist,
}

/// Normalized record of a discoverable or tracked title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaEntry {
    /// Source-qualified id, e.g. `anilist_anime_16498` or `tmdb_movie_27205`
    pub id: String,
    pub source: MediaSource,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Normalized to a 0-10 scale
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub total_episodes: Option<u32>,
    #[serde(default)]
    pub total_chapters: Option<u32>,
    #[serde(default)]
    pub progress_episodes: u32,
    #[serde(default)]
    pub progress_chapters: u32,
    #[serde(default)]
    pub status: MediaStatus,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl MediaEntry {
    /// Creates a planned entry with no progress and no catalog metadata
    pub fn new(
        id: impl Into<String>,
        source: MediaSource,
        media_type: MediaType,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            media_type,
            title: title.into(),
            overview: String::new(),
            year: None,
            genres: Vec::new(),
            score: None,
            total_episodes: None,
            total_chapters: None,
            progress_episodes: 0,
            progress_chapters: 0,
            status: MediaStatus::Planned,
            poster_url: None,
            added_at: Utc::now(),
        }
    }

    /// Sets the genre set, dropping duplicates while keeping first-seen order
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres.clear();
        for genre in genres {
            let genre = genre.into();
            if !self.genres.contains(&genre) {
                self.genres.push(genre);
            }
        }
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_status(mut self, status: MediaStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_episodes(mut self, watched: u32, total: Option<u32>) -> Self {
        self.progress_episodes = watched;
        self.total_episodes = total;
        self
    }

    pub fn with_chapters(mut self, read: u32, total: Option<u32>) -> Self {
        self.progress_chapters = read;
        self.total_chapters = total;
        self
    }

    /// Total episodes or chapters, depending on the media type
    pub fn total_units(&self) -> Option<u32> {
        match self.media_type {
            MediaType::Anime | MediaType::Tv => self.total_episodes,
            MediaType::Manga => self.total_chapters,
            MediaType::Movie => None,
        }
    }
}

/// Renders a score the way users expect to read it: `9.0`, `8.6`, `120.0`
pub fn display_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        score.to_string()
    }
}
