//! Wire types for the external catalogs and their conversion into [`MediaEntry`].

use serde::Deserialize;

use super::{MediaEntry, MediaSource, MediaType};

/// Longest overview kept from an AniList description, in characters
pub const MAX_OVERVIEW_CHARS: usize = 500;

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paged response from `/search/movie` and `/search/tv`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvShow {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Subset of `/tv/{id}` we care about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbTvDetails {
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
}

impl TmdbMovie {
    pub fn into_entry(self, image_base_url: &str) -> MediaEntry {
        let mut entry = MediaEntry::new(
            format!("tmdb_movie_{}", self.id),
            MediaSource::Tmdb,
            MediaType::Movie,
            self.title.unwrap_or_else(|| "Unknown".to_string()),
        )
        .with_genres(tmdb_genre_names(&self.genre_ids));
        entry.overview = self.overview.unwrap_or_default();
        entry.year = self.release_date.as_deref().and_then(parse_year);
        entry.score = self.vote_average;
        entry.poster_url = poster_url(image_base_url, self.poster_path.as_deref());
        entry
    }
}

impl TmdbTvShow {
    pub fn into_entry(self, image_base_url: &str, total_episodes: Option<u32>) -> MediaEntry {
        let mut entry = MediaEntry::new(
            format!("tmdb_tv_{}", self.id),
            MediaSource::Tmdb,
            MediaType::Tv,
            self.name.unwrap_or_else(|| "Unknown".to_string()),
        )
        .with_genres(tmdb_genre_names(&self.genre_ids));
        entry.overview = self.overview.unwrap_or_default();
        entry.year = self.first_air_date.as_deref().and_then(parse_year);
        entry.score = self.vote_average;
        entry.total_episodes = total_episodes;
        entry.poster_url = poster_url(image_base_url, self.poster_path.as_deref());
        entry
    }
}

/// Year from a `YYYY-MM-DD` date; TMDB sends `""` for unknown dates
fn parse_year(date: &str) -> Option<i32> {
    date.get(..4).and_then(|year| year.parse().ok())
}

fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> Option<String> {
    poster_path
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}{}", image_base_url, path))
}

/// Maps TMDB genre ids (movie and TV lists) to display names, skipping unknown ids
pub fn tmdb_genre_names(ids: &[u32]) -> Vec<&'static str> {
    ids.iter()
        .filter_map(|id| {
            let name = match id {
                28 => "Action",
                12 => "Adventure",
                16 => "Animation",
                35 => "Comedy",
                80 => "Crime",
                99 => "Documentary",
                18 => "Drama",
                10751 => "Family",
                14 => "Fantasy",
                36 => "History",
                27 => "Horror",
                10402 => "Music",
                9648 => "Mystery",
                10749 => "Romance",
                878 => "Science Fiction",
                10770 => "TV Movie",
                53 => "Thriller",
                10752 => "War",
                37 => "Western",
                10759 => "Action & Adventure",
                10762 => "Kids",
                10763 => "News",
                10764 => "Reality",
                10765 => "Sci-Fi & Fantasy",
                10766 => "Soap",
                10767 => "Talk",
                10768 => "War & Politics",
                _ => return None,
            };
            Some(name)
        })
        .collect()
}

// ============================================================================
// AniList GraphQL Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AniListResponse {
    #[serde(default)]
    pub data: Option<AniListData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AniListData {
    #[serde(default)]
    pub page: Option<AniListPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AniListPage {
    #[serde(default)]
    pub media: Vec<AniListMedia>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AniListMedia {
    pub id: u64,
    #[serde(default)]
    pub title: AniListTitle,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub season_year: Option<i32>,
    #[serde(default)]
    pub start_date: Option<AniListDate>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// 0-100 scale
    #[serde(default)]
    pub average_score: Option<u32>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub chapters: Option<u32>,
    #[serde(default)]
    pub cover_image: Option<AniListCover>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AniListTitle {
    #[serde(default)]
    pub romaji: Option<String>,
    #[serde(default)]
    pub english: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AniListDate {
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AniListCover {
    #[serde(default)]
    pub large: Option<String>,
}

impl AniListMedia {
    /// Converts a GraphQL media node; `media_type` must be anime or manga
    pub fn into_entry(self, media_type: MediaType) -> MediaEntry {
        let title = self
            .title
            .english
            .or(self.title.romaji)
            .unwrap_or_else(|| "Unknown".to_string());

        let mut entry = MediaEntry::new(
            format!("anilist_{}_{}", media_type, self.id),
            MediaSource::Anilist,
            media_type,
            title,
        )
        .with_genres(self.genres);
        entry.overview = self
            .description
            .map(|d| d.chars().take(MAX_OVERVIEW_CHARS).collect())
            .unwrap_or_default();
        entry.year = self
            .season_year
            .or_else(|| self.start_date.and_then(|d| d.year));
        entry.score = self
            .average_score
            .filter(|s| *s > 0)
            .map(|s| f64::from(s) / 10.0);
        entry.poster_url = self.cover_image.and_then(|c| c.large);

        if media_type == MediaType::Anime {
            entry.total_episodes = self.episodes;
        } else {
            entry.total_chapters = self.chapters;
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaStatus;

    #[test]
    fn test_tmdb_movie_to_entry() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "overview": "A thief who steals corporate secrets",
            "release_date": "2010-07-15",
            "vote_average": 8.4,
            "genre_ids": [28, 878, 12, 99999],
            "poster_path": "/inception.jpg"
        }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        let entry = movie.into_entry("https://image.tmdb.org/t/p/w500");

        assert_eq!(entry.id, "tmdb_movie_27205");
        assert_eq!(entry.source, MediaSource::Tmdb);
        assert_eq!(entry.media_type, MediaType::Movie);
        assert_eq!(entry.title, "Inception");
        assert_eq!(entry.year, Some(2010));
        assert_eq!(entry.score, Some(8.4));
        assert_eq!(entry.genres, vec!["Action", "Science Fiction", "Adventure"]);
        assert_eq!(
            entry.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/inception.jpg")
        );
        assert_eq!(entry.status, MediaStatus::Planned);
    }

    #[test]
    fn test_tmdb_movie_with_blank_fields() {
        let json = r#"{"id": 1, "release_date": "", "poster_path": null}"#;
        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        let entry = movie.into_entry("http://img");

        assert_eq!(entry.title, "Unknown");
        assert_eq!(entry.year, None);
        assert_eq!(entry.poster_url, None);
        assert!(entry.overview.is_empty());
    }

    #[test]
    fn test_tmdb_tv_to_entry_carries_episode_total() {
        let json = r#"{
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "vote_average": 8.9,
            "genre_ids": [18, 80]
        }"#;

        let show: TmdbTvShow = serde_json::from_str(json).unwrap();
        let entry = show.into_entry("http://img", Some(62));

        assert_eq!(entry.id, "tmdb_tv_1396");
        assert_eq!(entry.media_type, MediaType::Tv);
        assert_eq!(entry.year, Some(2008));
        assert_eq!(entry.total_episodes, Some(62));
        assert_eq!(entry.genres, vec!["Drama", "Crime"]);
    }

    #[test]
    fn test_anilist_anime_to_entry() {
        let json = r#"{
            "data": {
                "Page": {
                    "media": [{
                        "id": 16498,
                        "title": { "romaji": "Shingeki no Kyojin", "english": "Attack on Titan" },
                        "description": "Several hundred years ago...",
                        "seasonYear": 2013,
                        "genres": ["Action", "Drama", "Fantasy"],
                        "averageScore": 85,
                        "episodes": 25,
                        "coverImage": { "large": "https://img.anili.st/aot.jpg" }
                    }]
                }
            }
        }"#;

        let response: AniListResponse = serde_json::from_str(json).unwrap();
        let media = response.data.unwrap().page.unwrap().media;
        let entry = media.into_iter().next().unwrap().into_entry(MediaType::Anime);

        assert_eq!(entry.id, "anilist_anime_16498");
        assert_eq!(entry.title, "Attack on Titan");
        assert_eq!(entry.year, Some(2013));
        assert_eq!(entry.score, Some(8.5));
        assert_eq!(entry.total_episodes, Some(25));
        assert_eq!(entry.total_chapters, None);
        assert_eq!(entry.poster_url.as_deref(), Some("https://img.anili.st/aot.jpg"));
    }

    #[test]
    fn test_anilist_manga_falls_back_to_romaji_and_start_year() {
        let json = r#"{
            "id": 30013,
            "title": { "romaji": "One Piece", "english": null },
            "startDate": { "year": 1997 },
            "chapters": null,
            "averageScore": null
        }"#;

        let media: AniListMedia = serde_json::from_str(json).unwrap();
        let entry = media.into_entry(MediaType::Manga);

        assert_eq!(entry.id, "anilist_manga_30013");
        assert_eq!(entry.title, "One Piece");
        assert_eq!(entry.year, Some(1997));
        assert_eq!(entry.score, None);
        assert_eq!(entry.total_chapters, None);
    }

    #[test]
    fn test_anilist_overview_is_truncated() {
        let media = AniListMedia {
            id: 1,
            title: AniListTitle::default(),
            description: Some("x".repeat(MAX_OVERVIEW_CHARS + 50)),
            season_year: None,
            start_date: None,
            genres: vec![],
            average_score: None,
            episodes: None,
            chapters: None,
            cover_image: None,
        };

        let entry = media.into_entry(MediaType::Anime);
        assert_eq!(entry.title, "Unknown");
        assert_eq!(entry.overview.chars().count(), MAX_OVERVIEW_CHARS);
    }
}
