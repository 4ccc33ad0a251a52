use serde::{Deserialize, Serialize};

use super::MediaEntry;

/// Score at or above which an added entry teaches us its genres
pub const FAVORITE_SCORE_THRESHOLD: f64 = 8.0;

/// Preference signals derived from a session's library
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    /// Genres of highly rated additions, in the order they were learned
    pub favorite_genres: Vec<String>,
    /// IDs of entries the user liked
    pub liked_items: Vec<String>,
    /// IDs of entries the user disliked
    pub disliked_items: Vec<String>,
}

impl Preferences {
    /// Creates empty preferences
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a newly added entry into the preference signals.
    ///
    /// Only entries scoring at least 8/10 contribute their genres.
    pub fn learn_from(&mut self, entry: &MediaEntry) {
        let Some(score) = entry.score else {
            return;
        };
        if score < FAVORITE_SCORE_THRESHOLD {
            return;
        }
        for genre in &entry.genres {
            if !self.favorite_genres.contains(genre) {
                self.favorite_genres.push(genre.clone());
            }
        }
    }

    pub fn is_favorite(&self, genre: &str) -> bool {
        self.favorite_genres.iter().any(|g| g == genre)
    }

    /// The first `n` favorite genres
    pub fn top_genres(&self, n: usize) -> &[String] {
        &self.favorite_genres[..n.min(self.favorite_genres.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaSource, MediaType};

    fn entry(score: Option<f64>, genres: &[&str]) -> MediaEntry {
        let mut entry = MediaEntry::new("anilist_anime_1", MediaSource::Anilist, MediaType::Anime, "X")
            .with_genres(genres.iter().copied());
        entry.score = score;
        entry
    }

    #[test]
    fn test_new_preferences() {
        let prefs = Preferences::new();
        assert!(prefs.favorite_genres.is_empty());
        assert!(prefs.liked_items.is_empty());
        assert!(prefs.disliked_items.is_empty());
    }

    #[test]
    fn test_learns_genres_from_high_scores() {
        let mut prefs = Preferences::new();
        prefs.learn_from(&entry(Some(8.0), &["Action", "Drama"]));
        prefs.learn_from(&entry(Some(9.1), &["Drama", "Mystery"]));
        assert_eq!(prefs.favorite_genres, vec!["Action", "Drama", "Mystery"]);
    }

    #[test]
    fn test_ignores_low_or_missing_scores() {
        let mut prefs = Preferences::new();
        prefs.learn_from(&entry(Some(7.9), &["Horror"]));
        prefs.learn_from(&entry(None, &["Comedy"]));
        assert!(prefs.favorite_genres.is_empty());
    }

    #[test]
    fn test_top_genres_truncates() {
        let mut prefs = Preferences::new();
        prefs.learn_from(&entry(Some(10.0), &["A", "B", "C", "D", "E", "F"]));
        assert_eq!(prefs.top_genres(5), &["A", "B", "C", "D", "E"]);
        assert_eq!(prefs.top_genres(10).len(), 6);
    }
}
