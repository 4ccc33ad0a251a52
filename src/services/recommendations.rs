use serde::Serialize;

use crate::models::{display_score, MediaEntry, MediaType, MediaStatus, Preferences};

/// Suggestions returned when the caller does not ask for a specific count
pub const DEFAULT_RECOMMENDATION_COUNT: usize = 5;

const SCORE_WEIGHT: f64 = 10.0;
const GENRE_MATCH_BONUS: f64 = 15.0;
const PLANNED_BONUS: f64 = 10.0;
const PROGRESS_WEIGHT: f64 = 20.0;
/// Progress must pass this share of the total before it counts as momentum
const PROGRESS_THRESHOLD: f64 = 0.3;
const HIGHLY_RATED: f64 = 8.0;

/// A library entry ranked for the user, with the reason it ranked
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub item: MediaEntry,
    /// Rounded to two decimal places
    pub recommendation_score: f64,
    pub reason: String,
}

/// Ranks a session's library into at most `count` suggestions.
///
/// Completed and dropped entries are skipped. Ordering is by descending
/// score; equal scores keep library order.
pub fn recommend(
    library: &[MediaEntry],
    preferences: &Preferences,
    media_type: Option<MediaType>,
    count: usize,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = library
        .iter()
        .filter(|item| media_type.map_or(true, |t| item.media_type == t))
        .filter(|item| !item.status.is_closed())
        .map(|item| Recommendation {
            item: item.clone(),
            recommendation_score: round2(score(item, preferences)),
            reason: reason(item, preferences),
        })
        .collect();

    // sort_by is stable, which keeps ties in library order
    recommendations.sort_by(|a, b| b.recommendation_score.total_cmp(&a.recommendation_score));
    recommendations.truncate(count);
    recommendations
}

/// Raw (unrounded) priority of a single entry
pub fn score(item: &MediaEntry, preferences: &Preferences) -> f64 {
    let mut total = 0.0;

    if let Some(rating) = item.score {
        total += rating * SCORE_WEIGHT;
    }

    let genre_matches = item
        .genres
        .iter()
        .filter(|genre| preferences.is_favorite(genre))
        .count();
    total += GENRE_MATCH_BONUS * genre_matches as f64;

    if item.status == MediaStatus::Planned {
        total += PLANNED_BONUS;
    }

    if matches!(item.media_type, MediaType::Anime | MediaType::Tv) {
        if let Some(episodes) = item.total_episodes.filter(|n| *n > 0) {
            let ratio = f64::from(item.progress_episodes) / f64::from(episodes);
            if ratio > PROGRESS_THRESHOLD {
                total += PROGRESS_WEIGHT * ratio;
            }
        }
    }

    total
}

fn reason(item: &MediaEntry, preferences: &Preferences) -> String {
    let mut reasons = Vec::new();

    if let Some(rating) = item.score.filter(|s| *s >= HIGHLY_RATED) {
        reasons.push(format!("highly rated ({}/10)", display_score(rating)));
    }
    if item.genres.iter().any(|g| preferences.is_favorite(g)) {
        reasons.push("matches your favorite genres".to_string());
    }
    if item.status == MediaStatus::Planned {
        reasons.push("in your plan to watch/read".to_string());
    }

    if reasons.is_empty() {
        "good match for you".to_string()
    } else {
        reasons.join(", ")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
