//! User-facing text for each orchestrator outcome.

use std::fmt::Write;

use crate::{
    models::{display_score, MediaEntry},
    services::recommendations::Recommendation,
};

/// Search results shown per reply
pub const SEARCH_DISPLAY_LIMIT: usize = 5;
/// Library entries shown per reply
pub const LIBRARY_DISPLAY_LIMIT: usize = 10;
const OVERVIEW_PREVIEW_CHARS: usize = 100;

pub const GREETING: &str = "\
Hello! I'm your media concierge.

I can help you:
- **Search** for anime, movies, TV shows, and manga
- **Add** titles to your personal library
- **Track** what you are watching or reading
- **Recommend** what to pick up next from your library

Try saying:
- \"search for attack on titan anime\"
- \"add Naruto to my library\"
- \"show my library\"
- \"recommend something to watch\"

What would you like to do?";

pub const ADD_GUIDANCE: &str =
    "Please tell me what to add. Example: 'add Naruto to my library'";

pub const MEDIA_TYPE_QUESTION: &str =
    "What type of media would you like to search for? (anime, movie, tv, or manga)";

const SEARCH_TIP: &str = "Tip: say 'add [title] to my library' to save it!";

fn score_or_na(score: Option<f64>) -> String {
    score.map(display_score).unwrap_or_else(|| "N/A".to_string())
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(OVERVIEW_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub fn added(entry: &MediaEntry) -> String {
    format!(
        "Added **{}** to your library!\nType: {} | Score: {}/10",
        entry.title,
        entry.media_type,
        score_or_na(entry.score)
    )
}

pub fn not_found(title: &str) -> String {
    format!(
        "Couldn't find '{}'. Try searching first to see available options.",
        title
    )
}

pub fn search_results(entries: &[MediaEntry]) -> String {
    if entries.is_empty() {
        return "No results found.".to_string();
    }

    let mut out = format!("Found {} results:\n\n", entries.len());
    for (rank, entry) in entries.iter().take(SEARCH_DISPLAY_LIMIT).enumerate() {
        let year = entry
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(out, "{}. **{}** ({})", rank + 1, entry.title, year);
        let _ = writeln!(out, "   Score: {}/10", score_or_na(entry.score));
        if !entry.overview.is_empty() {
            let _ = writeln!(out, "   {}", preview(&entry.overview));
        }
        let _ = writeln!(out, "   ID: {}\n", entry.id);
    }
    out.push('\n');
    out.push_str(SEARCH_TIP);
    out
}

pub fn recommendations(recs: &[Recommendation]) -> String {
    if recs.is_empty() {
        return "No recommendations available yet. Add some items to your library first!"
            .to_string();
    }

    let mut out = format!("Here are my top {} recommendations for you:\n\n", recs.len());
    for (rank, rec) in recs.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. **{}** - Score: {}",
            rank + 1,
            rec.item.title,
            display_score(rec.recommendation_score)
        );
        let _ = writeln!(out, "   {}", rec.reason);
        let _ = writeln!(
            out,
            "   Type: {} | Status: {}\n",
            rec.item.media_type, rec.item.status
        );
    }
    out
}

pub fn library(entries: &[MediaEntry]) -> String {
    if entries.is_empty() {
        return "Your library is empty. Start by searching and adding some content!".to_string();
    }

    let mut out = format!("Your library ({} items):\n\n", entries.len());
    for entry in entries.iter().take(LIBRARY_DISPLAY_LIMIT) {
        let _ = writeln!(out, "- **{}** ({})", entry.title, entry.media_type);
        let _ = write!(out, "  Status: {}", entry.status);
        if entry.progress_episodes > 0 {
            let _ = write!(out, " | Episodes: {}", entry.progress_episodes);
        }
        if entry.progress_chapters > 0 {
            let _ = write!(out, " | Chapters: {}", entry.progress_chapters);
        }
        out.push('\n');
    }

    if entries.len() > LIBRARY_DISPLAY_LIMIT {
        let _ = write!(
            out,
            "\n... and {} more items",
            entries.len() - LIBRARY_DISPLAY_LIMIT
        );
    }
    out
}
