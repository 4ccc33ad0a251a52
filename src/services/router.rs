//! Keyword-based intent routing.
//!
//! Messages are lower-cased and checked against an ordered rule table; the
//! first rule whose predicate holds decides the action. Matching is plain
//! substring search, so keywords also fire when embedded in longer words
//! (`"hi"` inside `"this"`, `"tv"` inside `"smartvision"`).

use serde::Serialize;

use crate::models::MediaType;

/// What the orchestrator should do with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AddToLibrary,
    Search,
    Recommend,
    ListLibrary,
    Greet,
    DelegateToAssistant,
}

/// One row of the routing table
pub struct Rule {
    pub action: Action,
    pub matches: fn(&str) -> bool,
}

const ADD_VERBS: &[&str] = &["add", "save"];
const ADD_TARGETS: &[&str] = &["library", "collection", "list"];
const SEARCH_KEYWORDS: &[&str] = &["search", "find", "discover", "look for"];
const RECOMMEND_KEYWORDS: &[&str] = &["recommend", "suggestion", "what should i"];
const LIST_KEYWORDS: &[&str] = &["library", "list", "show my", "my collection"];
const GREET_KEYWORDS: &[&str] = &["hello", "hi", "hey", "help"];

/// Words dropped from an add request to leave the title behind
const TITLE_STOP_WORDS: &[&str] = &[
    "add", "save", "to", "my", "library", "collection", "please", "can", "you", "anime", "movie",
    "tv", "show", "manga", "series",
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn wants_add(text: &str) -> bool {
    contains_any(text, ADD_VERBS) && contains_any(text, ADD_TARGETS)
}

fn wants_search(text: &str) -> bool {
    contains_any(text, SEARCH_KEYWORDS)
}

fn wants_recommendation(text: &str) -> bool {
    contains_any(text, RECOMMEND_KEYWORDS)
}

fn wants_library(text: &str) -> bool {
    contains_any(text, LIST_KEYWORDS)
}

fn is_greeting(text: &str) -> bool {
    contains_any(text, GREET_KEYWORDS)
}

/// Routing rules in priority order. Anything unmatched is delegated.
pub const RULES: &[Rule] = &[
    Rule { action: Action::AddToLibrary, matches: wants_add },
    Rule { action: Action::Search, matches: wants_search },
    Rule { action: Action::Recommend, matches: wants_recommendation },
    Rule { action: Action::ListLibrary, matches: wants_library },
    Rule { action: Action::Greet, matches: is_greeting },
];

/// A classified message and the parameters pulled out of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub action: Action,
    /// Lower-cased title for add requests; `None` when nothing is left after stop words
    pub title: Option<String>,
    pub media_type: Option<MediaType>,
}

/// Classifies free text. Never fails: unmatched input is delegated.
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();

    let action = RULES
        .iter()
        .find(|rule| (rule.matches)(&lower))
        .map(|rule| rule.action)
        .unwrap_or(Action::DelegateToAssistant);

    let title = match action {
        Action::AddToLibrary => extract_title(&lower),
        _ => None,
    };

    Intent {
        action,
        title,
        media_type: MediaType::detect(&lower),
    }
}

/// Title left after removing stop words from a lower-cased add request
pub fn extract_title(text: &str) -> Option<String> {
    let title = strip_stop_words(&text.to_lowercase());
    (!title.is_empty()).then_some(title)
}

/// Same words as [`extract_title`], with the user's own capitalisation
pub fn display_title(text: &str) -> String {
    strip_stop_words(text)
}

fn strip_stop_words(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !TITLE_STOP_WORDS.contains(&word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derives a catalog query from a search message.
///
/// Drops the search verbs, `look` when it opens `look for`, and every alias
/// of the resolved media type, then trims a leading `for`. Comparison is
/// case-insensitive; kept words retain their original casing.
pub fn search_query(text: &str, media_type: MediaType) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut kept: Vec<&str> = Vec::with_capacity(words.len());

    for (i, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        let next_is_for = words
            .get(i + 1)
            .is_some_and(|next| next.eq_ignore_ascii_case("for"));

        if matches!(lower.as_str(), "search" | "find" | "discover")
            || (lower == "look" && next_is_for)
            || media_type.aliases().contains(&lower.as_str())
        {
            continue;
        }
        kept.push(*word);
    }

    let start = kept
        .iter()
        .position(|w| !w.eq_ignore_ascii_case("for"))
        .unwrap_or(kept.len());
    kept[start..].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_requires_verb_and_target() {
        assert_eq!(classify("add Naruto to my library").action, Action::AddToLibrary);
        assert_eq!(classify("Save Bleach in my collection").action, Action::AddToLibrary);
        assert_eq!(classify("add naruto").action, Action::DelegateToAssistant);
    }

    #[test]
    fn test_add_wins_regardless_of_other_keywords() {
        let messages = [
            "search and add one piece to my list please",
            "hello, recommend and save something to my library",
            "find me a movie and add it to the collection",
        ];
        for message in messages {
            assert_eq!(classify(message).action, Action::AddToLibrary, "{message}");
        }
    }

    #[test]
    fn test_rule_priority() {
        assert_eq!(classify("search for attack on titan anime").action, Action::Search);
        assert_eq!(classify("Look for something fun").action, Action::Search);
        assert_eq!(classify("recommend something to watch").action, Action::Recommend);
        assert_eq!(classify("What should I read next?").action, Action::Recommend);
        assert_eq!(classify("show my library").action, Action::ListLibrary);
        assert_eq!(classify("Hello").action, Action::Greet);
        assert_eq!(classify("What can you help me with?").action, Action::Greet);
    }

    #[test]
    fn test_unmatched_text_is_delegated() {
        let messages = ["", "who directed spirited away", "tell me a joke", "12345"];
        for message in messages {
            assert_eq!(classify(message).action, Action::DelegateToAssistant, "{message:?}");
        }
    }

    #[test]
    fn test_keywords_match_inside_words() {
        // "this" contains "hi"
        assert_eq!(classify("this").action, Action::Greet);
        // "playlist" contains "list"
        assert_eq!(classify("my playlist").action, Action::ListLibrary);
    }

    #[test]
    fn test_add_extracts_title_and_type() {
        let intent = classify("add Naruto to my library");
        assert_eq!(intent.title.as_deref(), Some("naruto"));
        assert_eq!(intent.media_type, None);

        let intent = classify("Please add Cowboy Bebop anime to my collection");
        assert_eq!(intent.title.as_deref(), Some("cowboy bebop"));
        assert_eq!(intent.media_type, Some(MediaType::Anime));
    }

    #[test]
    fn test_add_without_title() {
        let intent = classify("add to my library");
        assert_eq!(intent.action, Action::AddToLibrary);
        assert_eq!(intent.title, None);
    }

    #[test]
    fn test_title_only_for_add() {
        assert_eq!(classify("search for naruto anime").title, None);
    }

    #[test]
    fn test_display_title_keeps_case() {
        assert_eq!(display_title("add Naruto to my library"), "Naruto");
        assert_eq!(display_title("Save Fullmetal Alchemist anime to my list"), "Fullmetal Alchemist list");
    }

    #[test]
    fn test_search_query_strips_keywords_and_type() {
        assert_eq!(
            search_query("search for attack on titan anime", MediaType::Anime),
            "attack on titan"
        );
        assert_eq!(
            search_query("SEARCH for Attack on Titan ANIME", MediaType::Anime),
            "Attack on Titan"
        );
        assert_eq!(search_query("find inception movie", MediaType::Movie), "inception");
        assert_eq!(
            search_query("look for breaking bad tv show", MediaType::Tv),
            "breaking bad"
        );
    }

    #[test]
    fn test_search_query_keeps_inner_for() {
        assert_eq!(
            search_query("find waiting for godot movie", MediaType::Movie),
            "waiting for godot"
        );
    }

    #[test]
    fn test_search_without_type() {
        let intent = classify("search for naruto");
        assert_eq!(intent.action, Action::Search);
        assert_eq!(intent.media_type, None);
    }
}
