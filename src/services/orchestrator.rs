use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use crate::{
    models::{MediaType, Turn, DEFAULT_USER_ID},
    services::{
        discovery::Discovery,
        formatting,
        library::{LibraryFilter, LibraryStore},
        metrics::Metrics,
        recommendations::{self, DEFAULT_RECOMMENDATION_COUNT},
        responder::Responder,
        router::{self, Action, Intent},
        sessions::SessionStore,
    },
};

/// Candidates fetched when resolving a title for an add request
const ADD_SEARCH_LIMIT: usize = 5;
/// Candidates fetched for an explicit search
const SEARCH_LIMIT: usize = 10;

/// Reply to a single user message
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
}

/// Sequences routing, capability calls and formatting for each message
pub struct Orchestrator {
    sessions: Arc<dyn SessionStore>,
    library: Arc<dyn LibraryStore>,
    discovery: Arc<dyn Discovery>,
    responder: Arc<dyn Responder>,
    metrics: Arc<Metrics>,
}

impl Orchestrator {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        library: Arc<dyn LibraryStore>,
        discovery: Arc<dyn Discovery>,
        responder: Arc<dyn Responder>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            sessions,
            library,
            discovery,
            responder,
            metrics,
        }
    }

    /// Handles one message end to end. Every path yields a text reply and
    /// records both turns in the session history.
    #[instrument(skip(self, message), fields(action))]
    pub async fn process(&self, session_id: &str, message: &str) -> ChatReply {
        self.sessions.get_or_create(session_id, DEFAULT_USER_ID).await;

        let context = self.library.context_summary(session_id).await;
        let intent = router::classify(message);
        tracing::Span::current().record("action", tracing::field::debug(intent.action));
        tracing::info!(media_type = ?intent.media_type, "Message routed");

        let response = match intent.action {
            Action::AddToLibrary => self.add_to_library(session_id, message, &intent).await,
            Action::Search => self.search(message, intent.media_type).await,
            Action::Recommend => self.recommend(session_id, intent.media_type).await,
            Action::ListLibrary => self.list_library(session_id).await,
            Action::Greet => formatting::GREETING.to_string(),
            Action::DelegateToAssistant => {
                self.metrics.record_agent_invocation();
                self.responder.respond(message, &context.to_string()).await
            }
        };

        self.sessions.append_turn(session_id, Turn::user(message)).await;
        self.sessions
            .append_turn(session_id, Turn::assistant(response.clone()))
            .await;

        ChatReply {
            response,
            session_id: session_id.to_string(),
        }
    }

    async fn add_to_library(&self, session_id: &str, message: &str, intent: &Intent) -> String {
        let Some(title) = intent.title.as_deref() else {
            return formatting::ADD_GUIDANCE.to_string();
        };
        let media_type = intent.media_type.unwrap_or(MediaType::Anime);

        self.metrics.record_search();
        let results = self.discovery.search(title, media_type, ADD_SEARCH_LIMIT).await;

        match results.into_iter().next() {
            Some(entry) => {
                let reply = formatting::added(&entry);
                let inserted = self.library.add(session_id, entry).await;
                self.metrics.record_add(inserted);
                reply
            }
            None => formatting::not_found(&router::display_title(message)),
        }
    }

    async fn search(&self, message: &str, media_type: Option<MediaType>) -> String {
        let Some(media_type) = media_type else {
            return formatting::MEDIA_TYPE_QUESTION.to_string();
        };

        let query = router::search_query(message, media_type);
        self.metrics.record_search();
        let results = self.discovery.search(&query, media_type, SEARCH_LIMIT).await;
        formatting::search_results(&results)
    }

    async fn recommend(&self, session_id: &str, media_type: Option<MediaType>) -> String {
        self.metrics.record_recommendation();
        let library = self.library.list(session_id, LibraryFilter::by_type(media_type)).await;
        let preferences = self.library.preferences(session_id).await;
        let recs = recommendations::recommend(
            &library,
            &preferences,
            media_type,
            DEFAULT_RECOMMENDATION_COUNT,
        );
        formatting::recommendations(&recs)
    }

    async fn list_library(&self, session_id: &str) -> String {
        self.metrics.record_library_listing();
        let entries = self.library.list(session_id, LibraryFilter::default()).await;
        formatting::library(&entries)
    }
}
