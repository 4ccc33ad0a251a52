pub mod discovery;
pub mod formatting;
pub mod library;
pub mod metrics;
pub mod orchestrator;
pub mod providers;
pub mod recommendations;
pub mod responder;
pub mod router;
pub mod sessions;

pub use discovery::{CatalogDiscovery, Discovery};
pub use library::{InMemoryLibraryStore, LibraryStore};
pub use metrics::Metrics;
pub use orchestrator::{ChatReply, Orchestrator};
pub use responder::{GeminiResponder, Responder};
pub use sessions::{InMemorySessionStore, SessionStore};
