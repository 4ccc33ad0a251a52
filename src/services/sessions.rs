use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::models::{Session, Turn};

/// Storage for conversation sessions
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Option<Session>;

    /// Creates (or replaces) a session and returns it
    async fn create(&self, session_id: &str, user_id: &str) -> Session;

    /// Returns the existing session, creating it under one write lock if absent
    async fn get_or_create(&self, session_id: &str, user_id: &str) -> Session;

    /// Appends to the history. Returns `false` if the session does not exist.
    async fn append_turn(&self, session_id: &str, turn: Turn) -> bool;

    async fn save_workflow_state(
        &self,
        session_id: &str,
        state: HashMap<String, serde_json::Value>,
    ) -> bool;

    async fn workflow_state(&self, session_id: &str) -> HashMap<String, serde_json::Value>;
}

/// Process-lifetime session store
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.read().await.get(session_id).cloned()
    }

    async fn create(&self, session_id: &str, user_id: &str) -> Session {
        let session = Session::new(session_id, user_id);
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), session.clone());
        tracing::info!(session_id = %session_id, user_id = %user_id, "Session created");
        session
    }

    async fn get_or_create(&self, session_id: &str, user_id: &str) -> Session {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::info!(session_id = %session_id, user_id = %user_id, "Session created");
                Session::new(session_id, user_id)
            })
            .clone()
    }

    async fn append_turn(&self, session_id: &str, turn: Turn) -> bool {
        match self.sessions.write().await.get_mut(session_id) {
            Some(session) => {
                session.push_turn(turn);
                true
            }
            None => false,
        }
    }

    async fn save_workflow_state(
        &self,
        session_id: &str,
        state: HashMap<String, serde_json::Value>,
    ) -> bool {
        match self.sessions.write().await.get_mut(session_id) {
            Some(session) => {
                session.workflow_state = state;
                true
            }
            None => false,
        }
    }

    async fn workflow_state(&self, session_id: &str) -> HashMap<String, serde_json::Value> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|s| s.workflow_state.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, DEFAULT_USER_ID};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemorySessionStore::new();
        assert!(store.get("s").await.is_none());

        store.create("s", DEFAULT_USER_ID).await;
        let session = store.get("s").await.unwrap();
        assert_eq!(session.session_id, "s");
        assert!(session.history.is_empty());
    }

    #[tokio::test]
    async fn test_get_or_create_keeps_existing_session() {
        let store = InMemorySessionStore::new();
        let created = store.get_or_create("s", DEFAULT_USER_ID).await;
        store.append_turn("s", Turn::user("hi")).await;

        let again = store.get_or_create("s", "someone_else").await;
        assert_eq!(again.created_at, created.created_at);
        assert_eq!(again.user_id, DEFAULT_USER_ID);
        assert_eq!(again.history.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_get_or_create_yields_one_session() {
        let store = std::sync::Arc::new(InMemorySessionStore::new());
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let session = store.get_or_create("shared", DEFAULT_USER_ID).await;
                    store.append_turn("shared", Turn::user("hello")).await;
                    session.created_at
                })
            })
            .collect();

        let mut created = Vec::new();
        for task in tasks {
            created.push(task.await.unwrap());
        }

        assert!(created.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.get("shared").await.unwrap().history.len(), 16);
    }

    #[tokio::test]
    async fn test_append_turn_in_order() {
        let store = InMemorySessionStore::new();
        store.create("s", DEFAULT_USER_ID).await;
        assert!(store.append_turn("s", Turn::user("hi")).await);
        assert!(store.append_turn("s", Turn::assistant("hello!")).await);

        let history = store.get("s").await.unwrap().history;
        let roles: Vec<Role> = history.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert!(history[0].timestamp <= history[1].timestamp);
    }

    #[tokio::test]
    async fn test_append_to_missing_session() {
        let store = InMemorySessionStore::new();
        assert!(!store.append_turn("ghost", Turn::user("hi")).await);
        assert!(store.get("ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_workflow_state_round_trip() {
        let store = InMemorySessionStore::new();
        assert!(store.workflow_state("s").await.is_empty());
        assert!(!store.save_workflow_state("s", HashMap::new()).await);

        store.create("s", DEFAULT_USER_ID).await;
        let state = HashMap::from([("pending".to_string(), json!({"step": 1}))]);
        assert!(store.save_workflow_state("s", state.clone()).await);
        assert_eq!(store.workflow_state("s").await, state);
    }
}
