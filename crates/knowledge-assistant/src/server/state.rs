//! Application state for the assistant server

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::conversation::ConversationManager;
use crate::error::{Error, Result};
use crate::providers::CompletionProvider;
use crate::types::Session;

/// A session guarded for one in-flight request at a time
pub type SharedSession = Arc<Mutex<Session>>;

/// In-memory registry of live sessions
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SharedSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh session and return its handle
    pub fn create(&self) -> (Uuid, SharedSession) {
        let session = Session::new();
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, Arc::clone(&shared));
        (id, shared)
    }

    /// Look up a session. The handle is cloned out so no map guard outlives this call.
    pub fn get(&self, id: &Uuid) -> Result<SharedSession> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    pub fn remove(&self, id: &Uuid) -> Result<()> {
        self.sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Turn and upload handling
    manager: ConversationManager,
    /// Live sessions
    sessions: SessionStore,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state around a completion provider
    pub fn new(config: AppConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        tracing::info!(
            "Initializing assistant state (provider: {}, model: {})",
            provider.name(),
            config.llm.model
        );

        let manager = ConversationManager::new(&config, provider);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                manager,
                sessions: SessionStore::new(),
                ready: RwLock::new(true),
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn manager(&self) -> &ConversationManager {
        &self.inner.manager
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }

    /// Health-check the completion service and record the result as readiness
    pub async fn refresh_ready(&self) -> bool {
        let provider = self.inner.manager.provider();
        let healthy = matches!(provider.health_check().await, Ok(true));
        if !healthy {
            tracing::warn!("Completion service ({}) failed its health check", provider.name());
        }
        self.set_ready(healthy);
        healthy
    }
}
