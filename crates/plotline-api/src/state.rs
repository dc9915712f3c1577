//! Shared application state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use plotline_catalogue::application::query_handlers as catalogue_queries;
use plotline_core::clock::Clock;
use plotline_core::error::DomainError;
use plotline_core::store::{GraphStore, ScriptStore};
use plotline_graph::SharedSession;
use plotline_graph::application::command_handlers::{
    OpenedScript, handle_open_script, handle_persist_seed,
};
use plotline_sync::PositionSync;
use tracing::info;
use uuid::Uuid;

type SessionRegistry = Arc<Mutex<HashMap<Uuid, SharedSession>>>;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for record timestamps.
    pub clock: Arc<dyn Clock>,
    /// Backing store for script graphs.
    pub store: Arc<dyn GraphStore>,
    /// Script catalogue.
    pub scripts: Arc<dyn ScriptStore>,
    /// Debounced persistence.
    pub sync: PositionSync,
    sessions: SessionRegistry,
    // Held while a graph is read from the store and registered.
    opening: Arc<tokio::sync::Mutex<()>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sync", &self.sync)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state with no open sessions.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        store: Arc<dyn GraphStore>,
        scripts: Arc<dyn ScriptStore>,
        sync: PositionSync,
    ) -> Self {
        Self {
            clock,
            store,
            scripts,
            sync,
            sessions: SessionRegistry::default(),
            opening: Arc::default(),
        }
    }

    fn registered(&self, script_id: Uuid) -> Option<SharedSession> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&script_id)
            .cloned()
    }

    fn register(&self, script_id: Uuid, session: SharedSession) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(script_id, session);
    }

    /// Reads the graph, registers the session, then saves a fresh seed.
    /// Callers hold `opening`.
    async fn open_and_register(&self, script_id: Uuid) -> Result<SharedSession, DomainError> {
        let OpenedScript { session, seeded } =
            handle_open_script(script_id, self.clock.as_ref(), self.store.as_ref()).await?;
        let session = session.into_shared();
        self.register(script_id, session.clone());
        if seeded {
            handle_persist_seed(&session, self.store.as_ref()).await;
        }
        Ok(session)
    }

    /// The open session for `script_id`, loading it from the store on first
    /// access.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` when the script is not in the
    /// catalogue or has been deleted, and `DomainError::PersistenceFailure`
    /// if the graph cannot be loaded.
    pub async fn session(&self, script_id: Uuid) -> Result<SharedSession, DomainError> {
        catalogue_queries::get_script(script_id, self.scripts.as_ref()).await?;
        if let Some(session) = self.registered(script_id) {
            return Ok(session);
        }

        let _opening = self.opening.lock().await;
        if let Some(session) = self.registered(script_id) {
            return Ok(session);
        }
        self.open_and_register(script_id).await
    }

    /// Re-reads `script_id` from the store and replaces any open session.
    /// A flush still waiting for the old session is dropped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown or deleted script and
    /// `DomainError::PersistenceFailure` if the graph cannot be loaded.
    pub async fn reload(&self, script_id: Uuid) -> Result<SharedSession, DomainError> {
        catalogue_queries::get_script(script_id, self.scripts.as_ref()).await?;
        let _opening = self.opening.lock().await;
        if self.sync.discard_pending(script_id) {
            info!(%script_id, "unsaved changes discarded by reload");
        }
        self.open_and_register(script_id).await
    }

    /// Drops the open session for a deleted script along with any flush
    /// still waiting for it.
    pub fn close(&self, script_id: Uuid) {
        self.sync.discard_pending(script_id);
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&script_id);
    }

    #[cfg(test)]
    fn open_sessions(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
