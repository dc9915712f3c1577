//! In-process graph and catalogue stores.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use plotline_core::error::DomainError;
use plotline_core::model::{Layer, StoryNode, apply_content_update};
use plotline_core::script::Script;
use plotline_core::store::{GraphStore, ScriptStore};
use tracing::debug;
use uuid::Uuid;

/// Keeps every script's graph in memory. Each call can be delayed by a
/// fixed latency to mimic a remote service.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    graphs: RwLock<HashMap<Uuid, Vec<Layer>>>,
    latency: Duration,
}

impl InMemoryGraphStore {
    /// Creates an empty store that answers immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that waits `latency` before answering.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn put(&self, script_id: Uuid, layers: Vec<Layer>) {
        self.graphs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(script_id, layers);
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn load_graph(&self, script_id: Uuid) -> Result<Vec<Layer>, DomainError> {
        self.simulate_latency().await;
        let layers = self
            .graphs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&script_id)
            .cloned()
            .unwrap_or_default();
        Ok(layers)
    }

    async fn save_graph(&self, script_id: Uuid, layers: &[Layer]) -> Result<(), DomainError> {
        self.simulate_latency().await;
        self.put(script_id, layers.to_vec());
        debug!(%script_id, layers = layers.len(), "graph stored in memory");
        Ok(())
    }

    async fn update_node_content(
        &self,
        script_id: Uuid,
        node_id: Uuid,
        content: &str,
        layers: &[Layer],
        title: Option<&str>,
    ) -> Result<Option<StoryNode>, DomainError> {
        self.simulate_latency().await;
        let mut layers = layers.to_vec();
        let updated = apply_content_update(&mut layers, node_id, content, title);
        if updated.is_some() {
            self.put(script_id, layers);
        }
        Ok(updated)
    }
}

/// Keeps the script catalogue in memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryScriptStore {
    scripts: RwLock<Vec<Script>>,
}

impl InMemoryScriptStore {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScriptStore for InMemoryScriptStore {
    async fn list_scripts(&self) -> Result<Vec<Script>, DomainError> {
        let mut scripts = self
            .scripts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        scripts.sort_by_key(|script| script.created_at);
        Ok(scripts)
    }

    async fn find_script(&self, script_id: Uuid) -> Result<Option<Script>, DomainError> {
        let script = self
            .scripts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|script| script.id == script_id)
            .cloned();
        Ok(script)
    }

    async fn save_script(&self, script: &Script) -> Result<(), DomainError> {
        let mut scripts = self.scripts.write().unwrap_or_else(PoisonError::into_inner);
        match scripts.iter_mut().find(|stored| stored.id == script.id) {
            Some(stored) => *stored = script.clone(),
            None => scripts.push(script.clone()),
        }
        debug!(script_id = %script.id, "script stored in memory");
        Ok(())
    }
}
