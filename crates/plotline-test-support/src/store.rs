//! Mock `GraphStore` and `ScriptStore` implementations for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use plotline_core::error::DomainError;
use plotline_core::model::{Layer, StoryNode, apply_content_update};
use plotline_core::script::Script;
use plotline_core::store::{GraphStore, ScriptStore};
use uuid::Uuid;

/// One recorded `update_node_content` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentUpdateCall {
    /// Script the update was for.
    pub script_id: Uuid,
    /// Node that was updated.
    pub node_id: Uuid,
    /// New content.
    pub content: String,
    /// New title, if any.
    pub title: Option<String>,
}

/// A store that records every write. `load_graph` always returns the layers
/// it was built with; saves can be switched to fail.
#[derive(Debug)]
pub struct RecordingGraphStore {
    load_result: Vec<Layer>,
    saved: Mutex<Vec<(Uuid, Vec<Layer>)>>,
    save_attempts: Mutex<usize>,
    content_updates: Mutex<Vec<ContentUpdateCall>>,
    fail_saves: AtomicBool,
}

impl RecordingGraphStore {
    /// Create a store that returns `load_result` from every `load_graph`.
    #[must_use]
    pub fn new(load_result: Vec<Layer>) -> Self {
        Self {
            load_result,
            saved: Mutex::new(Vec::new()),
            save_attempts: Mutex::new(0),
            content_updates: Mutex::new(Vec::new()),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Make subsequent `save_graph` calls fail (or succeed again).
    pub fn set_save_failure(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Returns a snapshot of every successful save.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved_graphs(&self) -> Vec<(Uuid, Vec<Layer>)> {
        self.saved.lock().unwrap().clone()
    }

    /// Number of `save_graph` calls, including failed ones.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn save_attempts(&self) -> usize {
        *self.save_attempts.lock().unwrap()
    }

    /// Returns a snapshot of every `update_node_content` call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn content_updates(&self) -> Vec<ContentUpdateCall> {
        self.content_updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphStore for RecordingGraphStore {
    async fn load_graph(&self, _script_id: Uuid) -> Result<Vec<Layer>, DomainError> {
        Ok(self.load_result.clone())
    }

    async fn save_graph(&self, script_id: Uuid, layers: &[Layer]) -> Result<(), DomainError> {
        *self.save_attempts.lock().unwrap() += 1;
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::PersistenceFailure("connection refused".into()));
        }
        self.saved
            .lock()
            .unwrap()
            .push((script_id, layers.to_vec()));
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
        self.content_updates.lock().unwrap().push(ContentUpdateCall {
            script_id,
            node_id,
            content: content.to_owned(),
            title: title.map(str::to_owned),
        });
        let mut layers = layers.to_vec();
        Ok(apply_content_update(&mut layers, node_id, content, title))
    }
}

/// A store with nothing in it that silently accepts writes. Content updates
/// report the node as missing.
#[derive(Debug)]
pub struct EmptyGraphStore;

#[async_trait]
impl GraphStore for EmptyGraphStore {
    async fn load_graph(&self, _script_id: Uuid) -> Result<Vec<Layer>, DomainError> {
        Ok(vec![])
    }

    async fn save_graph(&self, _script_id: Uuid, _layers: &[Layer]) -> Result<(), DomainError> {
        Ok(())
    }

    async fn update_node_content(
        &self,
        _script_id: Uuid,
        _node_id: Uuid,
        _content: &str,
        _layers: &[Layer],
        _title: Option<&str>,
    ) -> Result<Option<StoryNode>, DomainError> {
        Ok(None)
    }
}

/// A store that rejects every call. Useful for testing error-handling paths.
#[derive(Debug)]
pub struct FailingGraphStore;

#[async_trait]
impl GraphStore for FailingGraphStore {
    async fn load_graph(&self, _script_id: Uuid) -> Result<Vec<Layer>, DomainError> {
        Err(DomainError::PersistenceFailure("connection refused".into()))
    }

    async fn save_graph(&self, _script_id: Uuid, _layers: &[Layer]) -> Result<(), DomainError> {
        Err(DomainError::PersistenceFailure("connection refused".into()))
    }

    async fn update_node_content(
        &self,
        _script_id: Uuid,
        _node_id: Uuid,
        _content: &str,
        _layers: &[Layer],
        _title: Option<&str>,
    ) -> Result<Option<StoryNode>, DomainError> {
        Err(DomainError::PersistenceFailure("connection refused".into()))
    }
}

/// A catalogue held in a `Vec`, oldest first, that counts its writes.
#[derive(Debug, Default)]
pub struct RecordingScriptStore {
    scripts: Mutex<Vec<Script>>,
    save_count: Mutex<usize>,
}

impl RecordingScriptStore {
    /// Create a store holding `scripts`.
    #[must_use]
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts),
            save_count: Mutex::new(0),
        }
    }

    /// Returns a snapshot of every stored script.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn scripts(&self) -> Vec<Script> {
        self.scripts.lock().unwrap().clone()
    }

    /// Number of `save_script` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }
}

#[async_trait]
impl ScriptStore for RecordingScriptStore {
    async fn list_scripts(&self) -> Result<Vec<Script>, DomainError> {
        Ok(self.scripts())
    }

    async fn find_script(&self, script_id: Uuid) -> Result<Option<Script>, DomainError> {
        Ok(self
            .scripts
            .lock()
            .unwrap()
            .iter()
            .find(|script| script.id == script_id)
            .cloned())
    }

    async fn save_script(&self, script: &Script) -> Result<(), DomainError> {
        *self.save_count.lock().unwrap() += 1;
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.iter_mut().find(|stored| stored.id == script.id) {
            Some(stored) => *stored = script.clone(),
            None => scripts.push(script.clone()),
        }
        Ok(())
    }
}

/// A catalogue that rejects every call.
#[derive(Debug)]
pub struct FailingScriptStore;

#[async_trait]
impl ScriptStore for FailingScriptStore {
    async fn list_scripts(&self) -> Result<Vec<Script>, DomainError> {
        Err(DomainError::PersistenceFailure("connection refused".into()))
    }

    async fn find_script(&self, _script_id: Uuid) -> Result<Option<Script>, DomainError> {
        Err(DomainError::PersistenceFailure("connection refused".into()))
    }

    async fn save_script(&self, _script: &Script) -> Result<(), DomainError> {
        Err(DomainError::PersistenceFailure("connection refused".into()))
    }
}
