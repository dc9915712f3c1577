//! Backing-store abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::model::{Layer, StoryNode};
use crate::script::Script;

/// Asynchronous key-value persistence of whole script graphs, keyed by
/// script id.
///
/// Writes are whole-graph rather than diffs. Implementations report any
/// rejected call as `DomainError::PersistenceFailure`.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Load every layer (with nodes and branches) stored for a script.
    /// Returns an empty list when nothing has been stored yet.
    async fn load_graph(&self, script_id: Uuid) -> Result<Vec<Layer>, DomainError>;

    /// Replace the stored graph for a script.
    async fn save_graph(&self, script_id: Uuid, layers: &[Layer]) -> Result<(), DomainError>;

    /// Apply a content update to `node_id` within `layers` and persist the
    /// result. Returns `Ok(None)` when the node is not present in `layers`.
    async fn update_node_content(
        &self,
        script_id: Uuid,
        node_id: Uuid,
        content: &str,
        layers: &[Layer],
        title: Option<&str>,
    ) -> Result<Option<StoryNode>, DomainError>;
}

/// Persistence of catalogue records, deleted ones included.
#[async_trait]
pub trait ScriptStore: Send + Sync {
    /// Every stored script, oldest first.
    async fn list_scripts(&self) -> Result<Vec<Script>, DomainError>;

    /// The script with `script_id`, whether or not it has been deleted.
    async fn find_script(&self, script_id: Uuid) -> Result<Option<Script>, DomainError>;

    /// Insert or replace a script record.
    async fn save_script(&self, script: &Script) -> Result<(), DomainError>;
}
