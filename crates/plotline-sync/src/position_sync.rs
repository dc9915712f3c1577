//! Debounced and manual flushes of whole script graphs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use plotline_core::error::DomainError;
use plotline_core::model::Layer;
use plotline_core::scheduler::Scheduler;
use plotline_core::store::GraphStore;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::snapshot::GraphSnapshot;

/// Quiet period after the most recent change before an automatic flush.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);

type GraphDigest = [u8; 32];

/// Schedules and performs whole-graph writes to the backing store.
///
/// Each script has at most one pending automatic flush. Scheduling again
/// before it fires pushes it back by a full window. Automatic flushes are
/// silent apart from logging and are skipped when the graph is unchanged
/// since the last successful write. Manual saves always write and report
/// their outcome.
#[derive(Clone)]
pub struct PositionSync {
    store: Arc<dyn GraphStore>,
    scheduler: Arc<dyn Scheduler>,
    window: Duration,
    flushed: Arc<Mutex<HashMap<Uuid, GraphDigest>>>,
}

impl std::fmt::Debug for PositionSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionSync")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl PositionSync {
    /// Creates a sync with the given debounce window.
    #[must_use]
    pub fn new(
        store: Arc<dyn GraphStore>,
        scheduler: Arc<dyn Scheduler>,
        window: Duration,
    ) -> Self {
        Self {
            store,
            scheduler,
            window,
            flushed: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns `true` while an automatic flush is waiting for `script_id`.
    #[must_use]
    pub fn is_pending(&self, script_id: Uuid) -> bool {
        self.scheduler.is_armed(script_id)
    }

    /// Schedules an automatic flush of `source`, replacing any flush still
    /// waiting for the same script.
    pub fn schedule_flush(&self, source: Arc<dyn GraphSnapshot>) {
        let script_id = source.script_id();
        let store = Arc::clone(&self.store);
        let flushed = Arc::clone(&self.flushed);
        self.scheduler.arm(
            script_id,
            self.window,
            Box::pin(async move {
                auto_flush(script_id, source.as_ref(), store.as_ref(), &flushed).await;
            }),
        );
        debug!(%script_id, window_ms = self.window.as_millis(), "flush scheduled");
    }

    /// Drops the automatic flush waiting for `script_id`, if any.
    pub fn discard_pending(&self, script_id: Uuid) -> bool {
        self.scheduler.cancel(script_id)
    }

    /// Writes `source` now and waits for the store to answer. Any pending
    /// automatic flush for the script is dropped first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PersistenceFailure` if the store rejects the
    /// write. The in-memory graph is left as it was.
    pub async fn save_now(&self, source: &dyn GraphSnapshot) -> Result<(), DomainError> {
        let script_id = source.script_id();
        if self.scheduler.cancel(script_id) {
            debug!(%script_id, "pending flush superseded by manual save");
        }

        let layers = source.snapshot();
        match self.store.save_graph(script_id, &layers).await {
            Ok(()) => {
                if let Ok(digest) = digest_of(&layers) {
                    record(&self.flushed, script_id, digest);
                }
                info!(%script_id, layers = layers.len(), "script saved");
                Ok(())
            }
            Err(err) => {
                error!(%script_id, error = %err, "manual save failed");
                Err(err)
            }
        }
    }
}

async fn auto_flush(
    script_id: Uuid,
    source: &dyn GraphSnapshot,
    store: &dyn GraphStore,
    flushed: &Mutex<HashMap<Uuid, GraphDigest>>,
) {
    let layers = source.snapshot();
    let digest = match digest_of(&layers) {
        Ok(digest) => digest,
        Err(err) => {
            warn!(%script_id, error = %err, "could not fingerprint graph");
            return;
        }
    };

    let unchanged = flushed
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&script_id)
        == Some(&digest);
    if unchanged {
        debug!(%script_id, "graph unchanged since last write, flush skipped");
        return;
    }

    match store.save_graph(script_id, &layers).await {
        Ok(()) => {
            record(flushed, script_id, digest);
            debug!(%script_id, layers = layers.len(), "graph flushed");
        }
        Err(err) => warn!(%script_id, error = %err, "automatic flush failed"),
    }
}

fn digest_of(layers: &[Layer]) -> Result<GraphDigest, DomainError> {
    let bytes = serde_json::to_vec(layers)
        .map_err(|e| DomainError::PersistenceFailure(format!("serialize graph: {e}")))?;
    Ok(Sha256::digest(&bytes).into())
}

fn record(flushed: &Mutex<HashMap<Uuid, GraphDigest>>, script_id: Uuid, digest: GraphDigest) {
    flushed
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(script_id, digest);
}
