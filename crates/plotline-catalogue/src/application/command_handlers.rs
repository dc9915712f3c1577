//! Command handlers for the script catalogue.

use plotline_core::clock::Clock;
use plotline_core::error::DomainError;
use plotline_core::script::Script;
use plotline_core::store::ScriptStore;
use tracing::debug;

use crate::application::query_handlers::get_script;
use crate::domain::commands::{CreateScript, DeleteScript, UpdateScript};
use crate::domain::records::{apply_update, draft_script, soft_delete};

/// Handles `CreateScript`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank title and
/// `DomainError::PersistenceFailure` if the store rejects the write.
pub async fn handle_create_script(
    command: &CreateScript,
    clock: &dyn Clock,
    store: &dyn ScriptStore,
) -> Result<Script, DomainError> {
    let script = draft_script(command, clock)?;
    store.save_script(&script).await?;
    debug!(correlation_id = %command.correlation_id, script_id = %script.id, "script created");
    Ok(script)
}

/// Handles `UpdateScript`, covering renames and tag replacement too.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for a missing or deleted script,
/// `DomainError::Validation` for a blank title, and
/// `DomainError::PersistenceFailure` if the store fails.
pub async fn handle_update_script(
    command: &UpdateScript,
    clock: &dyn Clock,
    store: &dyn ScriptStore,
) -> Result<Script, DomainError> {
    let mut script = get_script(command.script_id, store).await?;
    apply_update(&mut script, command, clock)?;
    store.save_script(&script).await?;
    debug!(
        correlation_id = %command.correlation_id,
        script_id = %script.id,
        tags = script.tags.len(),
        "script updated"
    );
    Ok(script)
}

/// Handles `DeleteScript`. The record stays in the store with `deleted_at`
/// set.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for a missing or already deleted script
/// and `DomainError::PersistenceFailure` if the store fails.
pub async fn handle_delete_script(
    command: &DeleteScript,
    clock: &dyn Clock,
    store: &dyn ScriptStore,
) -> Result<(), DomainError> {
    let mut script = get_script(command.script_id, store).await?;
    soft_delete(&mut script, clock);
    store.save_script(&script).await?;
    debug!(correlation_id = %command.correlation_id, script_id = %script.id, "script deleted");
    Ok(())
}
