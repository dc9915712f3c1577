//! Query handlers for the script catalogue.

use plotline_core::error::DomainError;
use plotline_core::script::Script;
use plotline_core::store::ScriptStore;
use uuid::Uuid;

/// Every script that has not been deleted, oldest first.
///
/// # Errors
///
/// Returns `DomainError::PersistenceFailure` if the store fails.
pub async fn list_scripts(store: &dyn ScriptStore) -> Result<Vec<Script>, DomainError> {
    let mut scripts: Vec<Script> = store
        .list_scripts()
        .await?
        .into_iter()
        .filter(Script::is_live)
        .collect();
    scripts.sort_by_key(|script| script.created_at);
    Ok(scripts)
}

/// The live script with `script_id`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` when the script does not exist or has
/// been deleted, and `DomainError::PersistenceFailure` if the store fails.
pub async fn get_script(script_id: Uuid, store: &dyn ScriptStore) -> Result<Script, DomainError> {
    store
        .find_script(script_id)
        .await?
        .filter(Script::is_live)
        .ok_or_else(|| DomainError::script_not_found(script_id))
}
