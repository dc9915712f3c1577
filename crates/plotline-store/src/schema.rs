//! Graph and catalogue database schema.

use plotline_core::error::DomainError;
use sqlx::PgPool;

/// SQL to create the script graph table.
pub const CREATE_SCRIPT_GRAPHS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS script_graphs (
    script_id   UUID PRIMARY KEY,
    layers      JSONB NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
";

/// SQL to create the script catalogue table.
pub const CREATE_SCRIPTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS scripts (
    id                  UUID PRIMARY KEY,
    title               TEXT NOT NULL,
    description         TEXT,
    outline             TEXT,
    status              TEXT NOT NULL DEFAULT 'draft',
    is_auto_generated   BOOLEAN NOT NULL DEFAULT FALSE,
    tags                JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at          TIMESTAMPTZ NOT NULL,
    updated_at          TIMESTAMPTZ NOT NULL,
    deleted_at          TIMESTAMPTZ
)
";

/// Creates the graph and catalogue tables when they do not exist yet.
///
/// # Errors
///
/// Returns `DomainError::PersistenceFailure` if the statement fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DomainError> {
    for statement in [CREATE_SCRIPT_GRAPHS_TABLE, CREATE_SCRIPTS_TABLE] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DomainError::PersistenceFailure(e.to_string()))?;
    }
    Ok(())
}
