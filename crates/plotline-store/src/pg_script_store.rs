//! `PostgreSQL` implementation of the `ScriptStore` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::debug;
use uuid::Uuid;

use plotline_core::error::DomainError;
use plotline_core::script::{Script, ScriptStatus, ScriptTag};
use plotline_core::store::ScriptStore;

const SELECT_SCRIPTS: &str = r"
SELECT id, title, description, outline, status, is_auto_generated, tags,
       created_at, updated_at, deleted_at
FROM scripts
";

#[derive(sqlx::FromRow)]
struct ScriptRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    outline: Option<String>,
    status: String,
    is_auto_generated: bool,
    tags: Json<Vec<ScriptTag>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<ScriptRow> for Script {
    type Error = DomainError;

    fn try_from(row: ScriptRow) -> Result<Self, Self::Error> {
        let status = ScriptStatus::parse(&row.status).ok_or_else(|| {
            DomainError::PersistenceFailure(format!(
                "script {} has unknown status {:?}",
                row.id, row.status
            ))
        })?;
        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            outline: row.outline,
            status,
            is_auto_generated: row.is_auto_generated,
            tags: row.tags.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// PostgreSQL-backed script catalogue, one row per script.
#[derive(Debug, Clone)]
pub struct PgScriptStore {
    pool: PgPool,
}

impl PgScriptStore {
    /// Creates a new `PgScriptStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence(err: &sqlx::Error) -> DomainError {
    DomainError::PersistenceFailure(err.to_string())
}

#[async_trait]
impl ScriptStore for PgScriptStore {
    async fn list_scripts(&self) -> Result<Vec<Script>, DomainError> {
        let rows: Vec<ScriptRow> =
            sqlx::query_as(&format!("{SELECT_SCRIPTS} ORDER BY created_at, id"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| persistence(&e))?;

        rows.into_iter().map(Script::try_from).collect()
    }

    async fn find_script(&self, script_id: Uuid) -> Result<Option<Script>, DomainError> {
        let row: Option<ScriptRow> = sqlx::query_as(&format!("{SELECT_SCRIPTS} WHERE id = $1"))
            .bind(script_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| persistence(&e))?;

        row.map(Script::try_from).transpose()
    }

    async fn save_script(&self, script: &Script) -> Result<(), DomainError> {
        sqlx::query(
            r"
            INSERT INTO scripts (
                id, title, description, outline, status, is_auto_generated, tags,
                created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                outline = EXCLUDED.outline,
                status = EXCLUDED.status,
                is_auto_generated = EXCLUDED.is_auto_generated,
                tags = EXCLUDED.tags,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            ",
        )
        .bind(script.id)
        .bind(&script.title)
        .bind(&script.description)
        .bind(&script.outline)
        .bind(script.status.as_str())
        .bind(script.is_auto_generated)
        .bind(Json(&script.tags))
        .bind(script.created_at)
        .bind(script.updated_at)
        .bind(script.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| persistence(&e))?;

        debug!(script_id = %script.id, deleted = !script.is_live(), "script row written");
        Ok(())
    }
}
