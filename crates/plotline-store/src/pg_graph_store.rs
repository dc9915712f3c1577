//! `PostgreSQL` implementation of the `GraphStore` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::debug;
use uuid::Uuid;

use plotline_core::error::DomainError;
use plotline_core::model::{Layer, StoryNode, apply_content_update};
use plotline_core::store::GraphStore;

/// PostgreSQL-backed graph store. Each script is one row holding its whole
/// layer list as JSONB.
#[derive(Debug, Clone)]
pub struct PgGraphStore {
    pool: PgPool,
}

impl PgGraphStore {
    /// Creates a new `PgGraphStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence(err: &sqlx::Error) -> DomainError {
    DomainError::PersistenceFailure(err.to_string())
}

#[async_trait]
impl GraphStore for PgGraphStore {
    async fn load_graph(&self, script_id: Uuid) -> Result<Vec<Layer>, DomainError> {
        let row: Option<(Json<Vec<Layer>>,)> =
            sqlx::query_as("SELECT layers FROM script_graphs WHERE script_id = $1")
                .bind(script_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| persistence(&e))?;

        Ok(row.map(|(Json(layers),)| layers).unwrap_or_default())
    }

    async fn save_graph(&self, script_id: Uuid, layers: &[Layer]) -> Result<(), DomainError> {
        sqlx::query(
            r"
            INSERT INTO script_graphs (script_id, layers, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (script_id)
            DO UPDATE SET layers = EXCLUDED.layers, updated_at = NOW()
            ",
        )
        .bind(script_id)
        .bind(Json(layers))
        .execute(&self.pool)
        .await
        .map_err(|e| persistence(&e))?;

        debug!(%script_id, layers = layers.len(), "graph row written");
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
        let mut layers = layers.to_vec();
        let Some(updated) = apply_content_update(&mut layers, node_id, content, title) else {
            return Ok(None);
        };
        self.save_graph(script_id, &layers).await?;
        Ok(Some(updated))
    }
}
