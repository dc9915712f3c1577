//! Plotline Store: `GraphStore` and `ScriptStore` implementations.
//!
//! `InMemoryGraphStore` keeps graphs in process, with optional simulated
//! latency. `PgGraphStore` keeps one JSONB document per script in
//! PostgreSQL. The catalogue has a matching pair in `InMemoryScriptStore`
//! and `PgScriptStore`.

pub mod memory;
pub mod pg_graph_store;
pub mod pg_script_store;
pub mod schema;

pub use memory::{InMemoryGraphStore, InMemoryScriptStore};
pub use pg_graph_store::PgGraphStore;
pub use pg_script_store::PgScriptStore;
