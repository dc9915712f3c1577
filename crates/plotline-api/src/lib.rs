//! Plotline API: HTTP surface of the branching-script editor.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
