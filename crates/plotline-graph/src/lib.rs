//! Plotline: script graph editing.
//!
//! Responsible for the layered branching graph, position layout, ancestor
//! tracing, the canvas projection, and the edit operations that keep the
//! graph consistent.

pub mod application;
pub mod domain;

pub use application::session::{EditorSession, SharedSession, lock_session};
pub use domain::graph::{NodeRemoval, ScriptGraph};
