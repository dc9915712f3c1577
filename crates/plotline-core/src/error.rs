//! Domain error types.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// The kind of record an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A catalogued script.
    Script,
    /// A layer (act).
    Layer,
    /// A story node (beat).
    Node,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Script => "script",
            Self::Layer => "layer",
            Self::Node => "node",
        };
        f.write_str(name)
    }
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A referenced script, layer, or node does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// What kind of record was looked up.
        entity: EntityKind,
        /// The missing id.
        id: Uuid,
    },

    /// Input the graph model cannot represent.
    #[error("validation error: {0}")]
    Validation(String),

    /// The backing store rejected a call.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl DomainError {
    /// Shorthand for a missing or deleted script.
    #[must_use]
    pub fn script_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity: EntityKind::Script,
            id,
        }
    }

    /// Shorthand for a missing layer.
    #[must_use]
    pub fn layer_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity: EntityKind::Layer,
            id,
        }
    }

    /// Shorthand for a missing node.
    #[must_use]
    pub fn node_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity: EntityKind::Node,
            id,
        }
    }
}
