//! Commands that change the catalogue.

use uuid::Uuid;

/// Command to create a script.
#[derive(Debug, Clone)]
pub struct CreateScript {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Script title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional outline.
    pub outline: Option<String>,
    /// Tag names.
    pub tags: Vec<String>,
}

/// Command to change some of a script's fields. `None` leaves a field as
/// it is.
#[derive(Debug, Clone, Default)]
pub struct UpdateScript {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Script to update.
    pub script_id: Uuid,
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New outline.
    pub outline: Option<String>,
    /// Replacement tag names.
    pub tags: Option<Vec<String>>,
}

impl UpdateScript {
    /// An update that only renames the script.
    #[must_use]
    pub fn rename(correlation_id: Uuid, script_id: Uuid, title: String) -> Self {
        Self {
            correlation_id,
            script_id,
            title: Some(title),
            ..Self::default()
        }
    }

    /// An update that only replaces the script's tags.
    #[must_use]
    pub fn retag(correlation_id: Uuid, script_id: Uuid, tags: Vec<String>) -> Self {
        Self {
            correlation_id,
            script_id,
            tags: Some(tags),
            ..Self::default()
        }
    }
}

/// Command to soft-delete a script.
#[derive(Debug, Clone)]
pub struct DeleteScript {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Script to delete.
    pub script_id: Uuid,
}
