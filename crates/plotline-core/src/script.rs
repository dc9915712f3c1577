//! Script catalogue records.
//!
//! A `Script` is the header a graph hangs off: title, synopsis, tags and
//! lifecycle timestamps. Deletion is soft; a deleted script keeps its row
//! with `deleted_at` set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Colour given to tags with no entry in the genre palette.
pub const DEFAULT_TAG_COLOR: &str = "#595959";

const GENRE_PALETTE: [(&str, &str); 8] = [
    ("sci-fi", "#1890ff"),
    ("mystery", "#722ed1"),
    ("romance", "#f5222d"),
    ("wuxia", "#fa8c16"),
    ("horror", "#000000"),
    ("adventure", "#52c41a"),
    ("detective", "#eb2f96"),
    ("period", "#13c2c2"),
];

/// Where a script is in its writing lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStatus {
    /// Newly created.
    #[default]
    Draft,
    /// Being actively edited.
    Editing,
    /// Finished.
    Completed,
    /// Shelved.
    Archived,
}

impl ScriptStatus {
    /// The stored name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Editing => "editing",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Parses a stored status name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "draft" => Some(Self::Draft),
            "editing" => Some(Self::Editing),
            "completed" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A label attached to a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptTag {
    /// Tag identifier.
    pub id: Uuid,
    /// The script carrying the tag.
    pub script_id: Uuid,
    /// Display name.
    pub tag_name: String,
    /// Hex colour for the tag chip.
    pub color: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A catalogued script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Script identifier; also keys the script's graph.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Story outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ScriptStatus,
    /// Whether the script was produced by a generator rather than a writer.
    #[serde(default)]
    pub is_auto_generated: bool,
    /// Tags in the order they were given.
    #[serde(default)]
    pub tags: Vec<ScriptTag>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Set once the script has been deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Script {
    /// Returns `true` until the script is deleted.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// The palette colour for `tag_name`, matched case-insensitively.
#[must_use]
pub fn tag_color(tag_name: &str) -> &'static str {
    let wanted = tag_name.trim().to_lowercase();
    GENRE_PALETTE
        .iter()
        .find(|(genre, _)| *genre == wanted)
        .map_or(DEFAULT_TAG_COLOR, |(_, color)| *color)
}
