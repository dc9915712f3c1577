//! Building and changing `Script` records.

use chrono::{DateTime, Utc};
use plotline_core::clock::Clock;
use plotline_core::error::DomainError;
use plotline_core::script::{Script, ScriptStatus, ScriptTag, tag_color};
use uuid::Uuid;

use super::commands::{CreateScript, UpdateScript};

fn normalized_title(title: &str) -> Result<String, DomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(
            "script title must not be blank".into(),
        ));
    }
    Ok(trimmed.to_owned())
}

/// Builds the tag list for `names`. Blank and repeated names are dropped;
/// a tag already on `existing` keeps its id and creation time.
#[must_use]
pub fn build_tags(
    script_id: Uuid,
    names: &[String],
    existing: &[ScriptTag],
    now: DateTime<Utc>,
) -> Vec<ScriptTag> {
    let mut tags: Vec<ScriptTag> = Vec::with_capacity(names.len());
    for name in names.iter().map(|name| name.trim()) {
        if name.is_empty() || tags.iter().any(|tag| tag.tag_name == name) {
            continue;
        }
        let tag = existing
            .iter()
            .find(|tag| tag.tag_name == name)
            .cloned()
            .unwrap_or_else(|| ScriptTag {
                id: Uuid::new_v4(),
                script_id,
                tag_name: name.to_owned(),
                color: tag_color(name).to_owned(),
                created_at: now,
            });
        tags.push(tag);
    }
    tags
}

/// A new draft script for `command`.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the title is blank.
pub fn draft_script(command: &CreateScript, clock: &dyn Clock) -> Result<Script, DomainError> {
    let title = normalized_title(&command.title)?;
    let now = clock.now();
    let id = Uuid::new_v4();
    Ok(Script {
        id,
        title,
        description: command.description.clone(),
        outline: command.outline.clone(),
        status: ScriptStatus::Draft,
        is_auto_generated: false,
        tags: build_tags(id, &command.tags, &[], now),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    })
}

/// Applies the fields `command` sets to `script` and bumps `updated_at`.
/// Nothing is changed when the command is rejected.
///
/// # Errors
///
/// Returns `DomainError::Validation` if a new title is blank.
pub fn apply_update(
    script: &mut Script,
    command: &UpdateScript,
    clock: &dyn Clock,
) -> Result<(), DomainError> {
    let title = command.title.as_deref().map(normalized_title).transpose()?;
    let now = clock.now();
    if let Some(title) = title {
        script.title = title;
    }
    if let Some(description) = &command.description {
        script.description = Some(description.clone());
    }
    if let Some(outline) = &command.outline {
        script.outline = Some(outline.clone());
    }
    if let Some(names) = &command.tags {
        script.tags = build_tags(script.id, names, &script.tags, now);
    }
    script.updated_at = now;
    Ok(())
}

/// Marks `script` deleted.
pub fn soft_delete(script: &mut Script, clock: &dyn Clock) {
    let now = clock.now();
    script.deleted_at = Some(now);
    script.updated_at = now;
}
