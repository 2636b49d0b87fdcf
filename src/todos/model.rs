//! Todo data model: stored items and the projection sent back to the voice agent.

use serde::{Deserialize, Serialize};

/// A single to-do item owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Autoincrementing row id.
    pub id: i64,
    /// Owning user. Todos are never reassigned.
    pub owner_id: i64,
    /// Short title. Not unique.
    pub title: String,
    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the todo has been completed.
    pub completed: bool,
}

impl TodoItem {
    /// Project to the shape returned by the list operation.
    pub fn summary(&self) -> TodoSummary {
        TodoSummary {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
        }
    }
}

/// Fields needed to insert a todo. New todos always start incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Builder: set description. Blank descriptions are treated as absent.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        let desc = desc.into();
        self.description = if desc.is_empty() { None } else { Some(desc) };
        self
    }
}

/// List projection: `{id, title, description, completed}`.
///
/// Unlike [`TodoItem`], `description` is always present and serialized as
/// `null` when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}
