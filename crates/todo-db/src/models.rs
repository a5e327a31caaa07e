use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Completion state of a to-do item, derived from its `is_completed` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoState {
    Pending,
    Completed,
}

impl TodoState {
    /// The stored flag value for this state.
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<bool> for TodoState {
    fn from(is_completed: bool) -> Self {
        if is_completed {
            Self::Completed
        } else {
            Self::Pending
        }
    }
}

impl fmt::Display for TodoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        };
        f.pad(s)
    }
}

impl FromStr for TodoState {
    type Err = TodoStateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(TodoStateParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`TodoState`] string.
#[derive(Debug, Clone)]
pub struct TodoStateParseError(pub String);

impl fmt::Display for TodoStateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid todo state: {:?}", self.0)
    }
}

impl std::error::Error for TodoStateParseError {}

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A single to-do item.
///
/// Serialized with camelCase keys: `{ id, title, isCompleted, createdAt }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    pub fn state(&self) -> TodoState {
        TodoState::from(self.is_completed)
    }
}

/// Partial update for a to-do item. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TodoPatch {
    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.is_completed.is_none()
    }

    /// Apply the patch to an in-memory record, keeping prior values for
    /// unspecified fields.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(is_completed) = self.is_completed {
            todo.is_completed = is_completed;
        }
    }
}

/// Aggregate counts over all stored to-do items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TodoCounts {
    pub count_todos: i64,
    pub count_completed_todos: i64,
    pub count_pending_todos: i64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
