use thiserror::Error;
use uuid::Uuid;

/// Message carried by [`TodoError::NotFound`].
pub const TODO_NOT_FOUND: &str = "todo not found";

/// Errors surfaced by [`crate::TodoService`] operations.
#[derive(Debug, Error)]
pub enum TodoError {
    /// The targeted todo does not exist (never existed, or already deleted).
    #[error("todo not found")]
    NotFound { id: Uuid },

    /// A store or completion gateway failure, passed through unchanged.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

pub type TodoResult<T> = Result<T, TodoError>;

impl TodoError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
