//! Todo service layer.
//!
//! Thin operations over the [`TodoStore`] plus the goal expansion pipeline,
//! which makes one completion request, extracts list items and stores them
//! in a single batch.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use todo_db::models::{Todo, TodoCounts, TodoPatch};

use crate::completion::{CompletionGateway, DEFAULT_MODEL};
use crate::error::{TodoError, TodoResult};
use crate::generate::{build_goal_request, extract_todo_titles};
use crate::store::TodoStore;

/// Result of expanding a goal into todos.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutcome {
    pub count: usize,
    pub todos: Vec<Todo>,
}

/// Operations on to-do items, wired to explicit gateways.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    completions: Arc<dyn CompletionGateway>,
    model: String,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, completions: Arc<dyn CompletionGateway>) -> Self {
        Self {
            store,
            completions,
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// Use a different model identifier for goal expansion.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn list(&self) -> TodoResult<Vec<Todo>> {
        Ok(self.store.list().await?)
    }

    pub async fn create(&self, title: &str) -> TodoResult<Todo> {
        let todo = self.store.create(title).await?;
        debug!(id = %todo.id, "todo created");
        Ok(todo)
    }

    /// Apply `patch` to an existing todo. Unset fields keep their stored
    /// values. Fails with [`TodoError::NotFound`] when `id` is unknown.
    pub async fn update(&self, id: Uuid, patch: &TodoPatch) -> TodoResult<Todo> {
        match self.store.update(id, patch).await? {
            Some(todo) => {
                debug!(%id, state = %todo.state(), "todo updated");
                Ok(todo)
            }
            None => {
                warn!(%id, "update target not found");
                Err(TodoError::not_found(id))
            }
        }
    }

    /// Delete a todo and return its last state. Fails with
    /// [`TodoError::NotFound`] when `id` is unknown.
    pub async fn delete(&self, id: Uuid) -> TodoResult<Todo> {
        match self.store.delete(id).await? {
            Some(todo) => {
                debug!(%id, "todo deleted");
                Ok(todo)
            }
            None => {
                warn!(%id, "delete target not found");
                Err(TodoError::not_found(id))
            }
        }
    }

    pub async fn summary(&self) -> TodoResult<TodoCounts> {
        Ok(self.store.counts().await?)
    }

    /// Expand `goal` into todos via the completion gateway and store them.
    ///
    /// A reply with no list items stores nothing and is not an error.
    /// Gateway failures are returned as-is; nothing is retried.
    pub async fn generate(&self, goal: &str) -> TodoResult<GenerateOutcome> {
        let request = build_goal_request(goal, &self.model);
        let content = self
            .completions
            .complete(&request)
            .await?
            .unwrap_or_default();

        let titles = extract_todo_titles(&content);
        let todos = self.store.create_many(&titles).await?;

        info!(
            provider = self.completions.name(),
            model = %self.model,
            count = todos.len(),
            "generated todos from goal"
        );
        Ok(GenerateOutcome {
            count: todos.len(),
            todos,
        })
    }
}

impl std::fmt::Debug for TodoService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoService")
            .field("store", &self.store.name())
            .field("completions", &self.completions.name())
            .field("model", &self.model)
            .finish()
    }
}
