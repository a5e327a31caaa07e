//! The `TodoStore` trait -- the adapter interface for to-do storage.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use todo_db::models::{Todo, TodoCounts, TodoPatch};

/// Storage operations over to-do items.
///
/// Conditional operations (`update`, `delete`) return `Ok(None)` when the
/// target does not exist and must not write anything in that case. Each of
/// them is atomic with respect to other calls on the same store.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Short backend name for logs (e.g. "postgres").
    fn name(&self) -> &str;

    /// All stored todos, oldest first.
    async fn list(&self) -> Result<Vec<Todo>>;

    /// Insert one todo with `is_completed = false`.
    async fn create(&self, title: &str) -> Result<Todo>;

    /// Insert one todo per title as a single batch, returning them in order.
    async fn create_many(&self, titles: &[String]) -> Result<Vec<Todo>>;

    /// Apply `patch` to the todo with `id`, if it exists.
    async fn update(&self, id: Uuid, patch: &TodoPatch) -> Result<Option<Todo>>;

    /// Remove the todo with `id`, returning its last state, if it exists.
    async fn delete(&self, id: Uuid) -> Result<Option<Todo>>;

    /// Totals by completion state.
    async fn counts(&self) -> Result<TodoCounts>;
}

// Compile-time assertion: TodoStore must be usable as `dyn TodoStore`.
const _: () = {
    fn _assert_object_safe(_: &dyn TodoStore) {}
};
