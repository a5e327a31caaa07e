use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use todo_db::models::{Todo, TodoCounts, TodoPatch};

use super::TodoStore;

/// In-process [`TodoStore`]. Contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, kept in the given order.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: RwLock::new(todos),
        }
    }

    fn new_todo(title: &str) -> Todo {
        Todo {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            is_completed: false,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        Ok(self.todos.read().await.clone())
    }

    async fn create(&self, title: &str) -> Result<Todo> {
        let todo = Self::new_todo(title);
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn create_many(&self, titles: &[String]) -> Result<Vec<Todo>> {
        let created: Vec<Todo> = titles.iter().map(|t| Self::new_todo(t)).collect();
        self.todos.write().await.extend(created.iter().cloned());
        Ok(created)
    }

    async fn update(&self, id: Uuid, patch: &TodoPatch) -> Result<Option<Todo>> {
        let mut todos = self.todos.write().await;
        Ok(todos.iter_mut().find(|t| t.id == id).map(|todo| {
            patch.apply_to(todo);
            todo.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Todo>> {
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter()
            .position(|t| t.id == id)
            .map(|idx| todos.remove(idx)))
    }

    async fn counts(&self) -> Result<TodoCounts> {
        let todos = self.todos.read().await;
        let completed = todos.iter().filter(|t| t.is_completed).count() as i64;
        let total = todos.len() as i64;
        Ok(TodoCounts {
            count_todos: total,
            count_completed_todos: completed,
            count_pending_todos: total - completed,
        })
    }
}
