use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use todo_db::models::{Todo, TodoCounts, TodoPatch};
use todo_db::queries::todos;

use super::TodoStore;

/// [`TodoStore`] backed by the `todos` table.
#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        todos::list_todos(&self.pool).await
    }

    async fn create(&self, title: &str) -> Result<Todo> {
        todos::insert_todo(&self.pool, title).await
    }

    async fn create_many(&self, titles: &[String]) -> Result<Vec<Todo>> {
        todos::insert_todos(&self.pool, titles).await
    }

    async fn update(&self, id: Uuid, patch: &TodoPatch) -> Result<Option<Todo>> {
        todos::update_todo(&self.pool, id, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Todo>> {
        todos::delete_todo(&self.pool, id).await
    }

    async fn counts(&self) -> Result<TodoCounts> {
        todos::count_todos(&self.pool).await
    }
}
