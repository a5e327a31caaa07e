//! Database query functions for the `todos` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Todo, TodoCounts, TodoPatch};

/// Insert a new todo row. Returns the inserted row with server-generated
/// defaults (id, is_completed, created_at).
pub async fn insert_todo(pool: &PgPool, title: &str) -> Result<Todo> {
    let todo = sqlx::query_as::<_, Todo>("INSERT INTO todos (title) VALUES ($1) RETURNING *")
        .bind(title)
        .fetch_one(pool)
        .await
        .context("failed to insert todo")?;

    Ok(todo)
}

/// Insert one row per title in a single statement.
///
/// Rows are inserted in the order given and returned in that same order.
/// An empty slice inserts nothing and returns an empty vector.
pub async fn insert_todos(pool: &PgPool, titles: &[String]) -> Result<Vec<Todo>> {
    let mut todos = sqlx::query_as::<_, Todo>(
        "INSERT INTO todos (title) \
         SELECT t.title FROM UNNEST($1::text[]) WITH ORDINALITY AS t(title, ord) \
         ORDER BY t.ord \
         RETURNING *",
    )
    .bind(titles)
    .fetch_all(pool)
    .await
    .with_context(|| format!("failed to insert {} todos", titles.len()))?;

    // created_at defaults to clock_timestamp(), which increases per row.
    todos.sort_by_key(|t| t.created_at);
    Ok(todos)
}

/// Fetch a todo by its ID.
pub async fn get_todo(pool: &PgPool, id: Uuid) -> Result<Option<Todo>> {
    let todo = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch todo")?;

    Ok(todo)
}

/// List all todos, oldest first.
pub async fn list_todos(pool: &PgPool) -> Result<Vec<Todo>> {
    let todos = sqlx::query_as::<_, Todo>("SELECT * FROM todos ORDER BY created_at, id")
        .fetch_all(pool)
        .await
        .context("failed to list todos")?;

    Ok(todos)
}

/// Apply a partial update to a todo in one statement.
///
/// Fields left as `None` keep their stored value. Returns `None` when no
/// row has the given ID, in which case nothing is written.
pub async fn update_todo(pool: &PgPool, id: Uuid, patch: &TodoPatch) -> Result<Option<Todo>> {
    let todo = sqlx::query_as::<_, Todo>(
        "UPDATE todos \
         SET title = COALESCE($2, title), \
             is_completed = COALESCE($3, is_completed) \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(id)
    .bind(patch.title.as_deref())
    .bind(patch.is_completed)
    .fetch_optional(pool)
    .await
    .context("failed to update todo")?;

    Ok(todo)
}

/// Delete a todo, returning its last stored state.
///
/// Returns `None` when no row has the given ID.
pub async fn delete_todo(pool: &PgPool, id: Uuid) -> Result<Option<Todo>> {
    let todo = sqlx::query_as::<_, Todo>("DELETE FROM todos WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to delete todo")?;

    Ok(todo)
}

/// Count todos overall and by completion state.
pub async fn count_todos(pool: &PgPool) -> Result<TodoCounts> {
    let counts = sqlx::query_as::<_, TodoCounts>(
        "SELECT COUNT(*) AS count_todos, \
                COUNT(*) FILTER (WHERE is_completed) AS count_completed_todos, \
                COUNT(*) FILTER (WHERE NOT is_completed) AS count_pending_todos \
         FROM todos",
    )
    .fetch_one(pool)
    .await
    .context("failed to count todos")?;

    Ok(counts)
}
