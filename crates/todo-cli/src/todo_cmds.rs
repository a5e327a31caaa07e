//! CLI handlers for the to-do operations.
//!
//! Implements:
//! - `todo list`                        -- print every todo
//! - `todo add <title>`                 -- create a todo
//! - `todo update <id> [--title] [--state]` -- patch a todo
//! - `todo done <id>`                   -- mark a todo completed
//! - `todo remove <id>`                 -- delete a todo
//! - `todo generate <goal>`             -- expand a goal into todos via the LLM
//! - `todo summary`                     -- counts by state

use anyhow::{Context, Result, bail};
use uuid::Uuid;

use todo_core::TodoService;
use todo_db::models::{Todo, TodoPatch, TodoState};

use crate::TodoCommands;

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `TodoCommands` variant to the appropriate handler.
pub async fn run_todo_command(command: TodoCommands, service: &TodoService) -> Result<()> {
    match command {
        TodoCommands::List => cmd_list(service).await,
        TodoCommands::Add { title } => cmd_add(service, &title).await,
        TodoCommands::Update { id, title, state } => {
            let patch = TodoPatch {
                title,
                is_completed: state.map(TodoState::is_completed),
            };
            cmd_update(service, &id, patch).await
        }
        TodoCommands::Done { id } => {
            let patch = TodoPatch {
                title: None,
                is_completed: Some(true),
            };
            cmd_update(service, &id, patch).await
        }
        TodoCommands::Remove { id } => cmd_remove(service, &id).await,
        TodoCommands::Generate { goal } => cmd_generate(service, &goal).await,
        TodoCommands::Summary => cmd_summary(service).await,
    }
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("invalid todo ID: {raw:?}"))
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{field} must not be empty");
    }
    Ok(())
}

// -----------------------------------------------------------------------
// Output
// -----------------------------------------------------------------------

fn print_table(todos: &[Todo]) {
    println!("{:<36}  {:<9}  {:<16}  TITLE", "ID", "STATE", "CREATED");
    for todo in todos {
        println!(
            "{:<36}  {:<9}  {:<16}  {}",
            todo.id,
            todo.state(),
            todo.created_at.format("%Y-%m-%d %H:%M"),
            todo.title
        );
    }
}

fn print_one(todo: &Todo) {
    println!("  ID:       {}", todo.id);
    println!("  Title:    {}", todo.title);
    println!("  State:    {}", todo.state());
    println!("  Created:  {}", todo.created_at.to_rfc3339());
}

// -----------------------------------------------------------------------
// Handlers
// -----------------------------------------------------------------------

async fn cmd_list(service: &TodoService) -> Result<()> {
    let todos = service.list().await?;
    if todos.is_empty() {
        println!("No todos found. Use `todo add <title>` or `todo generate <goal>`.");
        return Ok(());
    }
    print_table(&todos);
    Ok(())
}

async fn cmd_add(service: &TodoService, title: &str) -> Result<()> {
    require_non_empty("title", title)?;
    let todo = service.create(title).await?;
    println!("Todo created.");
    println!();
    print_one(&todo);
    Ok(())
}

async fn cmd_update(service: &TodoService, id: &str, patch: TodoPatch) -> Result<()> {
    let id = parse_id(id)?;
    if patch.is_empty() {
        bail!("nothing to update; pass --title and/or --state");
    }
    if let Some(title) = &patch.title {
        require_non_empty("title", title)?;
    }
    let todo = service.update(id, &patch).await?;
    println!("Todo updated.");
    println!();
    print_one(&todo);
    Ok(())
}

async fn cmd_remove(service: &TodoService, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let todo = service.delete(id).await?;
    println!("Todo {} deleted ({:?}).", todo.id, todo.title);
    Ok(())
}

async fn cmd_generate(service: &TodoService, goal: &str) -> Result<()> {
    require_non_empty("goal", goal)?;
    let outcome = service.generate(goal).await?;
    if outcome.count == 0 {
        println!("The model returned no list items; nothing was stored.");
        return Ok(());
    }
    println!("Generated {} todos.", outcome.count);
    println!();
    print_table(&outcome.todos);
    Ok(())
}

async fn cmd_summary(service: &TodoService) -> Result<()> {
    let counts = service.summary().await?;
    println!("  Total:      {}", counts.count_todos);
    println!("  Completed:  {}", counts.count_completed_todos);
    println!("  Pending:    {}", counts.count_pending_todos);
    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
