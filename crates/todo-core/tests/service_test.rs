//! Service-level tests against in-memory gateways.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;
use uuid::Uuid;

use todo_core::completion::{ChatRole, CompletionGateway, CompletionRequest, DEFAULT_MODEL};
use todo_core::generate::SYSTEM_PROMPT;
use todo_core::store::{MemoryTodoStore, TodoStore};
use todo_core::{TODO_NOT_FOUND, TodoError, TodoService};
use todo_db::models::{Todo, TodoCounts, TodoPatch};

// -----------------------------------------------------------------------
// Fakes
// -----------------------------------------------------------------------

/// Replies with a canned completion and records every request it sees.
struct ScriptedCompletion {
    reply: Option<String>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    fn replying(reply: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.map(str::to_owned),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedCompletion {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }
}

struct FailingCompletion;

#[async_trait]
impl CompletionGateway for FailingCompletion {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<Option<String>> {
        bail!("upstream timed out")
    }
}

/// Store that fails every call except `counts`.
struct BrokenStore;

#[async_trait]
impl TodoStore for BrokenStore {
    fn name(&self) -> &str {
        "broken"
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        bail!("connection reset")
    }

    async fn create(&self, _title: &str) -> Result<Todo> {
        bail!("connection reset")
    }

    async fn create_many(&self, _titles: &[String]) -> Result<Vec<Todo>> {
        bail!("connection reset")
    }

    async fn update(&self, _id: Uuid, _patch: &TodoPatch) -> Result<Option<Todo>> {
        bail!("connection reset")
    }

    async fn delete(&self, _id: Uuid) -> Result<Option<Todo>> {
        bail!("connection reset")
    }

    async fn counts(&self) -> Result<TodoCounts> {
        Ok(TodoCounts::default())
    }
}

fn service_with(
    reply: Option<&str>,
) -> (TodoService, Arc<MemoryTodoStore>, Arc<ScriptedCompletion>) {
    let store = Arc::new(MemoryTodoStore::new());
    let completions = ScriptedCompletion::replying(reply);
    let service = TodoService::new(store.clone(), completions.clone());
    (service, store, completions)
}

fn titles(todos: &[Todo]) -> Vec<&str> {
    todos.iter().map(|t| t.title.as_str()).collect()
}

// -----------------------------------------------------------------------
// CRUD
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_returns_pending_todo_with_fresh_id() {
    let (service, _, _) = service_with(None);

    let mut ids = HashSet::new();
    for title in ["Water plants", "Call mom", "Water plants"] {
        let todo = service.create(title).await.unwrap();
        assert_eq!(todo.title, title);
        assert!(!todo.is_completed);
        assert!(ids.insert(todo.id), "id reused: {}", todo.id);
    }

    assert_eq!(service.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn update_completion_flag_keeps_title() {
    let (service, _, _) = service_with(None);
    let todo = service.create("Pay rent").await.unwrap();

    let patch = TodoPatch {
        title: None,
        is_completed: Some(true),
    };
    let updated = service.update(todo.id, &patch).await.unwrap();

    assert_eq!(updated.id, todo.id);
    assert_eq!(updated.title, "Pay rent");
    assert!(updated.is_completed);
    assert_eq!(updated.created_at, todo.created_at);
}

#[tokio::test]
async fn update_title_keeps_completion_flag() {
    let (service, _, _) = service_with(None);
    let todo = service.create("Draft").await.unwrap();
    service
        .update(
            todo.id,
            &TodoPatch {
                title: None,
                is_completed: Some(true),
            },
        )
        .await
        .unwrap();

    let renamed = service
        .update(
            todo.id,
            &TodoPatch {
                title: Some("Final".to_owned()),
                is_completed: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.title, "Final");
    assert!(renamed.is_completed);
}

#[tokio::test]
async fn state_can_toggle_back_to_pending() {
    let (service, _, _) = service_with(None);
    let todo = service.create("Toggle").await.unwrap();

    for flag in [true, false, true, false] {
        let patch = TodoPatch {
            title: None,
            is_completed: Some(flag),
        };
        let updated = service.update(todo.id, &patch).await.unwrap();
        assert_eq!(updated.is_completed, flag);
    }
}

#[tokio::test]
async fn update_unknown_id_is_not_found_and_mutates_nothing() {
    let (service, store, _) = service_with(None);
    let existing = service.create("Untouched").await.unwrap();
    let before = store.list().await.unwrap();

    let patch = TodoPatch {
        title: Some("Hijacked".to_owned()),
        is_completed: Some(true),
    };
    let err = service.update(Uuid::new_v4(), &patch).await.unwrap_err();

    assert!(matches!(err, TodoError::NotFound { .. }));
    assert_eq!(err.to_string(), TODO_NOT_FOUND);
    assert_eq!(store.list().await.unwrap(), before);
    assert_eq!(before, vec![existing]);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found_and_mutates_nothing() {
    let (service, store, _) = service_with(None);
    service.create("Still here").await.unwrap();
    let before = store.list().await.unwrap();

    let err = service.delete(Uuid::new_v4()).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), TODO_NOT_FOUND);
    assert_eq!(store.list().await.unwrap(), before);
}

#[tokio::test]
async fn delete_returns_last_state_and_hides_from_list() {
    let (service, _, _) = service_with(None);
    let keep = service.create("Keep").await.unwrap();
    let gone = service.create("Gone").await.unwrap();
    let gone = service
        .update(
            gone.id,
            &TodoPatch {
                title: None,
                is_completed: Some(true),
            },
        )
        .await
        .unwrap();

    let deleted = service.delete(gone.id).await.unwrap();
    assert_eq!(deleted, gone);

    let listed = service.list().await.unwrap();
    assert!(listed.iter().all(|t| t.id != gone.id));
    assert_eq!(listed, vec![keep]);

    // A second delete of the same id no longer resolves.
    assert!(service.delete(gone.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn summary_counts_by_state() {
    let (service, _, _) = service_with(None);
    let a = service.create("a").await.unwrap();
    service.create("b").await.unwrap();
    service.create("c").await.unwrap();
    service
        .update(
            a.id,
            &TodoPatch {
                title: None,
                is_completed: Some(true),
            },
        )
        .await
        .unwrap();

    let counts = service.summary().await.unwrap();
    assert_eq!(counts.count_todos, 3);
    assert_eq!(counts.count_completed_todos, 1);
    assert_eq!(counts.count_pending_todos, 2);
}

#[tokio::test]
async fn store_failures_propagate_as_upstream() {
    let service = TodoService::new(Arc::new(BrokenStore), ScriptedCompletion::replying(None));

    let err = service.create("x").await.unwrap_err();
    assert!(matches!(err, TodoError::Upstream(_)));
    assert_eq!(err.to_string(), "connection reset");

    let err = service.update(Uuid::new_v4(), &TodoPatch::default()).await.unwrap_err();
    assert!(!err.is_not_found());
}

// -----------------------------------------------------------------------
// Goal expansion
// -----------------------------------------------------------------------

#[tokio::test]
async fn generate_persists_each_list_item_in_order() {
    let (service, store, _) = service_with(Some("- A\n- B\n- C"));

    let outcome = service.generate("Organize the week").await.unwrap();

    assert_eq!(outcome.count, 3);
    assert_eq!(titles(&outcome.todos), vec!["A", "B", "C"]);
    assert!(outcome.todos.iter().all(|t| !t.is_completed));
    assert_eq!(titles(&store.list().await.unwrap()), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn generate_discards_non_list_lines() {
    let (service, store, _) = service_with(Some("Intro text\n- A\n\n- B\nFooter"));

    let outcome = service.generate("anything").await.unwrap();

    assert_eq!(outcome.count, 2);
    assert_eq!(titles(&store.list().await.unwrap()), vec!["A", "B"]);
}

#[tokio::test]
async fn generate_without_items_stores_nothing() {
    let (service, store, completions) = service_with(Some("Sorry, I can't help with that."));

    let outcome = service.generate("anything").await.unwrap();

    assert_eq!(outcome.count, 0);
    assert!(outcome.todos.is_empty());
    assert!(store.list().await.unwrap().is_empty());
    assert_eq!(completions.requests().len(), 1);
}

#[tokio::test]
async fn generate_with_missing_content_stores_nothing() {
    let (service, store, _) = service_with(None);

    let outcome = service.generate("anything").await.unwrap();

    assert_eq!(outcome.count, 0);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn generate_sends_one_request_with_goal_and_instruction() {
    let (service, _, completions) = service_with(Some("- x"));

    service.generate("Prepare for the marathon").await.unwrap();

    let requests = completions.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.model, DEFAULT_MODEL);
    assert_eq!(req.messages.len(), 2);
    assert_eq!(req.messages[0].role, ChatRole::User);
    assert_eq!(req.messages[0].content, "Prepare for the marathon");
    assert_eq!(req.messages[1].role, ChatRole::System);
    assert_eq!(req.messages[1].content, SYSTEM_PROMPT);
    assert_eq!(req.temperature, 1.0);
    assert_eq!(req.max_completion_tokens, 1024);
    assert_eq!(req.top_p, 1.0);
}

#[tokio::test]
async fn generate_uses_configured_model() {
    let store = Arc::new(MemoryTodoStore::new());
    let completions = ScriptedCompletion::replying(Some("- x"));
    let service = TodoService::new(store, completions.clone()).with_model("llama-3.1-8b-instant");

    assert_eq!(service.model(), "llama-3.1-8b-instant");
    service.generate("goal").await.unwrap();

    assert_eq!(completions.requests()[0].model, "llama-3.1-8b-instant");
}

#[tokio::test]
async fn generate_propagates_gateway_failure_and_stores_nothing() {
    let store = Arc::new(MemoryTodoStore::new());
    let service = TodoService::new(store.clone(), Arc::new(FailingCompletion));

    let err = service.generate("goal").await.unwrap_err();

    assert!(matches!(err, TodoError::Upstream(_)));
    assert_eq!(err.to_string(), "upstream timed out");
    assert!(store.list().await.unwrap().is_empty());
}
