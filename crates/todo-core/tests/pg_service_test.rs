//! Service tests against PostgreSQL through `PgTodoStore`.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use todo_core::completion::{CompletionGateway, CompletionRequest};
use todo_core::store::PgTodoStore;
use todo_core::{TodoError, TodoService};
use todo_db::models::TodoPatch;
use todo_test_utils::{create_test_db, drop_test_db};

struct FixedCompletion(&'static str);

#[async_trait]
impl CompletionGateway for FixedCompletion {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<Option<String>> {
        Ok(Some(self.0.to_owned()))
    }
}

#[tokio::test]
async fn crud_roundtrip_against_postgres() {
    let (pool, db_name) = create_test_db().await;
    let service = TodoService::new(
        Arc::new(PgTodoStore::new(pool.clone())),
        Arc::new(FixedCompletion("")),
    );

    let todo = service.create("Renew passport").await.unwrap();
    assert!(!todo.is_completed);

    let patch = TodoPatch {
        title: None,
        is_completed: Some(true),
    };
    let updated = service.update(todo.id, &patch).await.unwrap();
    assert_eq!(updated.title, "Renew passport");
    assert!(updated.is_completed);

    let deleted = service.delete(todo.id).await.unwrap();
    assert_eq!(deleted.id, todo.id);
    assert!(service.list().await.unwrap().is_empty());

    let err = service.update(todo.id, &patch).await.unwrap_err();
    assert!(matches!(err, TodoError::NotFound { id } if id == todo.id));
    assert!(service.delete(Uuid::new_v4()).await.unwrap_err().is_not_found());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn generate_batches_items_into_postgres() {
    let (pool, db_name) = create_test_db().await;
    let service = TodoService::new(
        Arc::new(PgTodoStore::new(pool.clone())),
        Arc::new(FixedCompletion("## Plan\n- Stretch\n- Run 5k\n\nGood luck!\n- Cool down")),
    );

    let outcome = service.generate("Get fit").await.unwrap();
    assert_eq!(outcome.count, 3);

    let listed = service.list().await.unwrap();
    let titles: Vec<&str> = listed.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Stretch", "Run 5k", "Cool down"]);

    let summary = service.summary().await.unwrap();
    assert_eq!(summary.count_todos, 3);
    assert_eq!(summary.count_pending_todos, 3);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn concurrent_deletes_resolve_exactly_once() {
    let (pool, db_name) = create_test_db().await;
    let service = TodoService::new(
        Arc::new(PgTodoStore::new(pool.clone())),
        Arc::new(FixedCompletion("")),
    );
    let todo = service.create("Contended").await.unwrap();

    let (a, b) = tokio::join!(service.delete(todo.id), service.delete(todo.id));
    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one delete should win");

    pool.close().await;
    drop_test_db(&db_name).await;
}
