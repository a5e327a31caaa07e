//! Shared test utilities for integration tests that need PostgreSQL.
//!
//! Provides a PostgreSQL instance shared across tests. Each test gets its
//! own database within the instance.
//!
//! Two modes:
//! - **`TODO_TEST_PG_URL`** set: use that server directly (CI service
//!   container, local install). No testcontainers overhead per process.
//! - **No env var**: spin up a container via testcontainers, shared per test
//!   binary through a `OnceCell`.

use sqlx::{Executor, PgPool};
use testcontainers::ContainerAsync;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use todo_db::config::DbConfig;
use todo_db::pool;

/// Shared container state: base URL and optional container handle (kept alive).
struct SharedPg {
    base_url: String,
    /// Held to keep the container alive. `None` when using an external URL.
    _container: Option<ContainerAsync<Postgres>>,
}

static SHARED_PG: OnceCell<SharedPg> = OnceCell::const_new();

async fn init_shared_pg() -> SharedPg {
    if let Ok(url) = std::env::var("TODO_TEST_PG_URL") {
        return SharedPg {
            base_url: url.trim_end_matches('/').to_owned(),
            _container: None,
        };
    }

    let container = Postgres::default()
        .with_tag("17")
        .start()
        .await
        .expect("failed to start PostgreSQL container");

    let host = container.get_host().await.expect("failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to get mapped port");

    SharedPg {
        base_url: format!("postgresql://postgres:postgres@{host}:{port}"),
        _container: Some(container),
    }
}

/// Base URL for the shared PostgreSQL (server root, no database name).
pub async fn pg_url() -> &'static str {
    let shared = SHARED_PG.get_or_init(init_shared_pg).await;
    &shared.base_url
}

/// Connection settings for a fresh, uniquely named database on the shared
/// server.
async fn fresh_db_config() -> DbConfig {
    let name = format!("todo_test_{}", Uuid::new_v4().simple());
    DbConfig::new(format!("{}/{name}", pg_url().await))
}

/// Create a temporary database with migrations applied.
///
/// Returns `(pool, db_name)`. Call [`drop_test_db`] with the returned
/// `db_name` when the test is done.
pub async fn create_test_db() -> (PgPool, String) {
    let (pool, db_name) = create_empty_test_db().await;
    pool::run_migrations(&pool)
        .await
        .expect("migrations should succeed");
    (pool, db_name)
}

/// Create a temporary database without running migrations.
pub async fn create_empty_test_db() -> (PgPool, String) {
    let config = fresh_db_config().await;
    let db_name = config
        .database_name()
        .expect("test URL names a database")
        .to_owned();

    let created = pool::ensure_database_exists(&config)
        .await
        .unwrap_or_else(|e| panic!("failed to create temp database {db_name}: {e:#}"));
    assert!(created, "temp database {db_name} already existed");

    let pool = pool::connect(&config.database_url, 5)
        .await
        .unwrap_or_else(|e| panic!("{e:#}"));
    (pool, db_name)
}

/// Drop a temporary database, terminating any connections still open on it.
/// A database that is already gone is ignored.
pub async fn drop_test_db(db_name: &str) {
    let config = DbConfig::new(format!("{}/{db_name}", pg_url().await));
    let Ok(maint) = pool::connect(&config.maintenance_url(), 1).await else {
        return;
    };

    let _ = sqlx::query(
        "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
         WHERE datname = $1 AND pid <> pg_backend_pid()",
    )
    .bind(db_name)
    .execute(&maint)
    .await;
    let _ = maint
        .execute(format!("DROP DATABASE IF EXISTS {db_name}").as_str())
        .await;
    maint.close().await;
}
