mod config;
mod serve_cmd;
#[cfg(test)]
mod test_util;
mod todo_cmds;

use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use todo_core::TodoService;
use todo_core::completion::{GroqClient, LlmConfig};
use todo_core::store::{MemoryTodoStore, PgTodoStore, TodoStore};
use todo_db::models::TodoState;
use todo_db::pool;

use config::TodoConfig;

#[derive(Parser)]
#[command(name = "todo", about = "To-do list service with LLM goal expansion")]
struct Cli {
    /// Database URL (overrides TODO_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a todo config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/todo")]
        db_url: String,
        /// API key for the chat-completion provider
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the database if needed and apply migrations
    DbInit,
    /// Serve the HTTP API
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
        /// Keep todos in memory instead of PostgreSQL (lost on exit)
        #[arg(long)]
        ephemeral: bool,
    },
    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: Shell,
    },
    #[command(flatten)]
    Todo(TodoCommands),
}

#[derive(Subcommand)]
pub enum TodoCommands {
    /// List all todos
    List,
    /// Create a todo
    Add {
        /// Title of the new todo
        title: String,
    },
    /// Change a todo's title and/or state
    Update {
        /// Todo ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New state: `pending` or `completed` (alias `done`)
        #[arg(long)]
        state: Option<TodoState>,
    },
    /// Mark a todo as completed
    Done {
        /// Todo ID
        id: String,
    },
    /// Delete a todo
    Remove {
        /// Todo ID
        id: String,
    },
    /// Ask the LLM to break a goal into todos and store them
    Generate {
        /// Free-text goal
        goal: String,
    },
    /// Show counts of completed and pending todos
    Summary,
}

/// Wire a store and the configured completion client into a service.
fn build_service(store: Arc<dyn TodoStore>, llm: LlmConfig) -> anyhow::Result<TodoService> {
    let model = llm.model.clone();
    let completions = GroqClient::new(llm)?;
    Ok(TodoService::new(store, Arc::new(completions)).with_model(model))
}

/// Execute the `todo init` command: write config file.
fn cmd_init(db_url: &str, api_key: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let masked = api_key.as_deref().map(config::mask_secret);
    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        llm: config::LlmSection {
            api_key,
            base_url: None,
            model: None,
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    match masked {
        Some(key) => println!("  llm.api_key = {key}"),
        None => println!(
            "  llm.api_key not set (export {} before generating)",
            LlmConfig::API_KEY_ENV
        ),
    }
    println!();
    println!("Next: run `todo db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `todo db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = TodoConfig::resolve(cli_db_url)?;

    println!("Initializing todo database...");

    if pool::ensure_database_exists(&resolved.db_config).await? {
        let name = resolved.db_config.database_name().unwrap_or_default();
        println!("Created database {name}.");
    }
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    let result = async {
        pool::run_migrations(&db_pool).await?;
        pool::todo_count(&db_pool).await
    }
    .await;
    db_pool.close().await;

    let count = result?;
    println!("Database ready. todos: {count} rows");
    println!("todo db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            db_url,
            api_key,
            force,
        } => {
            cmd_init(&db_url, api_key, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Serve {
            bind,
            port,
            ephemeral,
        } => {
            let resolved = TodoConfig::resolve(cli.database_url.as_deref())?;
            if ephemeral {
                let store: Arc<dyn TodoStore> = Arc::new(MemoryTodoStore::new());
                let service = build_service(store, resolved.llm_config)?;
                serve_cmd::run_serve(service, &bind, port).await?;
            } else {
                let db_pool = pool::create_pool(&resolved.db_config).await?;
                let store: Arc<dyn TodoStore> = Arc::new(PgTodoStore::new(db_pool.clone()));
                let result = match build_service(store, resolved.llm_config) {
                    Ok(service) => serve_cmd::run_serve(service, &bind, port).await,
                    Err(e) => Err(e),
                };
                db_pool.close().await;
                result?;
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "todo", &mut std::io::stdout());
        }
        Commands::Todo(command) => {
            let resolved = TodoConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config)
                .await
                .context("run `todo db-init` first if the database does not exist yet")?;
            let store: Arc<dyn TodoStore> = Arc::new(PgTodoStore::new(db_pool.clone()));
            let result = match build_service(store, resolved.llm_config) {
                Ok(service) => todo_cmds::run_todo_command(command, &service).await,
                Err(e) => Err(e),
            };
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
