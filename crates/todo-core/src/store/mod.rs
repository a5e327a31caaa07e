//! Persistence gateway for to-do items.
//!
//! [`TodoStore`] is the narrow interface [`crate::TodoService`] talks to.
//! [`PgTodoStore`] backs it with PostgreSQL; [`MemoryTodoStore`] keeps
//! everything in process (tests and `serve --ephemeral`).

pub mod memory;
pub mod postgres;
pub mod trait_def;

pub use memory::MemoryTodoStore;
pub use postgres::PgTodoStore;
pub use trait_def::TodoStore;
