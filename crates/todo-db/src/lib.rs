//! PostgreSQL persistence for to-do items.
//!
//! Connection configuration, pooling, embedded migrations, the [`models::Todo`]
//! row type and the query functions over the `todos` table.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
