//! Domain layer for the to-do service.
//!
//! - [`store`]: the [`store::TodoStore`] persistence gateway with PostgreSQL
//!   and in-memory implementations.
//! - [`completion`]: the [`completion::CompletionGateway`] text-generation
//!   gateway and its Groq (OpenAI-compatible) HTTP client.
//! - [`generate`]: goal prompt construction and list-item extraction.
//! - [`service`]: [`service::TodoService`], the operations exposed over HTTP
//!   and the CLI.

pub mod completion;
pub mod error;
pub mod generate;
pub mod service;
pub mod store;

pub use error::{TODO_NOT_FOUND, TodoError, TodoResult};
pub use service::{GenerateOutcome, TodoService};
