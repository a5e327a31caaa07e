//! Text-generation gateway.
//!
//! ```text
//! TodoService::generate
//!     |
//!     v
//! CompletionRequest { model, messages, temperature, ... }
//!     |
//!     v
//! &dyn CompletionGateway --complete()--> Option<String>
//!     |
//!     +-- GroqClient: POST {base_url}/chat/completions
//! ```

pub mod config;
pub mod groq;
pub mod trait_def;
pub mod types;

pub use config::LlmConfig;
pub use groq::GroqClient;
pub use trait_def::CompletionGateway;
pub use types::{
    ChatMessage, ChatRole, CompletionRequest, DEFAULT_MODEL, MAX_COMPLETION_TOKENS, TEMPERATURE,
    TOP_P,
};
