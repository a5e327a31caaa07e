//! Goal expansion: prompt construction and list-item extraction.
//!
//! Pure logic, no I/O. [`crate::TodoService::generate`] sends the request
//! built here and feeds the reply through [`extract_todo_titles`].

use crate::completion::{ChatMessage, CompletionRequest};

/// Instruction sent as the system message with every goal. Asks for a flat
/// markdown list of `-` items with no sub-items and no inline styling.
pub const SYSTEM_PROMPT: &str = "Aja como mediador, seu papel é gerar to do's para serem \
armazenados no sitema, a lista deve ser em markdown e não deve conter subitems. Os items \
devem ser listados por '-' e em estilo padrão, sem palavras em negrito, italico ou qualquer \
outro estilo de texto.";

/// Prefix identifying a list item in the model's reply.
const ITEM_PREFIX: &str = "- ";

/// Build the completion request for a goal.
///
/// The user message carries the goal verbatim and comes first, followed by
/// the system instruction.
pub fn build_goal_request(goal: &str, model: &str) -> CompletionRequest {
    CompletionRequest::new(
        model,
        vec![ChatMessage::user(goal), ChatMessage::system(SYSTEM_PROMPT)],
    )
}

/// Extract to-do titles from a markdown completion.
///
/// Each line is trimmed; only lines starting with `"- "` are kept, with the
/// prefix removed and the remainder trimmed again. Everything else (blank
/// lines, headings, prose, other bullet styles) is dropped. Order follows
/// the input.
pub fn extract_todo_titles(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(str::trim)
        .filter_map(|line| line.strip_prefix(ITEM_PREFIX))
        .map(|item| item.trim().to_owned())
        .collect()
}
