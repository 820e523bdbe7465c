mod backend;
mod jobboard;

pub use backend::BackendErrorBody;
pub use jobboard::JobBoardError;

/// Longest slice of an upstream body kept in logs and error messages.
pub(crate) const BODY_PREVIEW_CHARS: usize = 200;

pub(crate) fn preview(body: &str) -> String {
    body.char_indices()
        .nth(BODY_PREVIEW_CHARS)
        .map(|(idx, _)| format!("{}...<truncated>", &body[..idx]))
        .unwrap_or_else(|| body.to_string())
}
