//! Error types for dialog orchestration

use thiserror::Error;

/// Result alias used throughout the crate
pub type DialogResult<T> = Result<T, DialogError>;

/// Errors surfaced by an invocation or by an emit
#[derive(Debug, Error)]
pub enum DialogError {
    /// The dialog was abandoned: cancel control, close affordance, or an
    /// explicit `close` emission. Carries no structured reason.
    #[error("dialog cancelled")]
    Cancelled,

    /// A registered handler failed. On the ok path this blocks the dialog
    /// from closing until a later successful attempt or an explicit cancel.
    #[error("handler for '{event}' failed: {source}")]
    Handler {
        event: String,
        #[source]
        source: anyhow::Error,
    },

    /// The rendering collaborator failed to display the dialog.
    #[error("failed to render dialog: {0}")]
    Render(#[source] anyhow::Error),
}
