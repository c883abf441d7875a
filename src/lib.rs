//! Async modal dialog orchestration
//!
//! This crate turns an arbitrary content component into an asynchronously
//! awaitable modal dialog: callers invoke [`AsyncModal::open`], a dialog is
//! displayed through an injected rendering collaborator, and the call
//! settles exactly once when the user confirms, cancels, or the embedded
//! content submits a value of its own. It provides:
//! - A per-invocation multicast [`Emitter`] with multi-name, one-shot and
//!   first-only registration and fail-fast result aggregation
//! - The [`AsyncModal`] orchestrator wiring native action controls and
//!   custom emits into a single settlement path
//! - A [`DialogHandle`] capability injected into content components, scoped
//!   to the fixed ok/cancel/submit/close vocabulary
//! - `modalify`, `confirm` and `alert` adapters over the core `open`
//!
//! Rendering is delegated entirely to a [`ModalRenderer`] collaborator; the
//! core only needs it to display content, forward native control presses,
//! and tear the dialog down on request.

pub mod emitter;
pub mod errors;
pub mod events;
pub mod modal;
pub mod options;
pub mod render;

// Re-export main types
pub use emitter::{Emitter, EventName, Handler, HandlerFuture, HandlerId};

pub use errors::{DialogError, DialogResult};

pub use events::DialogEvent;

pub use modal::{AsyncModal, DialogHandle};

pub use options::{
    AlertOptions, CancelHook, ConfirmOptions, ModalOptions, ModalOptionsSource, OkHook,
    CONFIRM_WIDTH, DEFAULT_WIDTH,
};

pub use render::{ActionCallback, ModalContent, ModalHandle, ModalRenderer, RenderRequest};
