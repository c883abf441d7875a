//! Capability object injected into content components

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::emitter::{Emitter, HandlerId};
use crate::errors::DialogResult;
use crate::events::DialogEvent;

/// Restricted view of one invocation's event bus
///
/// Scoped to the fixed lifecycle vocabulary: register `ok`/`cancel`
/// handlers, or bypass the built-in controls with a direct `submit`/`close`.
/// The content component does not own the bus and must not outlive the
/// invocation.
#[derive(Clone)]
pub struct DialogHandle {
    emitter: Arc<Emitter>,
}

impl DialogHandle {
    pub(crate) fn new(emitter: Arc<Emitter>) -> Self {
        Self { emitter }
    }

    /// Register a handler for the primary action. Its result becomes the
    /// candidate resolution value; failing blocks the dialog from closing.
    pub fn on_ok<F, Fut>(&self, f: F) -> HandlerId
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.emitter.on(DialogEvent::Ok, f)
    }

    /// Register a cleanup handler for the secondary action
    pub fn on_cancel<F, Fut>(&self, f: F) -> HandlerId
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.emitter.on(DialogEvent::Cancel, move |args| {
            let fut = f(args);
            async move { fut.await.map(|()| Value::Null) }
        })
    }

    /// Submit a final value directly, bypassing the built-in controls.
    /// The invocation resolves with `value`.
    pub async fn submit(&self, value: Value) -> DialogResult<()> {
        self.emitter
            .emit(DialogEvent::Submit, vec![value])
            .await
            .map(|_| ())
    }

    /// Abandon the dialog directly; the invocation fails with
    /// [`DialogError::Cancelled`](crate::errors::DialogError::Cancelled).
    pub async fn close(&self) -> DialogResult<()> {
        self.emitter
            .emit(DialogEvent::Close, Vec::new())
            .await
            .map(|_| ())
    }
}
