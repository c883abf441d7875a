//! Async modal orchestration
//!
//! One invocation correlates exactly one pending future, one event bus, and
//! one renderer handle. The dialog's native action callbacks and the
//! content component's custom emits converge on two settlement listeners
//! installed at open time, so whatever the trigger origin, the invocation
//! settles at most once and the dialog is torn down at most once.

mod handle;

pub use handle::DialogHandle;

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::debug;

use crate::emitter::Emitter;
use crate::errors::{DialogError, DialogResult};
use crate::events::DialogEvent;
use crate::options::{
    AlertOptions, ConfirmOptions, ModalOptions, ModalOptionsSource, CONFIRM_WIDTH,
};
use crate::render::{ActionCallback, ModalContent, ModalHandle, ModalRenderer, RenderRequest};

type Settlement = Arc<Mutex<Option<oneshot::Sender<DialogResult<Value>>>>>;

fn take_settlement(settlement: &Settlement) -> Option<oneshot::Sender<DialogResult<Value>>> {
    settlement.lock().unwrap_or_else(|e| e.into_inner()).take()
}

/// Orchestrates awaitable modal dialogs over an injected renderer
#[derive(Clone)]
pub struct AsyncModal {
    renderer: Arc<dyn ModalRenderer>,
}

impl AsyncModal {
    pub fn new(renderer: Arc<dyn ModalRenderer>) -> Self {
        Self { renderer }
    }

    /// Open a dialog around `content` and await its settlement
    ///
    /// The content component is injected with a [`DialogHandle`] before the
    /// dialog is displayed. The returned future resolves with the submitted
    /// value, fails with [`DialogError::Cancelled`] when the cancel path
    /// completes, and stays pending while an `ok` handler keeps failing.
    pub async fn open(
        &self,
        content: Arc<dyn ModalContent>,
        options: ModalOptions,
    ) -> DialogResult<Value> {
        let ModalOptions {
            title,
            footer,
            closable,
            centered,
            ok_text,
            cancel_text,
            cancel_btn,
            width,
            class_name,
            icon,
            on_ok,
            on_cancel,
            extra,
        } = options;

        let emitter = Arc::new(Emitter::new());
        content.mount(DialogHandle::new(emitter.clone()));

        let ok_emitter = emitter.clone();
        let ok: ActionCallback = Arc::new(move |native_args: Vec<Value>| {
            let emitter = ok_emitter.clone();
            let on_ok = on_ok.clone();
            Box::pin(async move {
                // only the first ok handler's result is the candidate value
                let mut value = emitter
                    .emit(DialogEvent::Ok, native_args.clone())
                    .await?
                    .into_iter()
                    .next()
                    .unwrap_or(Value::Null);

                if let Some(hook) = &on_ok {
                    value = hook(value, native_args)
                        .await
                        .map_err(|source| DialogError::Handler {
                            event: DialogEvent::Ok.name().to_string(),
                            source,
                        })?;
                }

                emitter.emit(DialogEvent::Submit, vec![value]).await?;
                Ok(())
            })
        });

        let cancel_emitter = emitter.clone();
        let cancel: ActionCallback = Arc::new(move |native_args: Vec<Value>| {
            let emitter = cancel_emitter.clone();
            let on_cancel = on_cancel.clone();
            Box::pin(async move {
                // a failing cancel handler aborts the close transition and
                // surfaces to whoever triggered the cancel
                emitter.emit(DialogEvent::Cancel, native_args.clone()).await?;

                if let Some(hook) = &on_cancel {
                    hook(native_args)
                        .await
                        .map_err(|source| DialogError::Handler {
                            event: DialogEvent::Cancel.name().to_string(),
                            source,
                        })?;
                }

                emitter.emit(DialogEvent::Close, Vec::new()).await?;
                Ok(())
            })
        });

        let class_name = if class_name.is_empty() {
            "async-modal".to_string()
        } else {
            format!("async-modal {class_name}")
        };

        let request = RenderRequest {
            title,
            width,
            closable,
            centered,
            class_name,
            icon,
            footer,
            ok_text,
            cancel_text,
            cancel_btn,
            content,
            on_ok: ok,
            on_cancel: cancel,
            extra,
        };

        let dialog: Arc<dyn ModalHandle> = self
            .renderer
            .render(request)
            .await
            .map_err(DialogError::Render)?
            .into();

        let (tx, rx) = oneshot::channel::<DialogResult<Value>>();
        let settlement: Settlement = Arc::new(Mutex::new(Some(tx)));

        let submit_settlement = settlement.clone();
        let submit_dialog = dialog.clone();
        emitter.on(DialogEvent::Submit, move |mut args: Vec<Value>| {
            let settlement = submit_settlement.clone();
            let dialog = submit_dialog.clone();
            async move {
                // first settlement wins; later submit/close emits are no-ops
                if let Some(tx) = take_settlement(&settlement) {
                    let value = if args.is_empty() {
                        Value::Null
                    } else {
                        args.remove(0)
                    };
                    debug!("invocation resolved");
                    let _ = tx.send(Ok(value));
                    dialog.destroy();
                }
                Ok(Value::Null)
            }
        });

        let close_settlement = settlement.clone();
        let close_dialog = dialog.clone();
        emitter.on(DialogEvent::Close, move |_args: Vec<Value>| {
            let settlement = close_settlement.clone();
            let dialog = close_dialog.clone();
            async move {
                if let Some(tx) = take_settlement(&settlement) {
                    debug!("invocation cancelled");
                    let _ = tx.send(Err(DialogError::Cancelled));
                    dialog.destroy();
                }
                Ok(Value::Null)
            }
        });

        rx.await.unwrap_or(Err(DialogError::Cancelled))
    }

    /// Adapt a props-to-content constructor into a directly callable
    /// async-modal function. Options may be fixed or computed from the
    /// props at call time.
    pub fn modalify<P, B>(
        &self,
        build: B,
        options: impl Into<ModalOptionsSource<P>>,
    ) -> impl Fn(P) -> BoxFuture<'static, DialogResult<Value>>
    where
        P: Send + 'static,
        B: Fn(&P) -> Arc<dyn ModalContent> + Send + Sync + 'static,
    {
        let modal = self.clone();
        let options = options.into();
        move |props: P| {
            let resolved = options.resolve(&props);
            let content = build(&props);
            let modal = modal.clone();
            Box::pin(async move { modal.open(content, resolved).await })
        }
    }

    /// Two-button confirmation preset. Resolves `true` on confirm and fails
    /// with [`DialogError::Cancelled`] on cancel; callers distinguish the
    /// outcomes by success vs failure, not by the payload.
    pub async fn confirm(
        &self,
        content: Arc<dyn ModalContent>,
        options: ConfirmOptions,
    ) -> DialogResult<bool> {
        let options = ModalOptions::new()
            .title(options.title)
            .ok_text(options.ok_text)
            .cancel_text(options.cancel_text)
            .width(CONFIRM_WIDTH)
            .on_ok(|_, _| async { Ok(Value::Bool(true)) });

        self.open(content, options).await?;
        Ok(true)
    }

    /// Single-button acknowledgement preset. Cancellation (when reachable
    /// through the close affordance) is swallowed; always `true`.
    pub async fn alert(&self, content: Arc<dyn ModalContent>, options: AlertOptions) -> bool {
        let options = ModalOptions::new()
            .title(options.title)
            .ok_text(options.ok_text)
            .width(CONFIRM_WIDTH)
            .cancel_btn(false)
            .on_ok(|_, _| async { Ok(Value::Bool(true)) });

        if let Err(err) = self.open(content, options).await {
            debug!(error = %err, "alert dismissed without confirmation");
        }
        true
    }
}
