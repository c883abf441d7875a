//! Contract with the external dialog collaborator
//!
//! The orchestrator never draws anything. It hands the collaborator a
//! [`RenderRequest`] describing one dialog, receives a [`ModalHandle`] back,
//! and calls [`ModalHandle::destroy`] once the invocation settles. The
//! collaborator invokes the request's action callbacks when its native
//! controls fire, forwarding any native event arguments.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::DialogResult;
use crate::modal::DialogHandle;

/// Callback the renderer invokes when a native action control fires.
/// Native event arguments are forwarded as opaque values.
pub type ActionCallback =
    Arc<dyn Fn(Vec<Value>) -> Pin<Box<dyn Future<Output = DialogResult<()>> + Send>> + Send + Sync>;

/// A renderable unit embedded inside the dialog
///
/// Opaque to the orchestrator apart from the capability injection at render
/// time. Both methods have defaults: content that needs no interaction and
/// no payload can implement neither.
pub trait ModalContent: Send + Sync {
    /// Called once when the dialog opens, handing the content the bus-backed
    /// capability. The content does not own the bus and must not outlive
    /// the invocation.
    fn mount(&self, _dialog: DialogHandle) {}

    /// Opaque payload for the renderer to display
    fn body(&self) -> Value {
        Value::Null
    }
}

/// Everything the collaborator needs to display one dialog
#[derive(Clone)]
pub struct RenderRequest {
    pub title: String,
    pub width: u32,
    pub closable: bool,
    pub centered: bool,
    pub class_name: String,
    /// Whether to render the collaborator's built-in icon
    pub icon: bool,
    pub footer: bool,
    pub ok_text: String,
    pub cancel_text: String,
    pub cancel_btn: bool,
    pub content: Arc<dyn ModalContent>,
    /// Invoked when the primary control fires
    pub on_ok: ActionCallback,
    /// Invoked when the secondary control or the close affordance fires
    pub on_cancel: ActionCallback,
    /// Pass-through fields, forwarded verbatim
    pub extra: HashMap<String, Value>,
}

/// The enclosing dialog system
#[async_trait]
pub trait ModalRenderer: Send + Sync {
    /// Display a dialog. The returned handle closes it on settlement.
    async fn render(&self, request: RenderRequest) -> anyhow::Result<Box<dyn ModalHandle>>;
}

/// Handle to a displayed dialog
pub trait ModalHandle: Send + Sync {
    /// Close the dialog. Safe to call more than once.
    fn destroy(&self);
}
