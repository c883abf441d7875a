//! Invocation configuration
//!
//! All defaults are explicit and carried per call; there is no shared
//! mutable configuration state. Unrecognized fields go into `extra` and are
//! forwarded verbatim to the rendering collaborator.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

/// Default dialog width
pub const DEFAULT_WIDTH: u32 = 800;

/// Width used by the confirm and alert presets
pub const CONFIRM_WIDTH: u32 = 460;

type HookFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send>>;

/// Transform/validation hook run after the internal `ok` handlers. Receives
/// the candidate value plus the native event arguments; its result becomes
/// the final submitted value. Failing keeps the dialog open.
pub type OkHook = Arc<dyn Fn(Value, Vec<Value>) -> HookFuture<Value> + Send + Sync>;

/// Hook run after the internal `cancel` handlers, before the close
/// transition
pub type CancelHook = Arc<dyn Fn(Vec<Value>) -> HookFuture<()> + Send + Sync>;

/// Configuration for one dialog invocation
#[derive(Clone)]
pub struct ModalOptions {
    /// Dialog title
    pub title: String,
    /// Render the built-in footer with its action controls
    pub footer: bool,
    /// Show the close affordance; it routes through the cancel path
    pub closable: bool,
    /// Center the dialog
    pub centered: bool,
    /// Label of the primary control
    pub ok_text: String,
    /// Label of the secondary control
    pub cancel_text: String,
    /// Render the secondary control at all
    pub cancel_btn: bool,
    /// Dialog width
    pub width: u32,
    /// Extra class name appended to the dialog's own
    pub class_name: String,
    /// Render the collaborator's built-in icon
    pub icon: bool,
    /// Optional ok-path transform/validation hook
    pub on_ok: Option<OkHook>,
    /// Optional cancel-path hook
    pub on_cancel: Option<CancelHook>,
    /// Pass-through fields forwarded verbatim to the renderer
    pub extra: HashMap<String, Value>,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            footer: true,
            closable: true,
            centered: true,
            ok_text: "OK".to_string(),
            cancel_text: "Cancel".to_string(),
            cancel_btn: true,
            width: DEFAULT_WIDTH,
            class_name: String::new(),
            icon: false,
            on_ok: None,
            on_cancel: None,
            extra: HashMap::new(),
        }
    }
}

impl fmt::Debug for ModalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalOptions")
            .field("title", &self.title)
            .field("footer", &self.footer)
            .field("closable", &self.closable)
            .field("centered", &self.centered)
            .field("ok_text", &self.ok_text)
            .field("cancel_text", &self.cancel_text)
            .field("cancel_btn", &self.cancel_btn)
            .field("width", &self.width)
            .field("class_name", &self.class_name)
            .field("icon", &self.icon)
            .field("on_ok", &self.on_ok.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .field("extra", &self.extra)
            .finish()
    }
}

impl ModalOptions {
    /// Create options with the documented defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialog title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Toggle the built-in footer
    pub fn footer(mut self, footer: bool) -> Self {
        self.footer = footer;
        self
    }

    /// Toggle the close affordance
    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    /// Toggle centering
    pub fn centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    /// Set the primary control label
    pub fn ok_text(mut self, text: impl Into<String>) -> Self {
        self.ok_text = text.into();
        self
    }

    /// Set the secondary control label
    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    /// Toggle the secondary control
    pub fn cancel_btn(mut self, cancel_btn: bool) -> Self {
        self.cancel_btn = cancel_btn;
        self
    }

    /// Set the dialog width
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Append a class name to the dialog's own
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Set the ok-path transform/validation hook
    pub fn on_ok<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Value, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.on_ok = Some(Arc::new(move |value, args| Box::pin(f(value, args))));
        self
    }

    /// Set the cancel-path hook
    pub fn on_cancel<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_cancel = Some(Arc::new(move |args| Box::pin(f(args))));
        self
    }

    /// Add a pass-through field for the renderer
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Options for the two-button confirmation preset
#[derive(Debug, Clone)]
pub struct ConfirmOptions {
    pub title: String,
    pub ok_text: String,
    pub cancel_text: String,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            title: "Notice".to_string(),
            ok_text: "OK".to_string(),
            cancel_text: "Cancel".to_string(),
        }
    }
}

impl ConfirmOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn ok_text(mut self, text: impl Into<String>) -> Self {
        self.ok_text = text.into();
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }
}

/// Options for the single-button acknowledgement preset
#[derive(Debug, Clone)]
pub struct AlertOptions {
    pub title: String,
    pub ok_text: String,
}

impl Default for AlertOptions {
    fn default() -> Self {
        Self {
            title: "Notice".to_string(),
            ok_text: "OK".to_string(),
        }
    }
}

impl AlertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn ok_text(mut self, text: impl Into<String>) -> Self {
        self.ok_text = text.into();
        self
    }
}

/// Options for a modalified component: fixed, or computed from the props
pub enum ModalOptionsSource<P> {
    Fixed(ModalOptions),
    FromProps(Arc<dyn Fn(&P) -> ModalOptions + Send + Sync>),
}

impl<P> ModalOptionsSource<P> {
    /// Build a props-dependent source from a closure
    pub fn from_props<F>(f: F) -> Self
    where
        F: Fn(&P) -> ModalOptions + Send + Sync + 'static,
    {
        Self::FromProps(Arc::new(f))
    }

    pub(crate) fn resolve(&self, props: &P) -> ModalOptions {
        match self {
            ModalOptionsSource::Fixed(options) => options.clone(),
            ModalOptionsSource::FromProps(f) => f(props),
        }
    }
}

impl<P> From<ModalOptions> for ModalOptionsSource<P> {
    fn from(options: ModalOptions) -> Self {
        Self::Fixed(options)
    }
}
