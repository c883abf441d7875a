//! Per-invocation multicast event dispatcher
//!
//! Each dialog invocation owns exactly one [`Emitter`]; it is never shared
//! across invocations. Handlers are async closures keyed by event name and
//! invoked in registration order. [`Emitter::emit`] aggregates every
//! handler's result in that order and fails fast on the first handler error.
//!
//! Plain string names are split on whitespace so one call can address
//! several events at once; [`EventName::Token`] names are atomic and never
//! split.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{DialogError, DialogResult};

/// Future produced by one handler invocation
pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send>>;

/// A registered handler: async closure over the emitted arguments
pub type Handler = Arc<dyn Fn(Vec<Value>) -> HandlerFuture + Send + Sync>;

/// Unique identifier for one handler registration
///
/// Returned by [`Emitter::on`], [`Emitter::once`] and [`Emitter::only`];
/// passed back to [`Emitter::off`] to remove exactly that registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandlerId(pub Uuid);

impl HandlerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HandlerId {
    fn default() -> Self {
        Self::new()
    }
}

/// An event key: a splittable string name or an opaque atomic token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    /// Plain name; whitespace-separated words address independent events
    Named(String),
    /// Opaque token, never split
    Token(Uuid),
}

impl EventName {
    /// Create a fresh opaque token name
    pub fn token() -> Self {
        Self::Token(Uuid::new_v4())
    }

    /// The independent event names addressed by this value
    fn expand(&self) -> Vec<EventName> {
        match self {
            EventName::Named(name) => name
                .split_whitespace()
                .map(|word| EventName::Named(word.to_string()))
                .collect(),
            EventName::Token(token) => vec![EventName::Token(*token)],
        }
    }
}

impl From<&str> for EventName {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventName::Named(name) => f.write_str(name),
            EventName::Token(token) => write!(f, "token:{token}"),
        }
    }
}

struct HandlerEntry {
    id: HandlerId,
    once: bool,
    handler: Handler,
}

type EventMap = HashMap<EventName, Vec<HandlerEntry>>;

/// Name-keyed multicast dispatcher for one dialog invocation
#[derive(Default)]
pub struct Emitter {
    events: Mutex<EventMap>,
}

fn wrap<F, Fut>(f: F) -> Handler
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(move |args| Box::pin(f(args)))
}

impl Emitter {
    /// Create an empty emitter
    pub fn new() -> Self {
        Self::default()
    }

    // The lock guards only map operations; it is never held across an await.
    fn registry(&self) -> MutexGuard<'_, EventMap> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn register(&self, name: EventName, handler: Handler, once: bool) -> HandlerId {
        let id = HandlerId::new();
        let mut events = self.registry();
        for n in name.expand() {
            events.entry(n).or_default().push(HandlerEntry {
                id,
                once,
                handler: handler.clone(),
            });
        }
        id
    }

    /// Register a handler for one or more whitespace-separated event names.
    /// Insertion order is invocation order; duplicates are permitted.
    pub fn on<F, Fut>(&self, name: impl Into<EventName>, f: F) -> HandlerId
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.register(name.into(), wrap(f), false)
    }

    /// Register only if no handler currently exists for any of the names.
    /// Returns `None` (no-op) otherwise. Prevents duplicate wiring when a
    /// component may be mounted more than once.
    pub fn only<F, Fut>(&self, name: impl Into<EventName>, f: F) -> Option<HandlerId>
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        let name = name.into();
        if self.has_handlers(name.clone()) {
            return None;
        }
        Some(self.register(name, wrap(f), false))
    }

    /// Register a handler that runs at most once. It is deregistered from
    /// every name it was registered under before its body runs, so
    /// re-entrant emits of the same event cannot invoke it again.
    pub fn once<F, Fut>(&self, name: impl Into<EventName>, f: F) -> HandlerId
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.register(name.into(), wrap(f), true)
    }

    /// Invoke all handlers currently registered for the name(s), in
    /// registration order, and aggregate their results in that order.
    /// Fails fast on the first handler error; already-run handlers are not
    /// rolled back. A name with no handlers contributes nothing.
    pub async fn emit(
        &self,
        name: impl Into<EventName>,
        args: Vec<Value>,
    ) -> DialogResult<Vec<Value>> {
        let name = name.into();
        let mut invoked: Vec<Handler> = Vec::new();
        {
            let mut events = self.registry();
            let mut fired_once: Vec<HandlerId> = Vec::new();
            for n in name.expand() {
                if let Some(entries) = events.get(&n) {
                    for entry in entries {
                        invoked.push(entry.handler.clone());
                        if entry.once {
                            fired_once.push(entry.id);
                        }
                    }
                }
            }
            // once-entries come out of the registry before anything runs
            if !fired_once.is_empty() {
                for entries in events.values_mut() {
                    entries.retain(|entry| !fired_once.contains(&entry.id));
                }
            }
        }

        debug!(event = %name, handlers = invoked.len(), "emit");

        let tasks: Vec<HandlerFuture> = invoked.iter().map(|handler| handler(args.clone())).collect();
        futures::future::try_join_all(tasks)
            .await
            .map_err(|source| DialogError::Handler {
                event: name.to_string(),
                source,
            })
    }

    /// Remove exactly the given registration from the name(s)
    pub fn off(&self, name: impl Into<EventName>, id: HandlerId) {
        let mut events = self.registry();
        for n in name.into().expand() {
            if let Some(entries) = events.get_mut(&n) {
                entries.retain(|entry| entry.id != id);
            }
        }
    }

    /// Remove all handlers for the name(s)
    pub fn off_all(&self, name: impl Into<EventName>) {
        let mut events = self.registry();
        for n in name.into().expand() {
            events.remove(&n);
        }
    }

    /// Drop every registration for every name
    pub fn clear(&self) {
        self.registry().clear();
    }

    /// Whether any handler is registered for any of the name(s)
    pub fn has_handlers(&self, name: impl Into<EventName>) -> bool {
        let events = self.registry();
        name.into()
            .expand()
            .iter()
            .any(|n| events.get(n).is_some_and(|entries| !entries.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_named_expansion() {
        let name = EventName::from("  ok   cancel ");
        assert_eq!(
            name.expand(),
            vec![EventName::from("ok"), EventName::from("cancel")]
        );
    }

    #[test]
    fn test_token_is_atomic() {
        let token = EventName::token();
        assert_eq!(token.expand(), vec![token.clone()]);
    }

    #[tokio::test]
    async fn test_emit_without_handlers_is_empty() {
        let bus = Emitter::new();
        let results = bus.emit("nobody", vec![]).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_handlers_run_in_registration_order() {
        let bus = Emitter::new();
        bus.on("step", |_| async { Ok(json!("first")) });
        bus.on("step", |_| async { Ok(json!("second")) });

        let results = bus.emit("step", vec![]).await.unwrap();
        assert_eq!(results, vec![json!("first"), json!("second")]);
    }

    #[tokio::test]
    async fn test_once_runs_exactly_once() {
        let bus = Emitter::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        bus.once("fire", move |_| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            }
        });

        assert_eq!(bus.emit("fire", vec![]).await.unwrap().len(), 1);
        assert_eq!(bus.emit("fire", vec![]).await.unwrap().len(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_once_reentrant_emit_cannot_reinvoke() {
        let bus = Arc::new(Emitter::new());
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let inner = bus.clone();
        bus.once("ping", move |_| {
            let seen = seen.clone();
            let inner = inner.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                // already deregistered, so this fans out to nobody
                let results = inner.emit("ping", vec![]).await?;
                assert!(results.is_empty());
                Ok(Value::Null)
            }
        });

        bus.emit("ping", vec![]).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_multi_name_once_fires_once_across_names() {
        let bus = Emitter::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        bus.once("a b", move |_| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            }
        });

        bus.emit("a", vec![]).await.unwrap();
        bus.emit("b", vec![]).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_only_first_registration_wins() {
        let bus = Emitter::new();
        let first = bus.only("wire", |_| async { Ok(json!("h1")) });
        let second = bus.only("wire", |_| async { Ok(json!("h2")) });

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(bus.emit("wire", vec![]).await.unwrap(), vec![json!("h1")]);
    }

    #[tokio::test]
    async fn test_off_removes_exactly_one_handler() {
        let bus = Emitter::new();
        let doomed = bus.on("evt", |_| async { Ok(json!("doomed")) });
        bus.on("evt", |_| async { Ok(json!("kept")) });

        bus.off("evt", doomed);
        assert_eq!(bus.emit("evt", vec![]).await.unwrap(), vec![json!("kept")]);
    }

    #[tokio::test]
    async fn test_off_all_and_clear() {
        let bus = Emitter::new();
        bus.on("a b", |_| async { Ok(Value::Null) });
        bus.on("c", |_| async { Ok(Value::Null) });

        bus.off_all("a");
        assert!(!bus.has_handlers("a"));
        assert!(bus.has_handlers("b"));

        bus.clear();
        assert!(!bus.has_handlers("b"));
        assert!(!bus.has_handlers("c"));
    }

    #[tokio::test]
    async fn test_multi_name_registration_reaches_both_events() {
        let bus = Emitter::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        bus.on("a b", move |_| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            }
        });

        bus.emit("a", vec![]).await.unwrap();
        bus.emit("b", vec![]).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failing_handler_fails_the_emit() {
        let bus = Emitter::new();
        bus.on("save", |_| async { Ok(json!("ran")) });
        bus.on("save", |_| async { Err(anyhow::anyhow!("validation failed")) });

        let err = bus.emit("save", vec![]).await.unwrap_err();
        match err {
            DialogError::Handler { event, .. } => assert_eq!(event, "save"),
            other => panic!("expected handler error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_args_reach_every_handler() {
        let bus = Emitter::new();
        bus.on("echo", |args| async move { Ok(args[0].clone()) });
        bus.on("echo", |args| async move { Ok(args[1].clone()) });

        let results = bus.emit("echo", vec![json!(1), json!(2)]).await.unwrap();
        assert_eq!(results, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_token_names_do_not_collide_with_strings() {
        let bus = Emitter::new();
        let token = EventName::token();
        bus.on(token.clone(), |_| async { Ok(json!("token")) });

        assert!(bus.emit("token", vec![]).await.unwrap().is_empty());
        assert_eq!(bus.emit(token, vec![]).await.unwrap(), vec![json!("token")]);
    }
}
