//! Fixed lifecycle event vocabulary
//!
//! The closed set of events that flow over an invocation's bus. `ok` and
//! `cancel` travel from the dialog's native controls to registered handlers;
//! `submit` and `close` travel from content code or the orchestrator to the
//! settlement listeners.

use serde::{Deserialize, Serialize};

use crate::emitter::EventName;

/// Lifecycle events of one dialog invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogEvent {
    /// Primary action pressed; handlers may produce or validate a value,
    /// or block closing by failing
    Ok,
    /// Secondary action pressed; handlers may run cleanup
    Cancel,
    /// Final resolution value declared; settles the invocation as resolved
    Submit,
    /// Abandonment declared; settles the invocation as cancelled
    Close,
}

impl DialogEvent {
    /// Stable name of the event on the bus
    pub fn name(&self) -> &'static str {
        match self {
            DialogEvent::Ok => "ok",
            DialogEvent::Cancel => "cancel",
            DialogEvent::Submit => "submit",
            DialogEvent::Close => "close",
        }
    }
}

impl From<DialogEvent> for EventName {
    fn from(event: DialogEvent) -> Self {
        EventName::Named(event.name().to_string())
    }
}
