//! Shared test fixtures: a mock rendering collaborator and content
//! components that exercise the capability object.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_dialog::{DialogHandle, ModalContent, ModalHandle, ModalRenderer, RenderRequest};
use async_trait::async_trait;
use serde_json::Value;

/// Route test logs through the test writer; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Renderer that captures every render request and counts destroys
#[derive(Default)]
pub struct MockRenderer {
    requests: Mutex<Vec<RenderRequest>>,
    destroys: Arc<AtomicUsize>,
}

impl MockRenderer {
    pub fn destroy_count(&self) -> usize {
        self.destroys.load(Ordering::SeqCst)
    }

    /// Wait until the orchestrator has asked us to display a dialog
    pub async fn displayed(&self) -> RenderRequest {
        for _ in 0..200 {
            if let Some(request) = self.requests.lock().unwrap().last().cloned() {
                return request;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("dialog was never displayed");
    }
}

struct MockDialog {
    destroys: Arc<AtomicUsize>,
}

impl ModalHandle for MockDialog {
    fn destroy(&self) {
        self.destroys.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ModalRenderer for MockRenderer {
    async fn render(&self, request: RenderRequest) -> anyhow::Result<Box<dyn ModalHandle>> {
        self.requests.lock().unwrap().push(request);
        Ok(Box::new(MockDialog {
            destroys: self.destroys.clone(),
        }))
    }
}

/// Content that records the injected capability so the test can drive it
#[derive(Default)]
pub struct ProbeContent {
    handle: Mutex<Option<DialogHandle>>,
}

impl ProbeContent {
    pub fn handle(&self) -> DialogHandle {
        self.handle
            .lock()
            .unwrap()
            .clone()
            .expect("content was never mounted")
    }
}

impl ModalContent for ProbeContent {
    fn mount(&self, dialog: DialogHandle) {
        *self.handle.lock().unwrap() = Some(dialog);
    }
}

/// Content whose ok handler resolves a fixed value
pub struct ValueContent {
    pub value: Value,
}

impl ModalContent for ValueContent {
    fn mount(&self, dialog: DialogHandle) {
        let value = self.value.clone();
        dialog.on_ok(move |_| {
            let value = value.clone();
            async move { Ok(value) }
        });
    }

    fn body(&self) -> Value {
        self.value.clone()
    }
}

/// Content whose ok handler always fails, keeping the dialog open
pub struct RejectingContent;

impl ModalContent for RejectingContent {
    fn mount(&self, dialog: DialogHandle) {
        dialog.on_ok(|_| async { Err(anyhow::anyhow!("validation failed")) });
    }
}
