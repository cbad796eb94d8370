//! UI-thread marshaling for script injection.
//!
//! The engine's injection API is only safe from the UI thread, while
//! bridge completions and async eval setup can originate anywhere. Script
//! therefore never goes straight to the WebView: producers enqueue here
//! and the UI loop drains through
//! [`ViewHandle::apply_scripts`](crate::manager::ViewHandle::apply_scripts).
//! Enqueueing always queues, even on the UI thread itself.
//!
//! Init scripts are recorded separately and replayed whenever a new page
//! starts loading, which restores the page-side stubs navigation
//! destroyed.

use std::sync::Mutex;

use oriel_common::BridgeError;
use oriel_bridge::ScriptHost;

/// Thread-safe script command queue; the bridge's [`ScriptHost`].
#[derive(Default)]
pub struct ScriptQueue {
    pending: Mutex<Vec<String>>,
    init_scripts: Mutex<Vec<String>>,
    waker: Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
}

impl ScriptQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a hook invoked after every enqueue, typically an event-loop
    /// proxy nudge so the UI thread drains promptly.
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        *self.waker.lock().unwrap() = Some(Box::new(waker));
    }

    /// Take all queued eval scripts, in enqueue order.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock().unwrap())
    }

    /// Scripts to replay when a page starts loading.
    pub fn init_scripts(&self) -> Vec<String> {
        self.init_scripts.lock().unwrap().clone()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.lock().unwrap().is_empty()
    }

    fn wake(&self) {
        if let Some(waker) = self.waker.lock().unwrap().as_ref() {
            waker();
        }
    }
}

impl ScriptHost for ScriptQueue {
    fn eval(&self, js: &str) -> Result<(), BridgeError> {
        self.pending.lock().unwrap().push(js.to_string());
        self.wake();
        Ok(())
    }

    fn init(&self, js: &str) -> Result<(), BridgeError> {
        // Pre-load hooks apply to future page loads only; nothing runs now.
        self.init_scripts.lock().unwrap().push(js.to_string());
        Ok(())
    }
}
