//! WebView lifecycle management.
//!
//! [`ViewManager`] creates `wry::WebView` instances wired to a shared
//! event sink; [`ViewRegistry`] is the arena that owns the resulting
//! handles, keyed by [`ViewId`], together with each view's bridge.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::events::WebViewEvent;

mod handle;
mod lifecycle;
mod registry;

pub use handle::ViewHandle;
pub use registry::ViewRegistry;

/// Identifier for a managed WebView instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Creates WebView instances and owns the event sink their engine
/// callbacks push into.
pub struct ViewManager {
    /// Event sink — engine callbacks push here, the UI loop drains.
    pub(crate) events: Arc<Mutex<Vec<WebViewEvent>>>,
}

impl ViewManager {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Drain all pending events.
    pub fn drain_events(&self) -> Vec<WebViewEvent> {
        let mut events = self.events.lock().unwrap();
        std::mem::take(&mut *events)
    }
}

impl Default for ViewManager {
    fn default() -> Self {
        Self::new()
    }
}
