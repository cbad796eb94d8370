use std::collections::HashMap;
use std::sync::Arc;

use oriel_bridge::Bridge;
use tracing::{debug, warn};
use wry::raw_window_handle;

use crate::config::WebViewConfig;
use crate::events::WebViewEvent;
use crate::queue::ScriptQueue;

use super::handle::ViewHandle;
use super::{ViewId, ViewManager};

struct ViewEntry {
    handle: ViewHandle,
    bridge: Arc<Bridge>,
}

/// Arena owning all live views and their bridges, keyed by [`ViewId`].
///
/// The association between a window's view and its bridge lives here and
/// is passed explicitly to whoever needs it; there is no ambient global
/// window table.
pub struct ViewRegistry {
    manager: ViewManager,
    views: HashMap<ViewId, ViewEntry>,
    next_id: u32,
}

impl ViewRegistry {
    pub fn new(manager: ViewManager) -> Self {
        Self {
            manager,
            views: HashMap::new(),
            next_id: 1,
        }
    }

    /// Create a WebView for `window` and register it together with its
    /// bridge. `queue` must be the same script queue `bridge` writes
    /// through, so drained scripts reach this view.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &mut self,
        window: &W,
        bounds: wry::Rect,
        config: WebViewConfig,
        queue: Arc<ScriptQueue>,
        bridge: Arc<Bridge>,
    ) -> Result<ViewId, wry::Error> {
        let view_id = ViewId(self.next_id);
        self.next_id += 1;

        let handle = self.manager.create(view_id, window, bounds, config, queue)?;
        self.views.insert(view_id, ViewEntry { handle, bridge });
        Ok(view_id)
    }

    /// Get a handle to a view.
    pub fn get(&self, view_id: ViewId) -> Option<&ViewHandle> {
        self.views.get(&view_id).map(|e| &e.handle)
    }

    /// Get a mutable handle to a view.
    pub fn get_mut(&mut self, view_id: ViewId) -> Option<&mut ViewHandle> {
        self.views.get_mut(&view_id).map(|e| &mut e.handle)
    }

    /// The bridge owned by a view.
    pub fn bridge(&self, view_id: ViewId) -> Option<&Arc<Bridge>> {
        self.views.get(&view_id).map(|e| &e.bridge)
    }

    /// Feed a raw inbound RPC message to the owning view's bridge.
    pub fn dispatch_message(&self, view_id: ViewId, body: &str) {
        match self.views.get(&view_id) {
            Some(entry) => entry.bridge.handle_message(body),
            None => warn!(view_id = %view_id, "rpc message for unknown view"),
        }
    }

    /// Destroy a view: close its bridge, drop the engine handle, and emit
    /// a `Closed` event.
    pub fn destroy(&mut self, view_id: ViewId) -> bool {
        if let Some(entry) = self.views.remove(&view_id) {
            entry.bridge.close();
            drop(entry.handle);
            debug!(view_id = %view_id, "webview destroyed");
            if let Ok(mut evts) = self.manager.events.lock() {
                evts.push(WebViewEvent::Closed { view_id });
            }
            true
        } else {
            false
        }
    }

    /// Get all active view IDs.
    pub fn active_views(&self) -> Vec<ViewId> {
        self.views.keys().copied().collect()
    }

    /// Drain all pending events from all views.
    pub fn drain_events(&self) -> Vec<WebViewEvent> {
        self.manager.drain_events()
    }

    /// Destroy all active views. Used during graceful shutdown.
    pub fn destroy_all(&mut self) {
        for view_id in self.active_views() {
            self.destroy(view_id);
        }
    }

    /// How many views are active.
    pub fn count(&self) -> usize {
        self.views.len()
    }
}
