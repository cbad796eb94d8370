use std::sync::Arc;

use tracing::warn;
use wry::{WebContext, WebView};

use crate::config::WebViewConfig;
use crate::queue::ScriptQueue;

use super::ViewId;

/// Handle to a managed WebView instance. Owns the underlying engine
/// object; the view and its host window are destroyed together when the
/// handle is dropped from the registry.
pub struct ViewHandle {
    /// The underlying wry WebView.
    pub(super) webview: WebView,
    pub(super) view_id: ViewId,
    /// Script queue this view's bridge writes through.
    pub(super) queue: Arc<ScriptQueue>,
    pub(super) config: WebViewConfig,
    /// Current URL (best-effort tracking).
    pub(super) current_url: String,
    /// Current title.
    pub(super) current_title: String,
    /// Keeps the browser-profile context alive for the view's lifetime.
    pub(super) _web_context: Option<WebContext>,
}

impl ViewHandle {
    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    pub fn config(&self) -> &WebViewConfig {
        &self.config
    }

    /// Get the current URL.
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Get the current title.
    pub fn current_title(&self) -> &str {
        &self.current_title
    }

    /// Update the tracked title.
    pub fn set_title(&mut self, title: String) {
        self.current_title = title;
    }

    /// Navigate to a URL.
    pub fn load_url(&mut self, url: &str) -> Result<(), wry::Error> {
        self.current_url = url.to_string();
        self.webview.load_url(url)
    }

    /// Load raw HTML content. The page origin is `about:blank`.
    pub fn load_html(&mut self, html: &str) -> Result<(), wry::Error> {
        self.current_url = "about:blank".to_string();
        self.webview.load_html(html)
    }

    /// Execute JavaScript in the WebView context. UI thread only; code
    /// running elsewhere goes through the script queue instead.
    pub fn evaluate_script(&self, js: &str) -> Result<(), wry::Error> {
        self.webview.evaluate_script(js)
    }

    /// Reload the page; `force` bypasses the cache.
    pub fn refresh(&self, force: bool) -> Result<(), wry::Error> {
        if force {
            self.evaluate_script("location.reload(true);")
        } else {
            self.evaluate_script("location.reload();")
        }
    }

    /// Navigate back in page history.
    pub fn back(&self) -> Result<(), wry::Error> {
        self.evaluate_script("history.back();")
    }

    /// Navigate forward in page history.
    pub fn forward(&self) -> Result<(), wry::Error> {
        self.evaluate_script("history.forward();")
    }

    /// Stop the current page load.
    pub fn stop_loading(&self) -> Result<(), wry::Error> {
        self.evaluate_script("window.stop();")
    }

    /// Set the WebView bounds (position + size) within the parent window.
    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    /// Show or hide the WebView.
    pub fn set_visible(&self, visible: bool) -> Result<(), wry::Error> {
        self.webview.set_visible(visible)
    }

    /// Focus the WebView.
    pub fn focus(&self) -> Result<(), wry::Error> {
        self.webview.focus()
    }

    /// Open devtools (if enabled).
    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }

    /// Drain the script queue and apply every command. UI thread only.
    pub fn apply_scripts(&self) -> Result<(), wry::Error> {
        for js in self.queue.drain() {
            self.webview.evaluate_script(&js)?;
        }
        Ok(())
    }

    /// Re-evaluate recorded init scripts against the (re)loading page,
    /// restoring page-side stubs that navigation destroyed. Call when a
    /// page load starts.
    pub fn replay_init_scripts(&self) {
        for js in self.queue.init_scripts() {
            if let Err(e) = self.webview.evaluate_script(&js) {
                warn!(view_id = %self.view_id, error = %e, "init script replay failed");
            }
        }
    }

    /// Get a reference to the underlying wry WebView.
    pub fn inner(&self) -> &WebView {
        &self.webview
    }
}
