use std::sync::Arc;

use tracing::debug;
use wry::raw_window_handle;
use wry::{WebContext, WebViewBuilder};

use crate::config::WebViewConfig;
use crate::events::{PageLoadState, WebViewEvent};
use crate::queue::ScriptQueue;

use super::handle::ViewHandle;
use super::{ViewId, ViewManager};

impl ViewManager {
    /// Create a new WebView as a child of the given window.
    ///
    /// The `window` must implement `raw_window_handle::HasWindowHandle`.
    /// Engine callbacks push into the manager's event sink; `queue` is the
    /// script queue the view's bridge writes through.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        view_id: ViewId,
        window: &W,
        bounds: wry::Rect,
        config: WebViewConfig,
        queue: Arc<ScriptQueue>,
    ) -> Result<ViewHandle, wry::Error> {
        let vid = view_id;

        let mut web_context = config
            .resolved_data_dir()
            .map(|dir| WebContext::new(Some(dir)));
        let mut builder = match web_context.as_mut() {
            Some(ctx) => WebViewBuilder::new_with_web_context(ctx),
            None => WebViewBuilder::new(),
        };

        builder = builder
            .with_bounds(bounds)
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_clipboard(config.clipboard)
            .with_autoplay(config.autoplay)
            .with_focused(config.autofocus);

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        // IPC channel: page script -> event sink -> bridge
        let events = Arc::clone(&self.events);
        builder = builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();
            debug!(view_id = %vid, body_len = body.len(), "ipc message from page");
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::IpcMessage { view_id: vid, body });
            }
        });

        let events = Arc::clone(&self.events);
        builder = builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(view_id = %vid, ?state, url = %url, "page load");
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::PageLoad {
                    view_id: vid,
                    state,
                    url,
                });
            }
        });

        let events = Arc::clone(&self.events);
        builder = builder.with_document_title_changed_handler(move |title| {
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::TitleChanged {
                    view_id: vid,
                    title,
                });
            }
        });

        // Initial content
        let initial_url;
        if let Some(url) = &config.url {
            builder = builder.with_url(url);
            initial_url = url.clone();
        } else if let Some(html) = &config.html {
            builder = builder.with_html(html);
            initial_url = "about:blank".to_string();
        } else {
            builder = builder.with_html("<html><body></body></html>");
            initial_url = "about:blank".to_string();
        }

        let webview = builder.build_as_child(window)?;

        debug!(view_id = %vid, url = %initial_url, "webview created");

        Ok(ViewHandle {
            webview,
            view_id,
            queue,
            config,
            current_url: initial_url,
            current_title: String::new(),
            _web_context: web_context,
        })
    }
}
