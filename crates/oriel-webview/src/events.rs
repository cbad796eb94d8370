//! WebView event types, pushed by engine callbacks and drained on the UI
//! thread.

use serde::{Deserialize, Serialize};

use crate::manager::ViewId;

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started. Recorded init scripts are replayed here so
    /// page-side stubs survive navigation.
    Started,
    /// Page has fully loaded (DOMContentLoaded + resources).
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events emitted by a WebView instance.
#[derive(Debug, Clone)]
pub enum WebViewEvent {
    /// Page load state changed. Carries the URL.
    PageLoad {
        view_id: ViewId,
        state: PageLoadState,
        url: String,
    },
    /// Document title changed.
    TitleChanged { view_id: ViewId, title: String },
    /// Raw RPC text from page script, to be fed to the view's bridge.
    IpcMessage { view_id: ViewId, body: String },
    /// WebView was destroyed.
    Closed { view_id: ViewId },
}
