//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop: creates the host window and its webview, wires the script
//! queue waker to an event-loop proxy, and drains engine events into the
//! bridge.

use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::window::{Window, WindowAttributes, WindowId};

use oriel_bridge::{Bridge, MessagePump};
use oriel_webview::{
    PageLoadState, ScriptQueue, SizeHint, ViewId, ViewManager, ViewRegistry, WebViewConfig,
    WebViewEvent, WindowOptions,
};

/// User event nudging the loop when the script queue fills.
#[derive(Debug)]
pub struct WakeUp;

/// Bundled demo page exercising the bridge from page script.
pub const DEMO_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>oriel demo</title>
  <style>
    body { font-family: sans-serif; margin: 2rem; }
    button { margin-right: 0.5rem; }
    #out { margin-top: 1rem; color: #333; }
  </style>
</head>
<body>
  <h1>oriel</h1>
  <p>Host bindings callable from page script:</p>
  <button onclick="runAdd()">add(2, 3)</button>
  <button onclick="hlog('hello from the page')">hlog(...)</button>
  <button onclick="runVersion()">host_version()</button>
  <div id="out"></div>
  <script>
    function show(text) {
      document.getElementById('out').textContent = text;
    }
    function runAdd() {
      add(2, 3).then(show, function(err) { show('rejected: ' + err); });
    }
    function runVersion() {
      host_version().then(function(v) { show('host ' + v); });
    }
  </script>
</body>
</html>
"#;

/// Top-level application state.
pub struct OrielApp {
    window_opts: WindowOptions,
    webview_cfg: WebViewConfig,
    proxy: EventLoopProxy<WakeUp>,

    window: Option<Arc<Window>>,
    registry: ViewRegistry,
    queue: Arc<ScriptQueue>,
    bridge: Option<Arc<Bridge>>,
    view_id: Option<ViewId>,

    /// Whether the one-shot page-ready demo has run.
    greeted: bool,
}

impl OrielApp {
    pub fn new(
        window_opts: WindowOptions,
        webview_cfg: WebViewConfig,
        proxy: EventLoopProxy<WakeUp>,
    ) -> Self {
        Self {
            window_opts,
            webview_cfg,
            proxy,
            window: None,
            registry: ViewRegistry::new(ViewManager::new()),
            queue: Arc::new(ScriptQueue::new()),
            bridge: None,
            view_id: None,
            greeted: false,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let opts = &self.window_opts;
        let size = LogicalSize::new(opts.width as f64, opts.height as f64);
        let mut attrs = WindowAttributes::default()
            .with_title(opts.title.clone())
            .with_inner_size(size)
            .with_resizable(opts.resizable());
        match opts.hint {
            SizeHint::Min => attrs = attrs.with_min_inner_size(size),
            SizeHint::Max => attrs = attrs.with_max_inner_size(size),
            SizeHint::None | SizeHint::Fixed => {}
        }

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Window creation failed: {e}");
                return false;
            }
        };

        // Nudge the loop whenever the bridge queues script from any thread.
        let proxy = self.proxy.clone();
        self.queue.set_waker(move || {
            let _ = proxy.send_event(WakeUp);
        });

        let bridge = Arc::new(Bridge::new(self.queue.clone()));
        self.register_demo_bindings(&bridge);

        let bounds = wry::Rect {
            position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
            size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(
                opts.width as f64,
                opts.height as f64,
            )),
        };
        match self.registry.create(
            window.as_ref(),
            bounds,
            self.webview_cfg.clone(),
            self.queue.clone(),
            bridge.clone(),
        ) {
            Ok(view_id) => self.view_id = Some(view_id),
            Err(e) => {
                tracing::error!("WebView creation failed: {e}");
                return false;
            }
        }

        self.window = Some(window);
        self.bridge = Some(bridge);
        true
    }

    fn register_demo_bindings(&self, bridge: &Bridge) {
        if let Err(e) = bridge.bind("add", |a: i64, b: i64| a + b) {
            tracing::warn!("bind add failed: {e}");
        }
        if let Err(e) = bridge.bind("host_version", || env!("CARGO_PKG_VERSION").to_string()) {
            tracing::warn!("bind host_version failed: {e}");
        }
        if let Err(e) = bridge.bind_log(None) {
            tracing::warn!("bind log failed: {e}");
        }
    }

    /// Apply queued script work and route engine events.
    fn drain(&mut self) {
        if let Some(view_id) = self.view_id {
            if let Some(handle) = self.registry.get(view_id) {
                if let Err(e) = handle.apply_scripts() {
                    tracing::warn!("script application failed: {e}");
                }
            }
        }

        for event in self.registry.drain_events() {
            match event {
                WebViewEvent::IpcMessage { view_id, body } => {
                    self.registry.dispatch_message(view_id, &body);
                }
                WebViewEvent::PageLoad {
                    view_id,
                    state: PageLoadState::Started,
                    ..
                } => {
                    if let Some(handle) = self.registry.get(view_id) {
                        handle.replay_init_scripts();
                    }
                }
                WebViewEvent::PageLoad {
                    state: PageLoadState::Finished,
                    url,
                    ..
                } => {
                    tracing::debug!(url = %url, "page loaded");
                    if !self.greeted {
                        self.greeted = true;
                        self.page_ready_demo();
                    }
                }
                WebViewEvent::TitleChanged { view_id, title } => {
                    if let Some(handle) = self.registry.get_mut(view_id) {
                        handle.set_title(title.clone());
                    }
                    if let Some(window) = &self.window {
                        window.set_title(&title);
                    }
                }
                WebViewEvent::Closed { .. } => {}
            }
        }
    }

    /// One-shot demonstration of the evaluation channel once the first
    /// page is up.
    fn page_ready_demo(&self) {
        let (Some(bridge), Some(view_id)) = (self.bridge.clone(), self.view_id) else {
            return;
        };

        if let Err(e) = bridge.eval("hlog('bridge ready');") {
            tracing::warn!("eval failed: {e}");
        }

        let result = bridge.eval_with_result_async(
            "1 + 2",
            |result| match result {
                Ok(v) => tracing::info!("async eval: 1 + 2 = {v}"),
                Err(e) => tracing::warn!("async eval failed: {e}"),
            },
            Some(Duration::from_secs(5)),
        );
        if let Err(e) = result {
            tracing::warn!("async eval setup failed: {e}");
        }

        let pump = ViewPump {
            registry: &self.registry,
            view_id,
        };
        match bridge.eval_with_result("document.title", Some(Duration::from_secs(2)), &pump) {
            Ok(title) => tracing::info!("sync eval: document.title = {title}"),
            Err(e) => tracing::warn!("sync eval failed: {e}"),
        }
    }

    fn sync_view_bounds(&self, width: u32, height: u32) {
        let Some(view_id) = self.view_id else { return };
        let Some(handle) = self.registry.get(view_id) else {
            return;
        };
        if !handle.config().fill_parent {
            return;
        }
        let bounds = wry::Rect {
            position: wry::dpi::Position::Physical(wry::dpi::PhysicalPosition::new(0, 0)),
            size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(width, height)),
        };
        if let Err(e) = handle.set_bounds(bounds) {
            tracing::warn!("webview resize failed: {e}");
        }
    }
}

/// Drives queued script work and RPC dispatch for one view while a
/// synchronous evaluation blocks the UI thread.
struct ViewPump<'a> {
    registry: &'a ViewRegistry,
    view_id: ViewId,
}

impl MessagePump for ViewPump<'_> {
    fn pump(&self) {
        if let Some(handle) = self.registry.get(self.view_id) {
            if let Err(e) = handle.apply_scripts() {
                tracing::warn!("script application failed: {e}");
            }
        }
        for event in self.registry.drain_events() {
            match event {
                WebViewEvent::IpcMessage { view_id, body } => {
                    self.registry.dispatch_message(view_id, &body);
                }
                WebViewEvent::PageLoad {
                    view_id,
                    state: PageLoadState::Started,
                    ..
                } => {
                    if let Some(handle) = self.registry.get(view_id) {
                        handle.replay_init_scripts();
                    }
                }
                // Title and load-finished notifications are cosmetic; a
                // blocked UI thread cannot act on them anyway.
                _ => {}
            }
        }
    }
}

impl ApplicationHandler<WakeUp> for OrielApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if !self.initialize(event_loop) {
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, _event: WakeUp) {
        self.drain();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.registry.destroy_all();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.sync_view_bounds(size.width, size.height);
                }
            }
            WindowEvent::Focused(true) => {
                let Some(view_id) = self.view_id else { return };
                if let Some(handle) = self.registry.get(view_id) {
                    if handle.config().autofocus {
                        if let Err(e) = handle.focus() {
                            tracing::warn!("webview focus failed: {e}");
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.drain();
    }
}
