//! wry-backed embedding glue for the oriel RPC bridge.
//!
//! Wraps the `wry` crate to provide:
//! - Managed child WebView instances with lifecycle and an event sink
//! - Passthrough configuration for the embedding engine and host window
//! - A queue-backed [`ScriptHost`](oriel_bridge::ScriptHost) so the bridge
//!   can inject script from any thread while the UI loop applies it
//!
//! The RPC semantics live in `oriel-bridge`; this crate only adapts them
//! onto `wry` and the host window.

pub mod config;
pub mod events;
pub mod manager;
pub mod queue;

pub use config::{SizeHint, WebViewConfig, WindowOptions};
pub use events::{PageLoadState, WebViewEvent};
pub use manager::{ViewHandle, ViewId, ViewManager, ViewRegistry};
pub use queue::ScriptQueue;
