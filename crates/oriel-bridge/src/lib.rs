//! Host <-> page RPC bridge.
//!
//! Exposes host functions to page script as global functions, and lets the
//! host evaluate script in the page with optional synchronous or
//! asynchronous result retrieval:
//! - Typed binding registry with runtime argument decoding
//! - JSON wire codec for call requests and completion scripts
//! - Evaluation channel with ephemeral callbacks and timeouts
//!
//! The embedding engine and its message loop stay behind the [`ScriptHost`]
//! and [`MessagePump`] traits; `oriel-webview` provides the wry-backed
//! realization.

pub mod bridge;
pub mod dispatch;
pub mod host;
pub mod ipc;
pub mod registry;

mod eval;

pub use bridge::Bridge;
pub use eval::DEFAULT_EVAL_TIMEOUT;
pub use host::{MessagePump, ScriptHost};
pub use ipc::CallRequest;
pub use registry::{Arity, Binding, BindingMap};

#[cfg(test)]
pub(crate) mod testutil;
