//! Collaborator contracts for the embedding engine and its message loop.

use oriel_common::BridgeError;

/// Script-injection surface of the embedding engine.
///
/// The engine's injection API is only safe from the UI thread, so
/// implementations must enqueue work for the host message loop and return
/// immediately, even when the caller already is that thread.
pub trait ScriptHost: Send + Sync {
    /// Evaluate script text against the current page.
    fn eval(&self, js: &str) -> Result<(), BridgeError>;

    /// Record script to run before every future page load. Navigation
    /// destroys page script state, so per-binding stubs go through here in
    /// addition to a one-time [`eval`](ScriptHost::eval).
    fn init(&self, js: &str) -> Result<(), BridgeError>;
}

/// Drives pending host-loop work from the calling thread.
///
/// Synchronous evaluation blocks its caller, and only the caller's message
/// loop delivers the engine events that produce the result; without an
/// active pump the wait would never complete. `pump` processes whatever
/// work is pending and returns promptly whether or not anything ran.
pub trait MessagePump {
    fn pump(&self);
}
