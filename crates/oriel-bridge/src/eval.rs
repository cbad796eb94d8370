//! Evaluation channel: script execution with optional result retrieval.
//!
//! Each evaluation-with-result registers a uniquely named ephemeral
//! binding, wraps the user script so its value (immediate, promise, or
//! throw) reaches that callback, and waits on a single-slot channel. The
//! synchronous form pumps the host message loop while it waits; the
//! asynchronous form parks a background thread and invokes the caller's
//! callback off the UI thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use oriel_common::BridgeError;
use serde_json::Value;
use tracing::{debug, warn};

use crate::bridge::Bridge;
use crate::host::MessagePump;
use crate::ipc;

/// Prefix for synthesized ephemeral callback names; a per-bridge counter
/// is appended, so names are never reused while outstanding.
pub(crate) const EVAL_CALLBACK_PREFIX: &str = "__oriel_eval_cb_";

/// Deadline applied when the caller does not supply one.
pub const DEFAULT_EVAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle interval between result polls.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

impl Bridge {
    /// Evaluate `js` and retrieve its value, blocking the calling thread.
    ///
    /// Must be called from the UI thread: the wait actively drives `pump`,
    /// and only that thread's message loop delivers the engine events that
    /// produce the result — from any other thread the call can never
    /// complete. `timeout` defaults to [`DEFAULT_EVAL_TIMEOUT`].
    pub fn eval_with_result(
        &self,
        js: &str,
        timeout: Option<Duration>,
        pump: &dyn MessagePump,
    ) -> Result<Value, BridgeError> {
        let (name, rx) = self.install_eval_callback()?;
        self.host.eval(&ipc::eval_wrapper(js, &name))?;

        let deadline = Instant::now() + timeout.unwrap_or(DEFAULT_EVAL_TIMEOUT);
        loop {
            match rx.try_recv() {
                Ok(value) => return interpret(value),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => return Err(BridgeError::Closed),
            }
            if self.is_closed() {
                return Err(BridgeError::Closed);
            }
            if Instant::now() >= deadline {
                warn!(callback = %name, "evaluation timed out");
                return Err(BridgeError::EvalTimeout);
            }
            pump.pump();
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Evaluate `js` and deliver the result to `callback` off the UI
    /// thread. Returns immediately.
    ///
    /// Each overlapping call owns its own ephemeral callback and result
    /// slot, so results are never cross-delivered; completion order across
    /// calls is not guaranteed.
    pub fn eval_with_result_async<F>(
        &self,
        js: &str,
        callback: F,
        timeout: Option<Duration>,
    ) -> Result<(), BridgeError>
    where
        F: FnOnce(Result<Value, BridgeError>) + Send + 'static,
    {
        let (name, rx) = self.install_eval_callback()?;
        self.host.eval(&ipc::eval_wrapper(js, &name))?;

        let deadline = Instant::now() + timeout.unwrap_or(DEFAULT_EVAL_TIMEOUT);
        let closed = Arc::clone(&self.closed);
        thread::Builder::new()
            .name("oriel-eval-wait".to_string())
            .spawn(move || callback(wait_for_result(&rx, &closed, deadline)))
            .expect("failed to spawn eval waiter thread");
        Ok(())
    }

    /// Register the ephemeral callback for one evaluation. The binding
    /// delivers its single argument into the result slot, removes itself,
    /// and clears its page-side global; on timeout it stays registered and
    /// a late result is dropped through the disconnected slot.
    fn install_eval_callback(&self) -> Result<(String, Receiver<Value>), BridgeError> {
        let seq = self.eval_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let name = format!("{EVAL_CALLBACK_PREFIX}{seq}");
        let (tx, rx) = mpsc::sync_channel::<Value>(1);

        let bindings = self.bindings.clone();
        let host = Arc::clone(&self.host);
        let cb_name = name.clone();
        self.bind(&name, move |value: Value| {
            // Single-slot handoff: a second invocation racing the
            // unregistration below is dropped by try_send.
            let _ = tx.try_send(value);
            bindings.remove(&cb_name);
            if let Err(e) = host.eval(&ipc::delete_global(&cb_name)) {
                warn!(callback = %cb_name, error = %e, "failed to clear page-side callback");
            }
        })?;
        debug!(callback = %name, "ephemeral eval callback registered");
        Ok((name, rx))
    }
}

fn wait_for_result(
    rx: &Receiver<Value>,
    closed: &AtomicBool,
    deadline: Instant,
) -> Result<Value, BridgeError> {
    loop {
        match rx.try_recv() {
            Ok(value) => return interpret(value),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => return Err(BridgeError::Closed),
        }
        if closed.load(Ordering::SeqCst) {
            return Err(BridgeError::Closed);
        }
        if Instant::now() >= deadline {
            return Err(BridgeError::EvalTimeout);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Distinguish structured script failures (`{error: ...}`) from ordinary
/// result values.
fn interpret(value: Value) -> Result<Value, BridgeError> {
    if let Value::Object(map) = &value {
        if let Some(err) = map.get("error") {
            if !err.is_null() {
                let message = match err {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                return Err(BridgeError::ScriptError(message));
            }
        }
    }
    Ok(value)
}
