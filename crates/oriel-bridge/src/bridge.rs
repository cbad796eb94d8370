//! Bridge facade: binding surfaces, inbound message handling, teardown.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use oriel_common::BridgeError;
use tracing::{debug, warn};

use crate::dispatch;
use crate::host::ScriptHost;
use crate::ipc::{self, CallRequest};
use crate::registry::{
    Binding, BindingMap, IntoBinding, IntoFallibleBinding, IntoVariadicBinding,
};

/// Default name for the page-side logging convenience binding.
pub const LOG_BINDING: &str = "hlog";

/// One RPC bridge per webview: owns the binding registry and the
/// evaluation-callback counter, and turns inbound call messages into
/// page-side completions through the [`ScriptHost`].
pub struct Bridge {
    pub(crate) host: Arc<dyn ScriptHost>,
    pub(crate) bindings: BindingMap,
    pub(crate) eval_seq: AtomicU64,
    pub(crate) closed: Arc<AtomicBool>,
}

impl Bridge {
    pub fn new(host: Arc<dyn ScriptHost>) -> Self {
        Self {
            host,
            bindings: BindingMap::new(),
            eval_seq: AtomicU64::new(0),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Expose an infallible host function to page script as `window[name]`.
    ///
    /// The page-side stub is evaluated against the current page and
    /// recorded as a pre-load hook, so navigation cannot strip it.
    /// Rebinding an existing name replaces it silently.
    pub fn bind<Args, F>(&self, name: &str, f: F) -> Result<(), BridgeError>
    where
        F: IntoBinding<Args>,
    {
        self.install(name, f.into_binding())
    }

    /// Expose a fallible host function; `Err` rejects the page-side
    /// promise with the error's display text.
    pub fn bind_fallible<Args, F>(&self, name: &str, f: F) -> Result<(), BridgeError>
    where
        F: IntoFallibleBinding<Args>,
    {
        self.install(name, f.into_binding())
    }

    /// Expose a host function whose final `Vec<T>` parameter absorbs any
    /// number of trailing page-side arguments.
    pub fn bind_variadic<Args, F>(&self, name: &str, f: F) -> Result<(), BridgeError>
    where
        F: IntoVariadicBinding<Args>,
    {
        self.install(name, f.into_binding())
    }

    pub(crate) fn install(&self, name: &str, binding: Arc<dyn Binding>) -> Result<(), BridgeError> {
        if self.is_closed() {
            return Err(BridgeError::Closed);
        }
        self.bindings.insert(name, binding);
        let stub = ipc::binding_stub(name);
        self.host.eval(&stub)?;
        self.host.init(&stub)?;
        debug!(name, "binding registered");
        Ok(())
    }

    /// Remove a binding. Removing an unknown name is a no-op.
    pub fn unbind(&self, name: &str) {
        if self.bindings.remove(name) {
            debug!(name, "binding removed");
        }
    }

    /// Bind a variadic logging function under `name` (default
    /// [`LOG_BINDING`]). Page-side arguments are joined and logged
    /// host-side. Names containing whitespace are rejected.
    pub fn bind_log(&self, name: Option<&str>) -> Result<(), BridgeError> {
        let name = name.unwrap_or(LOG_BINDING);
        if name.contains(char::is_whitespace) {
            return Err(BridgeError::InvalidName(name.to_string()));
        }
        self.bind_variadic(name, |args: Vec<serde_json::Value>| {
            let line = args
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            tracing::info!(target: "oriel::page", "{line}");
        })
    }

    /// Handle a raw inbound message from the engine's message channel.
    ///
    /// Runs on whatever thread the engine delivers on; the completion
    /// script goes back through the host, which marshals it onto the UI
    /// thread. Malformed payloads are dropped without a reply because the
    /// call id cannot be trusted.
    pub fn handle_message(&self, raw: &str) {
        if self.is_closed() {
            warn!("message dropped: bridge closed");
            return;
        }
        let request = match CallRequest::parse(raw) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "invalid rpc message");
                return;
            }
        };

        let id = request.id;
        let script = match dispatch::dispatch(&self.bindings, &request) {
            Ok(value) => match serde_json::to_string(&value) {
                Ok(json) => ipc::resolve_script(id, &json),
                Err(e) => ipc::reject_script(id, &e.to_string()),
            },
            Err(e) => {
                debug!(id, error = %e, "call rejected");
                ipc::reject_script(id, &e.to_string())
            }
        };
        if let Err(e) = self.host.eval(&script) {
            warn!(id, error = %e, "completion delivery failed");
        }
    }

    /// Fire-and-forget evaluation against the current page.
    pub fn eval(&self, js: &str) -> Result<(), BridgeError> {
        if self.is_closed() {
            return Err(BridgeError::Closed);
        }
        self.host.eval(js)
    }

    /// Tear down: refuse further messages and evaluations. In-flight
    /// waits observe the flag on their next poll and fail fast.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("bridge closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of currently registered bindings (ephemeral callbacks
    /// included).
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Whether `name` is currently bound.
    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingHost;

    fn bridge_with_host() -> (Bridge, Arc<RecordingHost>) {
        let host = RecordingHost::new();
        (Bridge::new(host.clone()), host)
    }

    // -- Registration --

    #[test]
    fn bind_installs_stub_and_preload_hook() {
        let (bridge, host) = bridge_with_host();
        bridge.bind("add", |a: i64, b: i64| a + b).unwrap();

        assert!(bridge.is_bound("add"));
        let evals = host.eval_scripts();
        assert_eq!(evals.len(), 1);
        assert!(evals[0].contains(r#"var name = "add""#));
        assert_eq!(host.init_scripts(), evals);
    }

    #[test]
    fn unbind_unknown_is_noop() {
        let (bridge, _host) = bridge_with_host();
        bridge.unbind("never-bound");
        bridge.bind("f", || {}).unwrap();
        bridge.unbind("f");
        bridge.unbind("f");
        assert!(!bridge.is_bound("f"));
    }

    #[test]
    fn bind_log_rejects_whitespace_names() {
        let (bridge, _host) = bridge_with_host();
        let err = bridge.bind_log(Some("my log")).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidName(_)));
        assert!(!bridge.is_bound("my log"));
    }

    #[test]
    fn bind_log_defaults_name() {
        let (bridge, _host) = bridge_with_host();
        bridge.bind_log(None).unwrap();
        assert!(bridge.is_bound(LOG_BINDING));
    }

    // -- Inbound dispatch --

    #[test]
    fn round_trip_resolves_with_sum() {
        let (bridge, host) = bridge_with_host();
        bridge.bind("add", |a: i64, b: i64| a + b).unwrap();
        host.clear();

        bridge.handle_message(r#"{"id":1,"method":"add","params":[2,3]}"#);

        let evals = host.eval_scripts();
        assert_eq!(evals.len(), 1);
        assert_eq!(
            evals[0],
            "window._rpc[1].resolve(5); window._rpc[1] = undefined"
        );
    }

    #[test]
    fn exactly_one_completion_per_call() {
        let (bridge, host) = bridge_with_host();
        bridge.bind("id", |v: serde_json::Value| v).unwrap();
        host.clear();

        bridge.handle_message(r#"{"id":4,"method":"id","params":[true]}"#);
        bridge.handle_message(r#"{"id":5,"method":"id","params":[null]}"#);

        let evals = host.eval_scripts();
        assert_eq!(evals.len(), 2);
        assert!(evals[0].starts_with("window._rpc[4].resolve(true)"));
        assert!(evals[1].starts_with("window._rpc[5].resolve(null)"));
    }

    #[test]
    fn arity_mismatch_rejects() {
        let (bridge, host) = bridge_with_host();
        bridge.bind("add", |a: i64, b: i64| a + b).unwrap();
        host.clear();

        bridge.handle_message(r#"{"id":1,"method":"add","params":[2]}"#);

        let evals = host.eval_scripts();
        assert_eq!(evals.len(), 1);
        assert!(evals[0].contains("window._rpc[1].reject("));
        assert!(evals[0].contains("arguments mismatch"));
    }

    #[test]
    fn unknown_method_rejects() {
        let (bridge, host) = bridge_with_host();
        bridge.handle_message(r#"{"id":9,"method":"ghost","params":[]}"#);

        let evals = host.eval_scripts();
        assert_eq!(evals.len(), 1);
        assert!(evals[0].contains("window._rpc[9].reject("));
        assert!(evals[0].contains("no such method: ghost"));
    }

    #[test]
    fn handler_error_rejects_with_bare_message() {
        let (bridge, host) = bridge_with_host();
        bridge
            .bind_fallible("fail", || -> Result<(), String> { Err("boom".into()) })
            .unwrap();
        host.clear();

        bridge.handle_message(r#"{"id":2,"method":"fail","params":[]}"#);

        let evals = host.eval_scripts();
        assert_eq!(
            evals[0],
            r#"window._rpc[2].reject("boom"); window._rpc[2] = undefined"#
        );
    }

    #[test]
    fn malformed_message_produces_no_script() {
        let (bridge, host) = bridge_with_host();
        bridge.bind("add", |a: i64, b: i64| a + b).unwrap();
        host.clear();

        bridge.handle_message("not json at all");

        assert!(host.eval_scripts().is_empty());
    }

    // -- Teardown --

    #[test]
    fn closed_bridge_drops_messages_and_refuses_ops() {
        let (bridge, host) = bridge_with_host();
        bridge.bind("add", |a: i64, b: i64| a + b).unwrap();
        host.clear();
        bridge.close();

        bridge.handle_message(r#"{"id":1,"method":"add","params":[2,3]}"#);
        assert!(host.eval_scripts().is_empty());

        assert!(matches!(
            bridge.eval("1 + 1"),
            Err(BridgeError::Closed)
        ));
        assert!(matches!(
            bridge.bind("late", || {}),
            Err(BridgeError::Closed)
        ));
    }

    #[test]
    fn close_is_idempotent() {
        let (bridge, _host) = bridge_with_host();
        bridge.close();
        bridge.close();
        assert!(bridge.is_closed());
    }
}
