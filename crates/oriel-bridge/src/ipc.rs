//! Wire codec between page script and host.
//!
//! Inbound: the page posts `{"id": n, "method": "...", "params": [...]}`
//! through the engine's message channel. Parameter payloads stay undecoded
//! ([`RawValue`]) until the matched binding's typed decode runs.
//!
//! Outbound: completion scripts that resolve or reject the page-side
//! pending-promise slot for a call id, plus the per-binding stub installed
//! into the page at registration and the wrapper used by the evaluation
//! channel.

use oriel_common::BridgeError;
use serde::Deserialize;
use serde_json::value::RawValue;

/// A decoded call request from page script.
#[derive(Debug, Deserialize)]
pub struct CallRequest {
    /// Sequence number chosen by the page-side runtime, unique per
    /// in-flight call.
    pub id: i64,
    /// Binding name.
    pub method: String,
    /// Ordered, still-encoded argument payloads.
    #[serde(default)]
    pub params: Vec<Box<RawValue>>,
}

impl CallRequest {
    /// Parse a raw inbound message. On failure the caller drops the
    /// message without replying.
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(raw).map_err(|e| BridgeError::MalformedMessage(e.to_string()))
    }
}

/// JSON-encode a value for embedding in generated script. Total: values
/// that cannot be encoded become `null`.
pub fn js_string(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Script resolving the pending promise for `id` with an already-encoded
/// JSON value, then clearing the slot.
pub fn resolve_script(id: i64, json_value: &str) -> String {
    format!("window._rpc[{id}].resolve({json_value}); window._rpc[{id}] = undefined")
}

/// Script rejecting the pending promise for `id` with an error message,
/// then clearing the slot.
pub fn reject_script(id: i64, message: &str) -> String {
    format!(
        "window._rpc[{id}].reject({}); window._rpc[{id}] = undefined",
        js_string(&message)
    )
}

/// Stub installed under `window[name]` at registration: allocates a
/// sequence number, parks a resolve/reject pair in the pending table, and
/// posts the call request through the engine's message channel.
pub fn binding_stub(name: &str) -> String {
    let name = js_string(&name);
    format!(
        r#"(function() {{ var name = {name};
    var RPC = window._rpc = (window._rpc || {{nextSeq: 1}});
    window[name] = function() {{
      var seq = RPC.nextSeq++;
      var promise = new Promise(function(resolve, reject) {{
        RPC[seq] = {{
          resolve: resolve,
          reject: reject,
        }};
      }});
      window.ipc.postMessage(JSON.stringify({{
        id: seq,
        method: name,
        params: Array.prototype.slice.call(arguments),
      }}));
      return promise;
    }}
}})()"#
    )
}

/// Wrap user script so its value reaches the ephemeral callback `cb`:
/// promise-like values get continuations, immediate values are forwarded
/// directly, and synchronous throws become `{error: message}` objects.
pub fn eval_wrapper(js: &str, cb: &str) -> String {
    let body = js.trim_end().trim_end_matches(';').trim_end();
    format!(
        r#"(function() {{
    try {{
        const result = ({body});
        if (result instanceof Promise) {{
            result.then(
                res => window.{cb}(res),
                err => window.{cb}({{ error: err.message }})
            );
        }} else {{
            window.{cb}(result);
        }}
    }} catch (e) {{
        window.{cb}({{ error: e.message }});
    }}
}})();"#
    )
}

/// Script removing an ephemeral callback's page-side global.
pub fn delete_global(name: &str) -> String {
    format!("delete window.{name};")
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Inbound parsing --

    #[test]
    fn parse_valid_request() {
        let req = CallRequest::parse(r#"{"id":1,"method":"add","params":[2,3]}"#).unwrap();
        assert_eq!(req.id, 1);
        assert_eq!(req.method, "add");
        assert_eq!(req.params.len(), 2);
        assert_eq!(req.params[0].get(), "2");
        assert_eq!(req.params[1].get(), "3");
    }

    #[test]
    fn parse_missing_params_defaults_empty() {
        let req = CallRequest::parse(r#"{"id":7,"method":"ping"}"#).unwrap();
        assert_eq!(req.id, 7);
        assert!(req.params.is_empty());
    }

    #[test]
    fn parse_non_json_is_malformed() {
        let err = CallRequest::parse("definitely not json").unwrap_err();
        assert!(matches!(err, BridgeError::MalformedMessage(_)));
    }

    #[test]
    fn parse_missing_method_is_malformed() {
        let err = CallRequest::parse(r#"{"id":1,"params":[]}"#).unwrap_err();
        assert!(matches!(err, BridgeError::MalformedMessage(_)));
    }

    #[test]
    fn parse_preserves_nested_payloads() {
        let req =
            CallRequest::parse(r#"{"id":2,"method":"put","params":[{"k":[1,2]},"s"]}"#).unwrap();
        assert_eq!(req.params[0].get(), r#"{"k":[1,2]}"#);
        assert_eq!(req.params[1].get(), r#""s""#);
    }

    // -- Completion scripts --

    #[test]
    fn resolve_script_form() {
        assert_eq!(
            resolve_script(1, "5"),
            "window._rpc[1].resolve(5); window._rpc[1] = undefined"
        );
    }

    #[test]
    fn reject_script_form() {
        assert_eq!(
            reject_script(3, "boom"),
            r#"window._rpc[3].reject("boom"); window._rpc[3] = undefined"#
        );
    }

    #[test]
    fn reject_script_escapes_message() {
        let script = reject_script(1, r#"a "quoted" failure"#);
        assert!(script.contains(r#""a \"quoted\" failure""#));
    }

    // -- Injected page script --

    #[test]
    fn binding_stub_references_name_and_table() {
        let stub = binding_stub("add");
        assert!(stub.contains(r#"var name = "add""#));
        assert!(stub.contains("window._rpc"));
        assert!(stub.contains("nextSeq: 1"));
        assert!(stub.contains("window.ipc.postMessage"));
    }

    #[test]
    fn eval_wrapper_trims_trailing_semicolons() {
        let wrapped = eval_wrapper("1 + 1;;\n", "__cb");
        assert!(wrapped.contains("(1 + 1)"));
        assert!(!wrapped.contains("1 + 1;"));
    }

    #[test]
    fn eval_wrapper_routes_all_paths_to_callback() {
        let wrapped = eval_wrapper("fetch('/x')", "__cb_9");
        // immediate value, promise continuations, and catch clause
        assert_eq!(wrapped.matches("window.__cb_9(").count(), 4);
        assert!(wrapped.contains("instanceof Promise"));
        assert!(wrapped.contains("{ error: e.message }"));
    }

    #[test]
    fn delete_global_form() {
        assert_eq!(delete_global("__cb_1"), "delete window.__cb_1;");
    }

    #[test]
    fn js_string_escapes() {
        assert_eq!(js_string(&"he said \"hi\""), r#""he said \"hi\"""#);
        assert_eq!(js_string(&42), "42");
    }
}
