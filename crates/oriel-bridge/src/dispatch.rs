//! Call dispatch: request to binding lookup, arity validation, typed
//! decode, and invocation.

use oriel_common::BridgeError;
use serde_json::Value;
use tracing::debug;

use crate::ipc::CallRequest;
use crate::registry::BindingMap;

/// Execute a decoded call request against the registry.
///
/// Unknown methods are reported rather than silently succeeding: a page
/// listening on the returned promise gets a rejection instead of a void
/// resolve it cannot distinguish from success.
pub fn dispatch(bindings: &BindingMap, request: &CallRequest) -> Result<Value, BridgeError> {
    let binding = bindings
        .get(&request.method)
        .ok_or_else(|| BridgeError::NoSuchMethod(request.method.clone()))?;

    let arity = binding.arity();
    if !arity.accepts(request.params.len()) {
        return Err(BridgeError::ArityMismatch {
            method: request.method.clone(),
            expected: arity.to_string(),
            got: request.params.len(),
        });
    }

    debug!(
        method = %request.method,
        id = request.id,
        params = request.params.len(),
        "dispatching call"
    );
    binding.invoke(&request.params)
}
