/// Errors produced by the host/page RPC bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The inbound payload failed to parse. The message is dropped and no
    /// reply is sent, since the call id cannot be trusted.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("no such method: {0}")]
    NoSuchMethod(String),

    /// Parameter count does not satisfy the binding's declared arity.
    #[error("function arguments mismatch: {method} takes {expected}, got {got}")]
    ArityMismatch {
        method: String,
        expected: String,
        got: usize,
    },

    /// A parameter payload could not be decoded into the binding's declared
    /// parameter type. `index` is zero-based.
    #[error("argument {index}: {message}")]
    ArgumentDecode { index: usize, message: String },

    #[error("invalid binding name: {0}")]
    InvalidName(String),

    /// A binding returned its error output. Displays as the bare message so
    /// the page-side rejection carries exactly what the handler reported.
    #[error("{0}")]
    Handler(String),

    /// The evaluated script threw, or its promise rejected.
    #[error("script error: {0}")]
    ScriptError(String),

    /// No result arrived before the deadline.
    #[error("evaluation timed out")]
    EvalTimeout,

    /// Operation attempted on a torn-down bridge.
    #[error("bridge closed")]
    Closed,

    /// A result value could not be JSON-encoded.
    #[error("result encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum OrielError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("webview error: {0}")]
    WebView(String),

    #[error("config error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_error_display() {
        let err = BridgeError::MalformedMessage("unexpected token".into());
        assert_eq!(err.to_string(), "malformed message: unexpected token");

        let err = BridgeError::NoSuchMethod("frobnicate".into());
        assert_eq!(err.to_string(), "no such method: frobnicate");

        let err = BridgeError::ArityMismatch {
            method: "add".into(),
            expected: "2 arguments".into(),
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "function arguments mismatch: add takes 2 arguments, got 1"
        );

        let err = BridgeError::ArgumentDecode {
            index: 1,
            message: "invalid type".into(),
        };
        assert_eq!(err.to_string(), "argument 1: invalid type");

        let err = BridgeError::EvalTimeout;
        assert_eq!(err.to_string(), "evaluation timed out");

        let err = BridgeError::Closed;
        assert_eq!(err.to_string(), "bridge closed");
    }

    #[test]
    fn handler_error_is_bare_message() {
        let err = BridgeError::Handler("disk full".into());
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn script_error_display() {
        let err = BridgeError::ScriptError("x is not defined".into());
        assert_eq!(err.to_string(), "script error: x is not defined");
    }

    #[test]
    fn oriel_error_from_bridge() {
        let bridge_err = BridgeError::EvalTimeout;
        let err: OrielError = bridge_err.into();
        assert!(matches!(err, OrielError::Bridge(_)));
        assert_eq!(err.to_string(), "evaluation timed out");
    }

    #[test]
    fn oriel_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: OrielError = io_err.into();
        assert!(matches!(err, OrielError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn oriel_error_other_variants() {
        let err = OrielError::WebView("creation failed".into());
        assert_eq!(err.to_string(), "webview error: creation failed");

        let err = OrielError::Config("bad toml".into());
        assert_eq!(err.to_string(), "config error: bad toml");
    }
}
