//! Test doubles for driving the bridge without a browser engine.

use std::sync::{Arc, Mutex};

use oriel_common::BridgeError;

use crate::host::{MessagePump, ScriptHost};

/// Records every script handed to the host, standing in for the engine's
/// UI-thread injection queue.
#[derive(Default)]
pub struct RecordingHost {
    evals: Mutex<Vec<String>>,
    inits: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn eval_scripts(&self) -> Vec<String> {
        self.evals.lock().unwrap().clone()
    }

    pub fn init_scripts(&self) -> Vec<String> {
        self.inits.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.evals.lock().unwrap().clear();
        self.inits.lock().unwrap().clear();
    }
}

impl ScriptHost for RecordingHost {
    fn eval(&self, js: &str) -> Result<(), BridgeError> {
        self.evals.lock().unwrap().push(js.to_string());
        Ok(())
    }

    fn init(&self, js: &str) -> Result<(), BridgeError> {
        self.inits.lock().unwrap().push(js.to_string());
        Ok(())
    }
}

/// Pump that runs a test-provided hook once per pump call, simulating the
/// UI loop making progress while a synchronous eval blocks.
#[derive(Default)]
pub struct HookPump {
    hook: Mutex<Option<Box<dyn FnMut() + Send>>>,
}

impl HookPump {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_hook(&self, f: impl FnMut() + Send + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(f));
    }
}

impl MessagePump for HookPump {
    fn pump(&self) {
        if let Some(hook) = self.hook.lock().unwrap().as_mut() {
            hook();
        }
    }
}

/// Pump that never makes progress, for timeout paths.
pub struct IdlePump;

impl MessagePump for IdlePump {
    fn pump(&self) {}
}
