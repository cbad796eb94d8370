//! Binding registry: named host functions callable from page script.
//!
//! Each registration converts a typed closure into a type-erased
//! [`Binding`] that owns its decode-and-invoke logic, built once from the
//! closure's static signature. The legal output shapes (nothing, a value,
//! an error, or a value plus an error) are enforced by the registration
//! surfaces rather than checked per call: [`IntoBinding`] admits infallible
//! closures, [`IntoFallibleBinding`] admits `Result`-returning ones, and
//! [`IntoVariadicBinding`] admits a trailing `Vec<T>` tail.
//!
//! The registry itself is a mutex-guarded name map: it is mutated from the
//! UI thread and read from whatever thread the engine delivers messages
//! on.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use oriel_common::BridgeError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;

/// Declared parameter shape of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` parameters.
    Exact(usize),
    /// `n` or more parameters; the surplus feeds the variadic tail.
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, supplied: usize) -> bool {
        match *self {
            Arity::Exact(n) => supplied == n,
            Arity::AtLeast(n) => supplied >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Arity::Exact(1) => write!(f, "1 argument"),
            Arity::Exact(n) => write!(f, "{n} arguments"),
            Arity::AtLeast(n) => write!(f, "at least {n} arguments"),
        }
    }
}

/// A registered host function with type-erased decode and invocation.
pub trait Binding: Send + Sync {
    /// Declared parameter shape, validated by the dispatcher before
    /// [`invoke`](Binding::invoke) runs.
    fn arity(&self) -> Arity;

    /// Decode `params` and run the function. `params` is guaranteed to
    /// satisfy [`arity`](Binding::arity). `Ok` carries the JSON result
    /// (`null` for void bindings); `Err` becomes a page-side rejection.
    fn invoke(&self, params: &[Box<RawValue>]) -> Result<Value, BridgeError>;
}

struct FnBinding<F> {
    arity: Arity,
    run: F,
}

impl<F> Binding for FnBinding<F>
where
    F: Fn(&[Box<RawValue>]) -> Result<Value, BridgeError> + Send + Sync,
{
    fn arity(&self) -> Arity {
        self.arity
    }

    fn invoke(&self, params: &[Box<RawValue>]) -> Result<Value, BridgeError> {
        (self.run)(params)
    }
}

fn decode_arg<T: DeserializeOwned>(
    params: &[Box<RawValue>],
    index: usize,
) -> Result<T, BridgeError> {
    serde_json::from_str(params[index].get()).map_err(|e| BridgeError::ArgumentDecode {
        index,
        message: e.to_string(),
    })
}

fn encode_result<T: Serialize>(value: &T) -> Result<Value, BridgeError> {
    serde_json::to_value(value).map_err(|e| BridgeError::Encode(e.to_string()))
}

/// Conversion from an infallible typed closure into a [`Binding`].
///
/// Implemented for `Fn(A1..An) -> R` up to six parameters, where each
/// parameter is `DeserializeOwned` and `R: Serialize` (`()` serializes to
/// `null`, covering void functions).
pub trait IntoBinding<Args> {
    fn into_binding(self) -> Arc<dyn Binding>;
}

/// Conversion for fallible closures returning `Result<R, E>`. `Ok`
/// resolves the call with the value; `Err` rejects it with the error's
/// display text.
pub trait IntoFallibleBinding<Args> {
    fn into_binding(self) -> Arc<dyn Binding>;
}

/// Conversion for closures whose final parameter is a variadic `Vec<T>`
/// tail, matched against any number (including zero) of remaining
/// supplied arguments.
pub trait IntoVariadicBinding<Args> {
    fn into_binding(self) -> Arc<dyn Binding>;
}

macro_rules! impl_bindings {
    ($n:expr $(, $A:ident : $idx:tt)*) => {
        impl<Func, R $(, $A)*> IntoBinding<($($A,)*)> for Func
        where
            Func: Fn($($A),*) -> R + Send + Sync + 'static,
            R: Serialize,
            $($A: DeserializeOwned,)*
        {
            fn into_binding(self) -> Arc<dyn Binding> {
                Arc::new(FnBinding {
                    arity: Arity::Exact($n),
                    run: move |params: &[Box<RawValue>]| -> Result<Value, BridgeError> {
                        let out = (self)($(decode_arg::<$A>(params, $idx)?),*);
                        encode_result(&out)
                    },
                })
            }
        }

        impl<Func, R, E $(, $A)*> IntoFallibleBinding<($($A,)*)> for Func
        where
            Func: Fn($($A),*) -> Result<R, E> + Send + Sync + 'static,
            R: Serialize,
            E: fmt::Display,
            $($A: DeserializeOwned,)*
        {
            fn into_binding(self) -> Arc<dyn Binding> {
                Arc::new(FnBinding {
                    arity: Arity::Exact($n),
                    run: move |params: &[Box<RawValue>]| -> Result<Value, BridgeError> {
                        match (self)($(decode_arg::<$A>(params, $idx)?),*) {
                            Ok(v) => encode_result(&v),
                            Err(e) => Err(BridgeError::Handler(e.to_string())),
                        }
                    },
                })
            }
        }

        impl<Func, R, T $(, $A)*> IntoVariadicBinding<($($A,)* Vec<T>,)> for Func
        where
            Func: Fn($($A,)* Vec<T>) -> R + Send + Sync + 'static,
            R: Serialize,
            T: DeserializeOwned,
            $($A: DeserializeOwned,)*
        {
            fn into_binding(self) -> Arc<dyn Binding> {
                Arc::new(FnBinding {
                    arity: Arity::AtLeast($n),
                    run: move |params: &[Box<RawValue>]| -> Result<Value, BridgeError> {
                        let tail = (($n)..params.len())
                            .map(|i| decode_arg::<T>(params, i))
                            .collect::<Result<Vec<T>, _>>()?;
                        let out = (self)($(decode_arg::<$A>(params, $idx)?,)* tail);
                        encode_result(&out)
                    },
                })
            }
        }
    };
}

impl_bindings!(0);
impl_bindings!(1, A1: 0);
impl_bindings!(2, A1: 0, A2: 1);
impl_bindings!(3, A1: 0, A2: 1, A3: 2);
impl_bindings!(4, A1: 0, A2: 1, A3: 2, A4: 3);
impl_bindings!(5, A1: 0, A2: 1, A3: 2, A4: 3, A5: 4);
impl_bindings!(6, A1: 0, A2: 1, A3: 2, A4: 3, A5: 4, A6: 5);

/// Name-to-binding map shared between the UI thread and the engine's
/// message-delivery thread. Rebinding a name replaces silently.
#[derive(Clone, Default)]
pub struct BindingMap {
    inner: Arc<Mutex<HashMap<String, Arc<dyn Binding>>>>,
}

impl BindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: &str, binding: Arc<dyn Binding>) {
        self.inner.lock().unwrap().insert(name.to_string(), binding);
    }

    /// Remove a binding; returns whether it existed. Absent names are a
    /// no-op.
    pub fn remove(&self, name: &str) -> bool {
        self.inner.lock().unwrap().remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Binding>> {
        self.inner.lock().unwrap().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().unwrap().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
