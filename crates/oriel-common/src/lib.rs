pub mod errors;

pub use errors::{BridgeError, OrielError};

pub type Result<T> = std::result::Result<T, OrielError>;
