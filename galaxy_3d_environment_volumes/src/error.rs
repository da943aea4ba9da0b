//! Error types for the environment volumes plugin
//!
//! Covers singleton lifecycle violations, stale volume/camera handles and
//! failures of the reflection (property) layer.

use std::fmt;

/// Result type for environment volume operations
pub type Result<T> = std::result::Result<T, Error>;

/// Environment volume plugin errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Singleton invariant broken (double creation, destruction of a non-active instance)
    SingletonViolation(String),

    /// Volume or camera handle is stale or was never issued
    InvalidHandle(String),

    /// Unknown property name or value of the wrong type
    InvalidProperty(String),

    /// Plugin used before initialization, or initialization failed
    InitializationFailed(String),

    /// A singleton lock was poisoned by a panicking holder
    LockPoisoned(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SingletonViolation(msg) => write!(f, "Singleton violation: {}", msg),
            Error::InvalidHandle(msg) => write!(f, "Invalid handle: {}", msg),
            Error::InvalidProperty(msg) => write!(f, "Invalid property: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::LockPoisoned(msg) => write!(f, "Lock poisoned: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Build an [`Error`] variant from a format string and log it at ERROR level.
///
/// # Example
///
/// ```ignore
/// return Err(plugin_err!("galaxy3d::EnvironmentBlender", InvalidHandle,
///     "Volume {:?} is not attached", key));
/// ```
#[macro_export]
macro_rules! plugin_err {
    ($source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::plugin_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
