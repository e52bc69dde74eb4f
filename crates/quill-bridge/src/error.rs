//! Error types for the bridge.
//!
//! Recoverable failures are [`BridgeError`]s. Host misuse and unported
//! engine features are invariant violations: they go through
//! [`invariant_failed`] and never return.

use std::fmt;
use thiserror::Error;

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can be reported back to a caller.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] quill_config::ConfigError),

    /// No engine factory has been registered.
    #[error("no editor engine registered")]
    NoEngine,

    /// A required pointer argument was null.
    #[error("null pointer passed for {0}")]
    NullPointer(&'static str),

    /// A string could not be handed to the host as a C string.
    #[error("string contains an interior NUL byte: {0:?}")]
    InteriorNul(String),
}

/// Report a violated invariant and abort the current operation.
///
/// The message names the failed condition and its source location. Inside an
/// `extern "C"` entry point the resulting panic cannot unwind and the process
/// aborts.
#[cold]
#[inline(never)]
pub fn invariant_failed(condition: &str, file: &str, line: u32, context: Option<fmt::Arguments<'_>>) -> ! {
    let message = match context {
        Some(context) => format!("{file}:{line}: invariant violated: {condition}: {context}"),
        None => format!("{file}:{line}: invariant violated: {condition}"),
    };
    log::error!("{message}");
    panic!("{message}");
}

/// Assert a bridge invariant; on failure log and panic with the condition,
/// location and optional formatted context.
#[macro_export]
macro_rules! invariant {
    ($cond:expr $(,)?) => {
        if !($cond) {
            $crate::error::invariant_failed(stringify!($cond), file!(), line!(), None)
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !($cond) {
            $crate::error::invariant_failed(
                stringify!($cond),
                file!(),
                line!(),
                Some(format_args!($($arg)+)),
            )
        }
    };
}

/// Unconditional invariant violation, for operations with no supported path.
#[macro_export]
macro_rules! fatal {
    ($what:expr) => {
        $crate::error::invariant_failed($what, file!(), line!(), None)
    };
    ($what:expr, $($arg:tt)+) => {
        $crate::error::invariant_failed($what, file!(), line!(), Some(format_args!($($arg)+)))
    };
}
