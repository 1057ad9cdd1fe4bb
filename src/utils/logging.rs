//! Switchable logging macros keyed on a module-level `ENABLE_LOGS` flag.
//!
//! The monitoring cycles log every iteration, which gets noisy fast. Each module
//! decides for itself whether its chatter reaches the `log` backend:
//! ```rust,ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn};
//!
//! log_info!("[quick] published {:?}", judgment.state);
//! ```

/// Info-level log, gated on the caller's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level log, gated on the caller's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error-level log, gated on the caller's `ENABLE_LOGS`.
///
/// Cycle failures go through here before the backoff sleep, so keep it enabled
/// in the monitor modules.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

/// Debug-level log for prompts and raw model output.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}
