//! Logger setup plus macros gated by a per-module `ENABLE_LOGS` flag.
//!
//! The timer tasks log on every tick, so each module decides for itself
//! whether that chatter is wanted:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info, log_warn};
//!
//! log_info!("rotation armed over {} pages", pages);
//! ```

/// Install `env_logger`, reading `RUST_LOG` and defaulting to info.
/// Later calls are no-ops.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Info-level log, emitted only when the calling module's `ENABLE_LOGS` is set.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level counterpart of [`log_info!`].
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Debug-level counterpart of [`log_info!`]; used for per-tick traces.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}
