//! Logging macros over `tracing` whose output can be compiled away per level.
//!
//! The level gates are resolved against this crate's features, so a caller only
//! needs to enable `standard` or `debug_trace` on its `chameleon_trace` dependency.

#[cfg(feature = "subscriber")]
pub mod subscriber;

#[doc(hidden)]
pub use tracing as __tracing;

#[doc(hidden)]
pub const INFO_ENABLED: bool = cfg!(feature = "log_info");

#[doc(hidden)]
pub const WARN_ENABLED: bool = cfg!(feature = "log_warnings");

#[doc(hidden)]
pub const DEBUG_ENABLED: bool = cfg!(feature = "log_debug");

#[doc(hidden)]
pub const ERROR_ENABLED: bool = cfg!(feature = "log_errors");

#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {
        if $crate::INFO_ENABLED {
            $crate::__tracing::info!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {
        if $crate::WARN_ENABLED {
            $crate::__tracing::warn!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {
        if $crate::DEBUG_ENABLED {
            $crate::__tracing::debug!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {
        if $crate::ERROR_ENABLED {
            $crate::__tracing::error!($($t)*);
        }
    };
}
