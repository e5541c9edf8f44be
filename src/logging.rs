//! Diagnostics for the dispatch machinery.
//!
//! The `*_log!` macros forward to [`log`](https://docs.rs/log) when the `log`
//! feature is on and to [`tracing`](https://docs.rs/tracing) when `tracing` is
//! on. Turn on at most one of the two.
//!
//! | Level | Emitted for |
//! |-------|-------------|
//! | trace | route resolution and strategy misses |
//! | debug | parent dispatch, ancestors answered without running their body |
//! | info  | route and legacy view registration |
//! | warn  | excessive re-dispatch, ancestors that short-circuit |
//! | error | ancestry that cannot be completed |
//!
//! Events carry the `view_breadcrumbs` target:
//!
//! ```ignore
//! use view_breadcrumbs::{debug_log, warn_log};
//!
//! debug_log!("Dispatching parent '{}' ({})", name, args);
//! warn_log!("Parent '{}' short-circuited", name);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __breadcrumb_event {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::$level!(target: "view_breadcrumbs", $($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!(target: "view_breadcrumbs", $($arg)*);
    }};
}

/// Emit a **trace**-level log message (strategy misses, cache lookups).
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        $crate::__breadcrumb_event!(trace, $($arg)*)
    };
}

/// Emit a **debug**-level log message (dispatch decisions).
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::__breadcrumb_event!(debug, $($arg)*)
    };
}

/// Emit an **info**-level log message.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        $crate::__breadcrumb_event!(info, $($arg)*)
    };
}

/// Emit a **warn**-level log message.
///
/// Used for excessive re-dispatch and for ancestors that short-circuit while
/// being dispatched as a parent.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::__breadcrumb_event!(warn, $($arg)*)
    };
}

/// Emit an **error**-level log message.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::__breadcrumb_event!(error, $($arg)*)
    };
}
