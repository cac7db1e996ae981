//! `LOG_*` call-site macros and module registration/declaration helper.
//!
//! Rust has no C-style varargs, so each argument after the format string
//! must already be a [`crate::fmt::Arg`] — the macros just route to
//! [`crate::log::log_record`] with a level baked in.

/// Declares a `static` [`crate::log::LogModule`] with the given name.
/// Registration is a separate, explicit step: call `NAME.register()` once
/// during early program startup (bare-metal: from a linker-section
/// constructor array; host: from an explicit registry walk in `main`).
#[macro_export]
macro_rules! LOG_MODULE_REGISTER {
    ($name:ident, $module_name:expr) => {
        static $name: $crate::LogModule = $crate::LogModule::new($module_name);
    };
}

#[macro_export]
macro_rules! LOG_ERR {
    ($module:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log::log_record($module, $crate::LogLevel::Err, $fmt, &[$($arg),*])
    };
}

#[macro_export]
macro_rules! LOG_WRN {
    ($module:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log::log_record($module, $crate::LogLevel::Wrn, $fmt, &[$($arg),*])
    };
}

#[macro_export]
macro_rules! LOG_INF {
    ($module:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log::log_record($module, $crate::LogLevel::Inf, $fmt, &[$($arg),*])
    };
}

#[macro_export]
macro_rules! LOG_DBG {
    ($module:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log::log_record($module, $crate::LogLevel::Dbg, $fmt, &[$($arg),*])
    };
}
