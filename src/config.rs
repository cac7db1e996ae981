//! Compile-time knobs. All of these are sizing/behaviour constants, never
//! read from the environment or a filesystem — there is neither on the
//! intended target.

use crate::log::LogLevel;

/// Ring buffer capacity in bytes.
pub const LOG_BUFFER_SIZE: usize = 1024;

/// Max per-record payload (header + captured format arguments).
pub const LOG_MAX_MSG_DATA_SIZE: usize = 64;

/// Priority of the log-output work item (low-priority context).
pub const LOG_WORK_PRIORITY: i32 = 10;

/// Default per-module log level until overridden by `log_set_level`.
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Inf;

/// Line terminator appended after every rendered log line.
#[cfg(feature = "embedded-line-end")]
pub const LINE_END: &str = "\r\n";

#[cfg(not(feature = "embedded-line-end"))]
pub const LINE_END: &str = "\n";
