//! Programmer-error taxonomy.
//!
//! Nothing in this crate returns these as a recoverable `Result` from a
//! public S1/S2 operation — all scheduler and logging operations are total.
//! `Fatal` only labels the reason passed to [`fatal`], which never returns.

use core::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::log;

/// Reasons the runtime invokes [`fatal`]. Every variant corresponds to a
/// condition the specification classifies as a programmer error rather than
/// a recoverable failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fatal {
    /// An S1/S2/S3 operation was called before [`crate::platform::init`].
    #[error("platform not initialized")]
    PlatformNotInitialized,
    /// `cbprintf_restore` ran out of packed argument bytes before the
    /// format string's specifiers were exhausted.
    #[error("corrupt capture/restore buffer")]
    CorruptRestoreBuffer,
    /// A work item's `flags`/`next` pair violated the "at most one of
    /// SUBMITTED/SCHEDULED, queue membership iff a flag is set" invariant.
    #[error("scheduler state invariant violated")]
    SchedulerInvariantViolated,
}

static IN_FATAL: AtomicBool = AtomicBool::new(false);

/// Drains pending log output, disables interrupts, and halts/aborts.
/// Never returns. Guards against re-entrant calls (an assertion tripped
/// while already handling a fatal error is ignored rather than recursing).
pub fn fatal(reason: Fatal) -> ! {
    if IN_FATAL.swap(true, Ordering::AcqRel) {
        // Already unwinding a fatal error; don't re-enter log_panic or the
        // platform's fatal_error, just stop here.
        loop {
            core::hint::spin_loop();
        }
    }

    log::log_panic();
    let _ = reason;
    crate::platform::get().fatal_error()
}
